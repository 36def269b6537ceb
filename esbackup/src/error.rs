use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to fetch {path}: {reason}")]
    FetchFailed { path: String, reason: FetchFailure },

    #[error("Failed to write {filename}: {source}")]
    WriteFailed {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Cannot read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Cannot create backup folder {path}: {source}")]
    TargetDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Why a single GET against the cluster did not produce a JSON document.
#[derive(Error, Debug)]
pub enum FetchFailure {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("response does not have the expected structure")]
    UnexpectedShape,

    #[error("invalid request path")]
    InvalidPath,
}

impl Error {
    pub(crate) fn fetch(path: &str, reason: impl Into<FetchFailure>) -> Self {
        Self::FetchFailed {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn write(filename: &str, source: std::io::Error) -> Self {
        Self::WriteFailed {
            filename: filename.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
