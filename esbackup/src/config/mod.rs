//! Configuration loading for esbackup
//!
//! The config file is TOML. Connection settings live in the
//! `[elastic_backup]` table, logging in an optional `[logging]` table:
//!
//! ```toml
//! [elastic_backup]
//! server = "localhost"
//! port = 9200
//! backup_folder = "~/elastic-backup"
//! tls = true
//! auth = true
//! username = "backup"
//! password = "secret"
//! cert = "/etc/elastic/ca.pem"
//! ```

mod connection;

pub use connection::{CertVerification, ConnectionSettings, Credentials, Transport};

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Validated configuration for one backup run
#[derive(Debug, Clone)]
pub struct BackupConfig {
    pub connection: ConnectionSettings,
    pub backup_folder: PathBuf,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter string
    /// Override with RUST_LOG env var
    #[serde(default = "default_level")]
    pub level: String,

    /// Log output format
    /// Override with LOG_FORMAT env var
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(Error::ConfigInvalid(format!(
                "unknown log format '{}', expected 'pretty' or 'json'",
                other
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    elastic_backup: Option<RawBackupSection>,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
struct RawBackupSection {
    server: Option<String>,
    port: Option<PortValue>,
    backup_folder: Option<PathBuf>,
    tls: Option<bool>,
    auth: Option<bool>,
    username: Option<String>,
    password: Option<String>,
    cert: Option<CertValue>,
    timeout_secs: Option<u64>,
}

/// Ports are accepted both as integers and as quoted strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u16),
    Text(String),
}

/// `cert = false` disables verification, `cert = true` uses the built-in
/// roots, any string is a CA bundle path.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CertValue {
    Flag(bool),
    Path(PathBuf),
}

fn missing(field: &str) -> Error {
    Error::ConfigInvalid(format!("missing '{}' in [elastic_backup]", field))
}

/// Expand ~ to home directory in path
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let s = path.to_string_lossy();
    let home = || {
        dirs::home_dir()
            .ok_or_else(|| Error::ConfigInvalid("Cannot determine home directory".to_string()))
    };
    if let Some(rest) = s.strip_prefix("~/") {
        Ok(home()?.join(rest))
    } else if s == "~" {
        home()
    } else {
        Ok(path.to_path_buf())
    }
}

impl BackupConfig {
    /// Load and validate the config file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let section = raw
            .elastic_backup
            .ok_or_else(|| Error::ConfigInvalid("missing [elastic_backup] section".to_string()))?;
        Self::validate(section, raw.logging)
    }

    fn validate(section: RawBackupSection, logging: LoggingConfig) -> Result<Self> {
        let host = section.server.ok_or_else(|| missing("server"))?;
        let host = host.trim();
        if host.is_empty() {
            return Err(Error::ConfigInvalid("'server' must not be empty".to_string()));
        }
        // a bare host name or address, scheme comes from `tls`
        if host.contains('/') || host.chars().any(char::is_whitespace) {
            return Err(Error::ConfigInvalid(format!(
                "'server' must be a host name without scheme or path: {}",
                host
            )));
        }

        let port = match section.port.ok_or_else(|| missing("port"))? {
            PortValue::Number(n) => n,
            PortValue::Text(s) => s.trim().parse::<u16>().map_err(|_| {
                Error::ConfigInvalid(format!("'port' is not a valid port number: {}", s))
            })?,
        };
        if port == 0 {
            return Err(Error::ConfigInvalid("'port' must be non-zero".to_string()));
        }

        let backup_folder = section.backup_folder.ok_or_else(|| missing("backup_folder"))?;
        let backup_folder = expand_tilde(&backup_folder)?;
        let tls = section.tls.ok_or_else(|| missing("tls"))?;
        let auth = section.auth.ok_or_else(|| missing("auth"))?;

        // cert and credentials are only looked at when their switch is on
        let transport = if tls {
            let verification = match section.cert.ok_or_else(|| missing("cert"))? {
                CertValue::Flag(false) => CertVerification::Disabled,
                CertValue::Flag(true) => CertVerification::SystemRoots,
                CertValue::Path(p) => CertVerification::CaBundle(expand_tilde(&p)?),
            };
            Transport::Tls(verification)
        } else {
            Transport::Plain
        };

        let credentials = if auth {
            Some(Credentials {
                username: section.username.ok_or_else(|| missing("username"))?,
                password: section.password.ok_or_else(|| missing("password"))?,
            })
        } else {
            None
        };

        Ok(Self {
            connection: ConnectionSettings {
                host: host.to_string(),
                port,
                transport,
                credentials,
                timeout: section.timeout_secs.map(Duration::from_secs),
            },
            backup_folder,
            logging,
        })
    }
}
