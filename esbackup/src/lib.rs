//! Point-in-time backup of Elasticsearch cluster configuration
//!
//! Exports index templates, ingest pipelines, security entities,
//! transforms, X-Pack usage and watches over the cluster's HTTP API and
//! writes each resource to its own JSON file in a flat backup folder.
//!
//! # Example
//!
//! ```no_run
//! use esbackup::{BackupConfig, BackupRun};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> esbackup::Result<()> {
//!     let config = BackupConfig::load(Path::new("esbackup.toml"))?;
//!     let summary = BackupRun::from_config(&config)?.run().await?;
//!     println!("{} files, {} failures", summary.files_written(), summary.failure_count());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod run;
pub mod snapshot;

pub use client::ClusterClient;
pub use config::{
    BackupConfig, CertVerification, ConnectionSettings, LogFormat, LoggingConfig, Transport,
};
pub use error::{Error, FetchFailure, Result};
pub use export::{CategoryReport, ResourceExporter};
pub use run::{BackupRun, RunSummary};
pub use snapshot::{ExportArtifact, SnapshotWriter};
