//! Per-category exporters
//!
//! Every resource category implements [`ResourceExporter`]. Two shapes
//! cover all of them:
//!
//! - [`EnumeratedExporter`]: fetch a collection, write it, derive member
//!   names, then fetch and write each member (templates, pipelines,
//!   watches).
//! - [`FixedExporter`]: fetch a fixed set of endpoints and write each one
//!   (security, transforms, usage).
//!
//! Exporters never return errors. Failures are logged where they happen
//! and recorded in the [`CategoryReport`].

pub mod categories;
pub mod enumerated;
pub mod fixed;

pub use categories::{
    default_exporters, pipelines, security, templates, transforms, usage, watches,
};
pub use enumerated::{map_keys, search_hit_ids, truncated_hits, EnumeratedExporter};
pub use fixed::FixedExporter;

use crate::client::ClusterClient;
use crate::error::Error;
use crate::snapshot::{ExportArtifact, SnapshotWriter};
use async_trait::async_trait;

#[async_trait]
pub trait ResourceExporter: Send + Sync {
    /// Category name used in logs and the run summary
    fn category(&self) -> &str;

    async fn export(&self, client: &ClusterClient, writer: &SnapshotWriter) -> CategoryReport;
}

/// Outcome of one category export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryReport {
    pub category: String,
    /// Filenames written successfully, in write order
    pub written: Vec<String>,
    /// One message per failed fetch or write
    pub failures: Vec<String>,
    /// The collection listing failed and per-item work was skipped
    pub aborted: bool,
}

impl CategoryReport {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.aborted
    }

    pub(crate) fn record_failure(&mut self, error: &Error) {
        self.failures.push(error.to_string());
    }

    pub(crate) fn abort(&mut self, error: &Error) {
        tracing::error!(
            category = %self.category,
            "Skipping category: {}",
            error
        );
        self.record_failure(error);
        self.aborted = true;
    }

    /// Write one artifact; a failed write is recorded and skipped.
    pub(crate) fn persist(&mut self, writer: &SnapshotWriter, artifact: ExportArtifact) -> bool {
        match writer.write(&artifact) {
            Ok(()) => {
                self.written.push(artifact.filename);
                true
            }
            Err(e) => {
                tracing::warn!(category = %self.category, "{}", e);
                self.record_failure(&e);
                false
            }
        }
    }
}
