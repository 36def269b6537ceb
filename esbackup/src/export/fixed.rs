use super::{CategoryReport, ResourceExporter};
use crate::client::ClusterClient;
use crate::snapshot::{ExportArtifact, SnapshotWriter};
use async_trait::async_trait;

/// Fetches a fixed list of `(endpoint, filename)` pairs. Each pair
/// succeeds or fails on its own.
#[derive(Debug, Clone)]
pub struct FixedExporter {
    pub category: &'static str,
    pub resources: &'static [(&'static str, &'static str)],
}

#[async_trait]
impl ResourceExporter for FixedExporter {
    fn category(&self) -> &str {
        self.category
    }

    async fn export(&self, client: &ClusterClient, writer: &SnapshotWriter) -> CategoryReport {
        let mut report = CategoryReport::new(self.category);

        for (path, filename) in self.resources {
            match client.fetch(path).await {
                Ok(value) => {
                    report.persist(writer, ExportArtifact::json(*filename, value));
                }
                Err(e) => {
                    tracing::warn!(category = self.category, "{}", e);
                    report.record_failure(&e);
                }
            }
        }

        report
    }
}
