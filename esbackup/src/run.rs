//! Top-level backup orchestration.

use crate::client::ClusterClient;
use crate::config::{BackupConfig, ConnectionSettings};
use crate::error::{Error, Result};
use crate::export::{default_exporters, CategoryReport, ResourceExporter};
use crate::snapshot::SnapshotWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// One backup of a cluster into one directory
pub struct BackupRun {
    client: ClusterClient,
    target_dir: PathBuf,
    exporters: Vec<Box<dyn ResourceExporter>>,
}

/// What a run produced
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub categories: Vec<CategoryReport>,
}

impl RunSummary {
    pub fn files_written(&self) -> usize {
        self.categories.iter().map(|c| c.written.len()).sum()
    }

    pub fn failure_count(&self) -> usize {
        self.categories.iter().map(|c| c.failures.len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.categories.iter().all(CategoryReport::is_clean)
    }

    pub fn category(&self, name: &str) -> Option<&CategoryReport> {
        self.categories.iter().find(|c| c.category == name)
    }
}

impl BackupRun {
    pub fn new(settings: ConnectionSettings, target_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            client: ClusterClient::new(settings)?,
            target_dir: target_dir.as_ref().to_path_buf(),
            exporters: default_exporters(),
        })
    }

    pub fn from_config(config: &BackupConfig) -> Result<Self> {
        Self::new(config.connection.clone(), &config.backup_folder)
    }

    /// Replace the category list, e.g. to export a subset
    pub fn with_exporters(mut self, exporters: Vec<Box<dyn ResourceExporter>>) -> Self {
        self.exporters = exporters;
        self
    }

    /// Create the backup folder if needed, then export every category in
    /// order. Only a folder that cannot be created fails the run.
    pub async fn run(&self) -> Result<RunSummary> {
        self.ensure_target()?;

        let settings = self.client.settings();
        tracing::info!(
            "Backing up {}://{}:{} into {}",
            settings.scheme(),
            settings.host,
            settings.port,
            self.target_dir.display()
        );

        let writer = SnapshotWriter::new(&self.target_dir);
        let mut summary = RunSummary::default();

        for exporter in &self.exporters {
            let start = Instant::now();
            let report = exporter.export(&self.client, &writer).await;
            tracing::info!(
                category = %report.category,
                files = report.written.len(),
                failures = report.failures.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Category finished"
            );
            summary.categories.push(report);
        }

        tracing::info!(
            "Backup finished: {} files written, {} failures",
            summary.files_written(),
            summary.failure_count()
        );

        Ok(summary)
    }

    fn ensure_target(&self) -> Result<()> {
        if !self.target_dir.exists() {
            tracing::info!("Creating backup folder {}", self.target_dir.display());
        }
        std::fs::create_dir_all(&self.target_dir).map_err(|source| Error::TargetDir {
            path: self.target_dir.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_target_dir_not_creatable() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let run = BackupRun::new(ConnectionSettings::plain("127.0.0.1", 9), blocker.join("backup"))
            .unwrap()
            .with_exporters(Vec::new());
        let err = run.run().await.unwrap_err();
        assert!(matches!(err, Error::TargetDir { .. }));
    }

    #[tokio::test]
    async fn test_creates_missing_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested").join("backup");

        let run = BackupRun::new(ConnectionSettings::plain("127.0.0.1", 9), &target)
            .unwrap()
            .with_exporters(Vec::new());
        let summary = run.run().await.unwrap();
        assert!(target.is_dir());
        assert!(summary.is_complete());
        assert_eq!(summary.files_written(), 0);
    }
}
