use super::{CategoryReport, ResourceExporter};
use crate::client::ClusterClient;
use crate::error::{Error, FetchFailure};
use crate::snapshot::{ExportArtifact, SnapshotWriter};
use async_trait::async_trait;
use serde_json::Value;

/// Derives member names from a collection response. `None` means the
/// response does not have the expected shape.
pub type MemberNames = fn(&Value) -> Option<Vec<String>>;

/// Collection fetch, then one fetch per member
#[derive(Debug, Clone)]
pub struct EnumeratedExporter {
    pub category: &'static str,
    /// Collection endpoint, e.g. `_template`
    pub collection_path: &'static str,
    /// Where the full collection response goes
    pub collection_file: &'static str,
    /// Where the JSON array of member names goes
    pub list_file: &'static str,
    /// Per-item endpoint prefix; the member name is appended as a segment
    pub item_path: &'static str,
    /// Per-item files are `<item_prefix>_<name>.json`
    pub item_prefix: &'static str,
    pub member_names: MemberNames,
}

/// Member names of a name-keyed collection (`_template`, `_ingest/pipeline`)
pub fn map_keys(collection: &Value) -> Option<Vec<String>> {
    collection
        .as_object()
        .map(|map| map.keys().cloned().collect())
}

/// `_id` of every hit in a search response
pub fn search_hit_ids(response: &Value) -> Option<Vec<String>> {
    let hits = response.pointer("/hits/hits")?.as_array()?;
    Some(
        hits.iter()
            .filter_map(|hit| hit.get("_id").and_then(Value::as_str))
            .map(str::to_string)
            .collect(),
    )
}

/// `(total, returned)` when a search response matched more hits than it
/// returned. A plain `.watches/_search` only returns the first 10.
pub fn truncated_hits(response: &Value) -> Option<(u64, usize)> {
    let returned = response.pointer("/hits/hits")?.as_array()?.len();
    let total = response
        .pointer("/hits/total/value")
        .or_else(|| response.pointer("/hits/total"))
        .and_then(Value::as_u64)?;
    (total > returned as u64).then_some((total, returned))
}

impl EnumeratedExporter {
    fn item_endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.item_path, name)
    }
}

#[async_trait]
impl ResourceExporter for EnumeratedExporter {
    fn category(&self) -> &str {
        self.category
    }

    async fn export(&self, client: &ClusterClient, writer: &SnapshotWriter) -> CategoryReport {
        let mut report = CategoryReport::new(self.category);

        let collection = match client.fetch(self.collection_path).await {
            Ok(collection) => collection,
            Err(e) => {
                report.abort(&e);
                return report;
            }
        };

        let names = (self.member_names)(&collection);
        if let Some((total, returned)) = truncated_hits(&collection) {
            tracing::warn!(
                category = self.category,
                "{} matched {} entries but returned only {}, the rest are not exported",
                self.collection_path,
                total,
                returned
            );
        }
        report.persist(
            writer,
            ExportArtifact::json(self.collection_file, collection),
        );

        let Some(names) = names else {
            report.abort(&Error::fetch(
                self.collection_path,
                FetchFailure::UnexpectedShape,
            ));
            return report;
        };

        tracing::info!(
            category = self.category,
            "Found {} {} to export",
            names.len(),
            self.category
        );

        report.persist(
            writer,
            ExportArtifact::json(self.list_file, Value::from(names.clone())),
        );

        for name in &names {
            let endpoint = self.item_endpoint(name);
            match client.fetch(&endpoint).await {
                Ok(item) => {
                    let filename = ExportArtifact::item_filename(self.item_prefix, name);
                    report.persist(writer, ExportArtifact::json(filename, item));
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
