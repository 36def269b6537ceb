//! Writing export artifacts into the flat backup directory.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// What gets written for an artifact
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactPayload {
    /// Serialized as compact JSON text
    Json(Value),
    /// Written verbatim
    Raw(Vec<u8>),
}

/// One file of the backup
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub filename: String,
    pub payload: ArtifactPayload,
}

impl ExportArtifact {
    pub fn json(filename: impl Into<String>, value: Value) -> Self {
        Self {
            filename: filename.into(),
            payload: ArtifactPayload::Json(value),
        }
    }

    pub fn raw(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            payload: ArtifactPayload::Raw(bytes),
        }
    }

    /// `<prefix>_<name>.json` with the resource name made safe for a flat
    /// directory.
    pub fn item_filename(prefix: &str, name: &str) -> String {
        format!("{}_{}.json", prefix, encode_filename_component(name))
    }
}

/// Percent-encode characters that would escape the backup directory or are
/// rejected by common filesystems. Everything else passes through.
pub fn encode_filename_component(name: &str) -> String {
    if name == "." || name == ".." {
        return name.replace('.', "%2E");
    }

    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '/' | '\\' | '%' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => {
                out.push_str(&format!("%{:02X}", c as u32));
            }
            c if c.is_control() => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{:02X}", b));
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Persists artifacts into the backup directory, overwriting existing
/// files of the same name.
///
/// No temp-file-and-rename: a crash mid-write leaves a partial file.
pub struct SnapshotWriter {
    target_dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(target_dir: impl AsRef<Path>) -> Self {
        Self {
            target_dir: target_dir.as_ref().to_path_buf(),
        }
    }

    pub fn write(&self, artifact: &ExportArtifact) -> Result<()> {
        let path = self.target_dir.join(&artifact.filename);
        self.write_to(&path, &artifact.payload)
            .map_err(|e| Error::write(&artifact.filename, e))?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }

    pub fn write_json(&self, filename: &str, value: &Value) -> Result<()> {
        self.write(&ExportArtifact::json(filename, value.clone()))
    }

    pub fn write_raw(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        self.write(&ExportArtifact::raw(filename, bytes.to_vec()))
    }

    fn write_to(&self, path: &Path, payload: &ArtifactPayload) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        match payload {
            ArtifactPayload::Json(value) => serde_json::to_writer(&mut writer, value)?,
            ArtifactPayload::Raw(bytes) => writer.write_all(bytes)?,
        }
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_write_json_compact() {
        let temp = TempDir::new().unwrap();
        let writer = SnapshotWriter::new(temp.path());
        writer
            .write_json("templates_list.txt", &json!(["a", "b"]))
            .unwrap();
        let content = std::fs::read_to_string(temp.path().join("templates_list.txt")).unwrap();
        assert_eq!(content, r#"["a","b"]"#);
    }

    #[test]
    fn test_write_raw_verbatim() {
        let temp = TempDir::new().unwrap();
        let writer = SnapshotWriter::new(temp.path());
        writer.write_raw("watches.ndjson", b"{\"a\":1}\n{\"b\":2}\n").unwrap();
        let content = std::fs::read(temp.path().join("watches.ndjson")).unwrap();
        assert_eq!(content, b"{\"a\":1}\n{\"b\":2}\n");
    }

    #[test]
    fn test_write_overwrites() {
        let temp = TempDir::new().unwrap();
        let writer = SnapshotWriter::new(temp.path());
        writer
            .write_json("transforms.json", &json!({"count": 1, "transforms": [{"id": "long"}]}))
            .unwrap();
        writer.write_json("transforms.json", &json!({"count": 0})).unwrap();
        let content = std::fs::read_to_string(temp.path().join("transforms.json")).unwrap();
        assert_eq!(content, r#"{"count":0}"#);
    }

    #[test]
    fn test_write_failure_names_file() {
        let temp = TempDir::new().unwrap();
        let writer = SnapshotWriter::new(temp.path().join("missing-dir"));
        let err = writer.write_json("xpack_usage.json", &json!({})).unwrap_err();
        match err {
            Error::WriteFailed { filename, .. } => assert_eq!(filename, "xpack_usage.json"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_item_filename_plain_names_unchanged() {
        assert_eq!(
            ExportArtifact::item_filename("template", "logs-template"),
            "template_logs-template.json"
        );
        assert_eq!(
            ExportArtifact::item_filename("watch", "cpu alert ü"),
            "watch_cpu alert ü.json"
        );
    }

    #[test]
    fn test_item_filename_encodes_separators() {
        assert_eq!(
            ExportArtifact::item_filename("pipeline", "../etc/passwd"),
            "pipeline_..%2Fetc%2Fpasswd.json"
        );
        assert_eq!(encode_filename_component("a\\b:c"), "a%5Cb%3Ac");
        assert_eq!(encode_filename_component("100%"), "100%25");
        assert_eq!(encode_filename_component("tab\there"), "tab%09here");
        assert_eq!(encode_filename_component(".."), "%2E%2E");
        assert_eq!(encode_filename_component("."), "%2E");
    }
}
