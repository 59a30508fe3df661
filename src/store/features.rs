//! Feature-table persistence: drop-then-insert with per-row tolerance.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{features::row::FeatureValue, store::StoreError};

/// One serialized feature row, keyed by the record identifier.
///
/// Only present keys are stored; absent features never appear, so documents
/// vary in width per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDoc {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub features: IndexMap<String, FeatureValue>,
}

/// Outcome of one bulk write.
#[derive(Debug, Default)]
pub struct WriteReport {
    pub inserted: usize,
    /// `(record id, reason)` for rows that could not be written.
    pub failed: Vec<(String, String)>,
}

/// Write interface for the assembled feature table.
pub trait FeatureStore: Send + Sync {
    /// Drop the existing row set and insert the new one.
    ///
    /// Insertion is best-effort per row (`ordered=false` semantics): a failed
    /// row is reported and skipped, the rest of the batch is written.
    fn replace_all(&self, docs: &[FeatureDoc]) -> Result<WriteReport, StoreError>;
}

/// JSONL-backed feature store: one JSON document per line.
#[derive(Debug, Clone)]
pub struct JsonlFeatureStore {
    path: PathBuf,
}

impl JsonlFeatureStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeatureStore for JsonlFeatureStore {
    fn replace_all(&self, docs: &[FeatureDoc]) -> Result<WriteReport, StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // File::create truncates: the drop half of drop-then-insert
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut report = WriteReport::default();
        for doc in docs {
            match serde_json::to_string(doc) {
                Ok(line) => {
                    writer.write_all(line.as_bytes())?;
                    writer.write_all(b"\n")?;
                    report.inserted += 1;
                }
                Err(err) => {
                    warn!(id = %doc.id, %err, "skipping unserializable feature row");
                    report.failed.push((doc.id.clone(), err.to_string()));
                }
            }
        }
        writer.flush()?;
        info!(
            path = %self.path.display(),
            inserted = report.inserted,
            failed = report.failed.len(),
            "replaced feature rows"
        );
        Ok(report)
    }
}
