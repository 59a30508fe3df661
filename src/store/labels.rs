//! Ground-truth class table for one task.

use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
struct LabelRow {
    record_id: String,
    author_id: String,
    category: i64,
}

/// Labeled classes: record category plus per-author positive-case counts.
///
/// An empty table is valid and turns every label-derived feature absent,
/// which is the inference-time configuration.
#[derive(Debug, Clone, Default)]
pub struct ClassLabels {
    categories: HashMap<String, i64>,
    positive_cases: HashMap<String, u64>,
}

impl ClassLabels {
    /// Load from CSV columns `record_id,author_id,category`.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("opening class table {}", path.display()))?;
        let mut labels = Self::default();
        for result in reader.deserialize() {
            let row: LabelRow = result?;
            if row.category == 1 {
                *labels.positive_cases.entry(row.author_id).or_insert(0) += 1;
            }
            labels.categories.insert(row.record_id, row.category);
        }
        info!(records = labels.categories.len(), "loaded class labels");
        Ok(labels)
    }

    /// Build from in-memory `(record_id, author_id, category)` rows.
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, i64)>,
    {
        let mut labels = Self::default();
        for (record_id, author_id, category) in rows {
            if category == 1 {
                *labels
                    .positive_cases
                    .entry(author_id.to_string())
                    .or_insert(0) += 1;
            }
            labels.categories.insert(record_id.to_string(), category);
        }
        labels
    }

    pub fn category(&self, record_id: &str) -> Option<i64> {
        self.categories.get(record_id).copied()
    }

    pub fn positive_cases(&self, author_id: &str) -> Option<u64> {
        self.positive_cases.get(author_id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
