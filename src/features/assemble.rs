//! Feature-table assembly and column-oriented export.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use indexmap::{IndexMap, IndexSet};
use polars::prelude::{DataFrame, NamedFrom, ParquetWriter, PolarsResult, Series};
use tracing::info;

use crate::{
    features::row::{round_store, FeatureRow, FeatureValue},
    store::features::FeatureDoc,
};

/// Accumulated feature table, one row per record id in first-merge order.
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    rows: IndexMap<String, FeatureRow>,
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outer-join `row` into the record's accumulated row, creating the
    /// record on first sight.
    pub fn merge(&mut self, id: impl Into<String>, row: FeatureRow) {
        self.rows.entry(id.into()).or_default().merge(row);
    }

    pub fn get(&self, id: &str) -> Option<&FeatureRow> {
        self.rows.get(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in first-appearance order across all rows.
    pub fn schema(&self) -> Vec<String> {
        let mut names: IndexSet<&str> = IndexSet::new();
        for row in self.rows.values() {
            for (name, _) in row.iter() {
                names.insert(name);
            }
        }
        names.into_iter().map(str::to_string).collect()
    }

    /// Storage form: rounded, non-finite values dropped, one document per
    /// record.
    pub fn into_docs(self) -> Vec<FeatureDoc> {
        self.rows
            .into_iter()
            .map(|(id, row)| FeatureDoc {
                id,
                features: row.finalized().into_inner(),
            })
            .collect()
    }

    /// Column-oriented view for the parquet snapshot.
    ///
    /// Absent numerics become nulls except in tf-idf columns, which are
    /// zero-filled dense.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let ids: Vec<String> = self.rows.keys().cloned().collect();
        let mut columns = vec![Series::new("_id".into(), ids)];
        for name in self.schema() {
            let series = if self.is_text_column(&name) {
                let values: Vec<Option<String>> = self
                    .rows
                    .values()
                    .map(|row| {
                        row.get(&name)
                            .and_then(FeatureValue::as_text)
                            .map(str::to_string)
                    })
                    .collect();
                Series::new(name.as_str().into(), values)
            } else if name.starts_with("post_tfidf_") {
                let values: Vec<f64> = self
                    .rows
                    .values()
                    .map(|row| {
                        row.number(&name)
                            .filter(|value| value.is_finite())
                            .map_or(0.0, round_store)
                    })
                    .collect();
                Series::new(name.as_str().into(), values)
            } else {
                let values: Vec<Option<f64>> = self
                    .rows
                    .values()
                    .map(|row| {
                        row.number(&name)
                            .filter(|value| value.is_finite())
                            .map(round_store)
                    })
                    .collect();
                Series::new(name.as_str().into(), values)
            };
            columns.push(series);
        }
        DataFrame::new(columns)
    }

    /// Writes the parquet snapshot mirroring the primary store content.
    pub fn write_parquet(&self, path: &Path) -> Result<()> {
        let mut df = self.to_dataframe().context("building feature dataframe")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        ParquetWriter::new(file).finish(&mut df)?;
        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "wrote feature snapshot"
        );
        Ok(())
    }

    fn is_text_column(&self, name: &str) -> bool {
        self.rows
            .values()
            .find_map(|row| row.get(name))
            .is_some_and(|value| matches!(value, FeatureValue::Text(_)))
    }
}
