//! Sparse feature rows shared by the extractors and the assembler.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Decimal digits kept when rows are finalized for storage.
pub const STORAGE_DECIMALS: i32 = 6;

/// Round to the storage precision.
pub(crate) fn round_store(value: f64) -> f64 {
    let scale = 10f64.powi(STORAGE_DECIMALS);
    (value * scale).round() / scale
}

/// Value of one feature column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl FeatureValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(value) => Some(*value),
            FeatureValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Number(_) => None,
            FeatureValue::Text(value) => Some(value),
        }
    }
}

/// Sparse mapping of feature name to value for one record or author.
///
/// A missing key means "zero/unobserved" for count families and "undefined"
/// for ratio-like features; nothing here distinguishes the two, callers encode
/// undefined values by never inserting them (`insert_opt` with `None`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    values: IndexMap<String, FeatureValue>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a numeric value; zero is kept (dense families call this).
    pub fn insert_number(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), FeatureValue::Number(value));
    }

    /// Insert a numeric value only when defined; `None` is the absent marker.
    pub fn insert_opt(&mut self, name: impl Into<String>, value: Option<f64>) {
        if let Some(value) = value {
            self.insert_number(name, value);
        }
    }

    /// Insert a categorical value.
    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values
            .insert(name.into(), FeatureValue::Text(value.into()));
    }

    /// Drop every numeric entry equal to zero.
    ///
    /// The single sparsify operation applied by every drop-zero feature family
    /// (POS counts, dictionary-match counts, sentiment scores).
    pub fn sparsify(&mut self) {
        self.values
            .retain(|_, value| !matches!(value, FeatureValue::Number(n) if *n == 0.0));
    }

    /// Outer-join another source's keys into this row.
    pub fn merge(&mut self, other: FeatureRow) {
        for (name, value) in other.values {
            self.values.insert(name, value);
        }
    }

    /// Add numeric values key-wise, treating missing keys as zero.
    pub fn add_assign(&mut self, other: &FeatureRow) {
        for (name, value) in &other.values {
            let Some(increment) = value.as_number() else {
                continue;
            };
            match self.values.get_mut(name) {
                Some(FeatureValue::Number(total)) => *total += increment,
                Some(FeatureValue::Text(_)) => {}
                None => self.insert_number(name.clone(), increment),
            }
        }
    }

    /// Round numerics to the storage precision and drop non-finite values.
    ///
    /// Non-finite numbers are undefined features and must never be stored.
    pub fn finalized(mut self) -> Self {
        self.values.retain(|_, value| match value {
            FeatureValue::Number(n) if !n.is_finite() => false,
            FeatureValue::Number(n) => {
                *n = round_store(*n);
                true
            }
            FeatureValue::Text(_) => true,
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.values.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(FeatureValue::as_number)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn into_inner(self) -> IndexMap<String, FeatureValue> {
        self.values
    }
}

impl FromIterator<(String, FeatureValue)> for FeatureRow {
    fn from_iter<T: IntoIterator<Item = (String, FeatureValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
