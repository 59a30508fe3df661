//! Record corpus read interface and the JSONL-backed store.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::StoreError;

/// Author profile counters carried on each record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub friends: u64,
    pub followers: u64,
    pub statuses: u64,
}

/// One post to be featurized, the unit of the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub author_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<AuthorProfile>,
    /// Ground-truth class; absent for inference-time records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<i64>,
    /// Task memberships used by batch filters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<String>,
}

/// Whitelisted projection fields; `id` and `author_id` are always returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Text,
    Timestamp,
    Profile,
    Label,
}

/// Query contract for record corpora.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    task: Option<String>,
    author_id: Option<String>,
    fields: Option<Vec<RecordField>>,
    limit: Option<usize>,
    recent_first: bool,
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to records belonging to one task.
    pub fn task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Restrict to one author's records.
    pub fn author(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    /// Project only the given fields (plus the id and author id).
    pub fn fields(mut self, fields: &[RecordField]) -> Self {
        self.fields = Some(fields.to_vec());
        self
    }

    /// Bound the number of returned rows.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Order by timestamp descending before applying the limit.
    pub fn recent_first(mut self) -> Self {
        self.recent_first = true;
        self
    }

    /// Whether a record satisfies the filter portion of the query.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(task) = &self.task {
            if !record.tasks.iter().any(|t| t == task) {
                return false;
            }
        }
        if let Some(author_id) = &self.author_id {
            if &record.author_id != author_id {
                return false;
            }
        }
        true
    }

    fn project(&self, mut record: Record) -> Record {
        let Some(fields) = &self.fields else {
            return record;
        };
        if !fields.contains(&RecordField::Text) {
            record.text.clear();
        }
        if !fields.contains(&RecordField::Timestamp) {
            record.timestamp = None;
        }
        if !fields.contains(&RecordField::Profile) {
            record.profile = None;
        }
        if !fields.contains(&RecordField::Label) {
            record.label = None;
        }
        record
    }
}

/// Read interface over a record corpus.
pub trait RecordStore: Send + Sync {
    fn query(&self, query: &RecordQuery) -> Result<Vec<Record>, StoreError>;
}

/// JSONL-backed corpus: one JSON record per line.
#[derive(Debug, Clone)]
pub struct JsonlRecordStore {
    path: PathBuf,
}

impl JsonlRecordStore {
    /// Open an existing corpus file; a missing file is a hard failure.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(StoreError::Unavailable { path });
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonlRecordStore {
    fn query(&self, query: &RecordQuery) -> Result<Vec<Record>, StoreError> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Record>(&line) {
                Ok(record) if query.matches(&record) => rows.push(record),
                Ok(_) => {}
                Err(err) => {
                    skipped += 1;
                    warn!(path = %self.path.display(), %err, "skipping malformed record");
                }
            }
        }
        if skipped > 0 {
            warn!(path = %self.path.display(), skipped, "corpus contained malformed lines");
        }
        if query.recent_first {
            // None timestamps sort last so the bounded window prefers dated rows
            rows.sort_by_key(|r| std::cmp::Reverse(r.timestamp));
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows.into_iter().map(|r| query.project(r)).collect())
    }
}
