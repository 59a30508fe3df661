//! Record corpora and feature-store access layer.

pub mod features;
pub mod labels;
pub mod records;

use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the store contracts.
///
/// Total unavailability of a corpus is the only hard failure; malformed
/// individual documents are skipped and reported by the callers instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("corpus unavailable at {}", path.display())]
    Unavailable { path: PathBuf },
    #[error("store i/o failure: {0}")]
    Io(#[from] std::io::Error),
}
