//! Feature engineering pipeline for social-media health-mining tasks.
//!
//! Reads task-scoped post corpora, extracts user-profile, temporal,
//! sentiment, timeline, textual, and tf-idf feature blocks, and replaces
//! the per-task feature store with the assembled table.

pub mod cli;
pub mod config;
pub mod features;
pub mod logging;
pub mod nlp;
pub mod store;
