//! Author-history aggregation broadcast onto current records.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    features::{row::FeatureRow, textual},
    nlp::{lexicon::LexiconSet, text},
    store::records::{RecordField, RecordQuery, RecordStore},
};

/// Reduced per-history-document row: lengths and dictionary counts only,
/// no POS breakdown.
pub fn history_row(raw_text: &str, lexicons: &LexiconSet) -> FeatureRow {
    let sentences = text::sentence_tokens(raw_text);
    let mut row = FeatureRow::new();
    // Same raw-length convention as the per-post extractor.
    row.insert_number("timeline_length_text", raw_text.chars().count() as f64);
    let token_count: usize = sentences.iter().map(Vec::len).sum();
    row.insert_number("timeline_number_words", token_count as f64);
    for lexicon in lexicons.iter() {
        let matches = textual::match_document(lexicon, &sentences);
        row.insert_number(
            format!("timeline_number_({})", lexicon.kind().label()),
            matches.len() as f64,
        );
    }
    row.sparsify();
    row
}

/// Sum of reduced rows over one author's bounded history.
///
/// A zero-history author yields an empty row, never an error.
pub fn author_aggregate(
    timelines: &dyn RecordStore,
    author_id: &str,
    history_limit: usize,
    lexicons: &LexiconSet,
) -> Result<FeatureRow, crate::store::StoreError> {
    let query = RecordQuery::new()
        .author(author_id)
        .fields(&[RecordField::Text])
        .recent_first()
        .limit(history_limit);
    let history = timelines.query(&query)?;
    let mut aggregate = FeatureRow::new();
    for record in &history {
        aggregate.add_assign(&history_row(&record.text, lexicons));
    }
    debug!(author_id, documents = history.len(), "aggregated timeline");
    Ok(aggregate)
}

/// One aggregate per unique author, computed once and broadcast by the
/// assembler to every record sharing the author id.
///
/// A store failure for one author degrades that author's row to empty.
pub fn aggregate_authors<'a, I>(
    timelines: &dyn RecordStore,
    authors: I,
    history_limit: usize,
    lexicons: &LexiconSet,
) -> HashMap<String, FeatureRow>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut aggregates = HashMap::new();
    for author_id in authors {
        if aggregates.contains_key(author_id) {
            continue;
        }
        let row = match author_aggregate(timelines, author_id, history_limit, lexicons) {
            Ok(row) => row,
            Err(err) => {
                warn!(author_id, %err, "timeline fetch failed; emitting empty aggregate");
                FeatureRow::new()
            }
        };
        aggregates.insert(author_id.to_string(), row);
    }
    aggregates
}
