use smm_featurizer::{
    features::timeline::{aggregate_authors, history_row},
    nlp::lexicon::{Lexicon, LexiconKind, LexiconSet},
    store::{
        records::{Record, RecordQuery, RecordStore},
        StoreError,
    },
};

fn lexicons() -> LexiconSet {
    LexiconSet::new(
        Lexicon::from_entries(LexiconKind::Drug, [("drug", 10, "Generic")]),
        Lexicon::from_entries(LexiconKind::MedicalTerm, [("headache", 20, "Neurological")]),
        Lexicon::from_entries(LexiconKind::NaturalProduct, []),
    )
}

fn record(id: &str, author: &str, text: &str) -> Record {
    Record {
        id: id.to_string(),
        author_id: author.to_string(),
        text: text.to_string(),
        timestamp: None,
        profile: None,
        label: None,
        tasks: Vec::new(),
    }
}

struct FixedStore(Vec<Record>);

impl RecordStore for FixedStore {
    fn query(&self, query: &RecordQuery) -> Result<Vec<Record>, StoreError> {
        Ok(self.0.iter().filter(|r| query.matches(r)).cloned().collect())
    }
}

struct FailingStore;

impl RecordStore for FailingStore {
    fn query(&self, _query: &RecordQuery) -> Result<Vec<Record>, StoreError> {
        Err(StoreError::Unavailable {
            path: "/missing/timelines.jsonl".into(),
        })
    }
}

#[test]
fn history_row_has_no_pos_breakdown() {
    let row = history_row("My headache today", &lexicons());
    assert_eq!(row.number("timeline_length_text"), Some(17.0));
    assert_eq!(row.number("timeline_number_words"), Some(3.0));
    assert_eq!(row.number("timeline_number_(MedicalTerms)"), Some(1.0));
    assert!(!row.contains("text_number_of_(NOUN)"));
    assert!(!row.contains("post_number_words"));
}

#[test]
fn history_length_counts_raw_characters() {
    let row = history_row("see https://example.com my headache", &lexicons());
    assert_eq!(row.number("timeline_length_text"), Some(35.0));
    assert_eq!(row.number("timeline_number_words"), Some(3.0));
    assert_eq!(row.number("timeline_number_(MedicalTerms)"), Some(1.0));
}

#[test]
fn history_rows_sum_per_author() {
    let store = FixedStore(vec![
        record("t1", "a1", "My headache today"),
        record("t2", "a1", "My headache today"),
        record("t3", "a1", "My headache today"),
        record("t4", "someone_else", "My headache today"),
    ]);
    let aggregates = aggregate_authors(&store, ["a1"], 100, &lexicons());
    let row = &aggregates["a1"];
    assert_eq!(row.number("timeline_number_(MedicalTerms)"), Some(3.0));
    assert_eq!(row.number("timeline_number_words"), Some(9.0));
    assert_eq!(row.number("timeline_length_text"), Some(51.0));
}

#[test]
fn author_without_history_gets_empty_row() {
    let store = FixedStore(Vec::new());
    let aggregates = aggregate_authors(&store, ["a1"], 100, &lexicons());
    assert!(aggregates["a1"].is_empty());
}

#[test]
fn store_failure_degrades_to_empty_row() {
    let aggregates = aggregate_authors(&FailingStore, ["a1"], 100, &lexicons());
    assert!(aggregates["a1"].is_empty());
}

#[test]
fn duplicate_authors_evaluate_once() {
    let store = FixedStore(vec![record("t1", "a1", "drug")]);
    let aggregates = aggregate_authors(&store, ["a1", "a1", "a1"], 100, &lexicons());
    assert_eq!(aggregates.len(), 1);
    assert_eq!(aggregates["a1"].number("timeline_number_(Drugs)"), Some(1.0));
}
