use chrono::{DateTime, TimeZone, Utc};
use smm_featurizer::{
    features::{
        row::FeatureValue,
        tfidf::VectorizerParams,
        BuildArtifacts, BuildOptions, Pipeline,
    },
    nlp::{
        lexicon::{Lexicon, LexiconKind, LexiconSet},
        sentiment::LexiconSentiment,
        tagger::RuleTagger,
    },
    store::{
        features::{FeatureStore, JsonlFeatureStore},
        labels::ClassLabels,
        records::{AuthorProfile, Record, RecordQuery, RecordStore},
        StoreError,
    },
};

struct FixedStore(Vec<Record>);

impl RecordStore for FixedStore {
    fn query(&self, query: &RecordQuery) -> Result<Vec<Record>, StoreError> {
        Ok(self.0.iter().filter(|r| query.matches(r)).cloned().collect())
    }
}

fn record(
    id: &str,
    author: &str,
    text: &str,
    timestamp: Option<DateTime<Utc>>,
    profile: Option<AuthorProfile>,
) -> Record {
    Record {
        id: id.to_string(),
        author_id: author.to_string(),
        text: text.to_string(),
        timestamp,
        profile,
        label: None,
        tasks: vec!["task_1".to_string()],
    }
}

fn posts() -> FixedStore {
    FixedStore(vec![
        record(
            "p1",
            "a1",
            "I love this drug so much",
            Some(Utc.with_ymd_and_hms(2021, 1, 15, 9, 0, 0).unwrap()),
            Some(AuthorProfile {
                friends: 10,
                followers: 0,
                statuses: 50,
            }),
        ),
        record(
            "p2",
            "a2",
            "The drug gave me a headache yesterday",
            Some(Utc.with_ymd_and_hms(2021, 7, 4, 18, 0, 0).unwrap()),
            Some(AuthorProfile {
                friends: 50,
                followers: 100,
                statuses: 200,
            }),
        ),
        record("p3", "a1", "Taking my drug again", None, None),
    ])
}

fn timelines() -> FixedStore {
    FixedStore(vec![
        record("t1", "a1", "Headache again", None, None),
        record("t2", "a1", "Headache again", None, None),
        record("t3", "a1", "Headache again", None, None),
    ])
}

fn lexicons() -> LexiconSet {
    LexiconSet::new(
        Lexicon::from_entries(LexiconKind::Drug, [("drug", 10, "Generic")]),
        Lexicon::from_entries(LexiconKind::MedicalTerm, [("headache", 20, "Neurological")]),
        Lexicon::from_entries(LexiconKind::NaturalProduct, []),
    )
}

fn options() -> BuildOptions {
    BuildOptions {
        task: "task_1".to_string(),
        batch_limit: 100,
        history_limit: 100,
        params: VectorizerParams {
            min_df: 1,
            max_df: 1.0,
            max_features: 100,
        },
        frozen: None,
    }
}

fn build() -> BuildArtifacts {
    let posts = posts();
    let timelines = timelines();
    let labels = ClassLabels::from_rows([("p1", "a1", 1), ("p2", "a2", 0)]);
    let lexicons = lexicons();
    let tagger = RuleTagger;
    let sentiment = LexiconSentiment;
    let pipeline = Pipeline {
        posts: &posts,
        timelines: &timelines,
        labels: &labels,
        lexicons: &lexicons,
        tagger: &tagger,
        sentiment: &sentiment,
    };
    pipeline.build(options()).unwrap()
}

#[test]
fn assembles_every_block_per_record() {
    let artifacts = build();
    assert_eq!(artifacts.table.len(), 3);

    let p1 = artifacts.table.get("p1").unwrap();
    assert_eq!(p1.number("y"), Some(1.0));
    assert_eq!(p1.number("user_number_friends"), Some(10.0));
    assert!(!p1.contains("user_ratio_friends_followers"));
    assert!((p1.number("user_ratio_positive_negative_cases").unwrap() - 1.0 / 49.0).abs() < 1e-12);
    assert_eq!(p1.number("temp_hour_of_day"), Some(9.0));
    assert_eq!(
        p1.get("temp_season").and_then(FeatureValue::as_text),
        Some("winter")
    );
    assert!(p1.number("sent_positive").is_some());
    assert_eq!(p1.number("timeline_number_(MedicalTerms)"), Some(3.0));
    assert_eq!(p1.number("post_number_words"), Some(6.0));
    assert_eq!(p1.number("post_number_(Drugs)"), Some(1.0));
    assert!(p1.contains("post_tfidf_(love)"));
    assert!(p1.contains("post_tfidf_(drug)"));
    assert_eq!(p1.number("post_tfidf_parent_(generic)"), Some(1.0));
}

#[test]
fn zero_label_is_kept_and_absent_blocks_stay_absent() {
    let artifacts = build();
    let p2 = artifacts.table.get("p2").unwrap();
    assert_eq!(p2.number("y"), Some(0.0));
    assert_eq!(p2.number("user_ratio_friends_followers"), Some(0.5));
    assert!(!p2.contains("user_number_positive_cases"));
    assert!(!p2.contains("sent_positive"));
    assert!(!p2.contains("timeline_number_words"));
    assert_eq!(p2.number("post_number_(MedicalTerms)"), Some(1.0));
    assert!(p2.contains("post_tfidf_parent_(neurological)"));
}

#[test]
fn timeline_aggregate_broadcasts_to_every_author_record() {
    let artifacts = build();
    let p1 = artifacts.table.get("p1").unwrap();
    let p3 = artifacts.table.get("p3").unwrap();
    for name in [
        "timeline_length_text",
        "timeline_number_words",
        "timeline_number_(MedicalTerms)",
    ] {
        assert_eq!(p1.number(name), p3.number(name), "{name}");
        assert!(p1.number(name).is_some(), "{name}");
    }
}

#[test]
fn unlabeled_record_without_metadata_degrades_to_absent_keys() {
    let artifacts = build();
    let p3 = artifacts.table.get("p3").unwrap();
    assert!(!p3.contains("y"));
    assert!(!p3.contains("user_number_friends"));
    assert!(!p3.contains("temp_season"));
    assert_eq!(p3.number("user_number_positive_cases"), Some(1.0));
    assert_eq!(p3.number("post_number_(Drugs)"), Some(1.0));
}

#[test]
fn mention_handles_reach_the_vocabulary() {
    let posts = FixedStore(vec![record(
        "p1",
        "a1",
        "@buddy the drug helped me",
        None,
        None,
    )]);
    let timelines = FixedStore(Vec::new());
    let labels = ClassLabels::default();
    let lexicons = lexicons();
    let tagger = RuleTagger;
    let sentiment = LexiconSentiment;
    let pipeline = Pipeline {
        posts: &posts,
        timelines: &timelines,
        labels: &labels,
        lexicons: &lexicons,
        tagger: &tagger,
        sentiment: &sentiment,
    };
    let artifacts = pipeline.build(options()).unwrap();

    // The fit sees the post as authored; only the vectorizer's own
    // tokenization applies, so the handle becomes a term.
    assert!(artifacts
        .post_vectorizer
        .entries()
        .any(|(term, _)| term == "buddy"));
    let p1 = artifacts.table.get("p1").unwrap();
    assert!(p1.contains("post_tfidf_(buddy)"));
    assert!(p1.contains("post_tfidf_(drug)"));
}

#[test]
fn rebuild_is_idempotent() {
    let docs_first = build().table.into_docs();
    let docs_second = build().table.into_docs();
    assert_eq!(docs_first, docs_second);
}

#[test]
fn docs_round_to_storage_precision() {
    let docs = build().table.into_docs();
    let p1 = docs.iter().find(|d| d.id == "p1").unwrap();
    assert_eq!(
        p1.features.get("user_ratio_positive_negative_cases"),
        Some(&FeatureValue::Number(0.020408))
    );
}

#[test]
fn feature_store_replaces_rows_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonlFeatureStore::new(dir.path().join("features/task_1_features.jsonl"));

    let docs = build().table.into_docs();
    let report = store.replace_all(&docs).unwrap();
    assert_eq!(report.inserted, 3);
    assert!(report.failed.is_empty());

    let content = std::fs::read_to_string(store.path()).unwrap();
    assert_eq!(content.lines().count(), 3);
    let first = content.lines().next().unwrap();
    assert!(first.contains("\"_id\":\"p1\""));
    assert!(!first.contains("user_ratio_friends_followers"));

    // A second replace drops rows missing from the new batch.
    let report = store.replace_all(&docs[..1]).unwrap();
    assert_eq!(report.inserted, 1);
    let content = std::fs::read_to_string(store.path()).unwrap();
    assert_eq!(content.lines().count(), 1);
}
