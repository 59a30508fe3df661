use smm_featurizer::features::tfidf::{Vectorizer, VectorizerParams};

fn terms(vectorizer: &Vectorizer) -> Vec<String> {
    vectorizer.entries().map(|(t, _)| t.to_string()).collect()
}

#[test]
fn document_frequency_band_is_inclusive() {
    // Ten documents: df("common")=10, df("frequent")=9, df("mid")=5, df("rare")=1.
    let mut corpus: Vec<String> = Vec::new();
    for i in 0..10 {
        let mut doc = String::from("common");
        if i < 9 {
            doc.push_str(" frequent");
        }
        if i < 5 {
            doc.push_str(" mid");
        }
        if i == 0 {
            doc.push_str(" rare");
        }
        corpus.push(doc);
    }
    let vectorizer = Vectorizer::fit(&corpus, VectorizerParams::default());
    assert_eq!(terms(&vectorizer), vec!["frequent", "mid"]);

    let (_, entry) = vectorizer
        .entries()
        .find(|(term, _)| *term == "frequent")
        .unwrap();
    assert_eq!(entry.document_frequency, 9);
    let expected_idf = (11.0f64 / 10.0).ln() + 1.0;
    assert!((entry.idf - expected_idf).abs() < 1e-12);
}

#[test]
fn cap_keeps_highest_corpus_frequency() {
    let params = VectorizerParams {
        min_df: 1,
        max_df: 1.0,
        max_features: 2,
    };
    let vectorizer = Vectorizer::fit(&["aa bb bb cc cc cc", "aa cc"], params);
    // cc outranks the aa/bb tie; aa wins the tie alphabetically.
    assert_eq!(terms(&vectorizer), vec!["aa", "cc"]);
}

#[test]
fn transform_is_l2_normalized() {
    let params = VectorizerParams {
        min_df: 1,
        max_df: 1.0,
        max_features: 100,
    };
    let vectorizer = Vectorizer::fit(&["aa bb", "aa cc"], params);
    let weights = vectorizer.transform("cc cc aa");
    assert_eq!(weights.len(), 2);
    let squared: f64 = weights.iter().map(|(_, w)| w * w).sum();
    assert!((squared - 1.0).abs() < 1e-9);
    // Indices follow the alphabetical vocabulary order.
    assert!(weights[0].0 < weights[1].0);
}

#[test]
fn stop_words_and_short_tokens_are_excluded() {
    let params = VectorizerParams {
        min_df: 1,
        max_df: 1.0,
        max_features: 100,
    };
    let vectorizer = Vectorizer::fit(&["the cat sat on a mat"], params);
    assert_eq!(terms(&vectorizer), vec!["cat", "mat", "sat"]);
}

#[test]
fn empty_corpus_fits_empty_vocabulary() {
    let corpus: Vec<String> = Vec::new();
    let vectorizer = Vectorizer::fit(&corpus, VectorizerParams::default());
    assert!(vectorizer.is_empty());
    assert!(vectorizer.transform("anything at all").is_empty());
}

#[test]
fn unseen_terms_score_nothing() {
    let params = VectorizerParams {
        min_df: 1,
        max_df: 1.0,
        max_features: 100,
    };
    let vectorizer = Vectorizer::fit(&["alpha beta", "alpha gamma"], params);
    assert!(vectorizer.transform("delta epsilon").is_empty());
}

#[test]
fn vocabulary_round_trips_through_json() {
    let params = VectorizerParams {
        min_df: 1,
        max_df: 1.0,
        max_features: 10,
    };
    let vectorizer = Vectorizer::fit(&["alpha beta", "alpha gamma"], params);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vocab.json");
    vectorizer.save(&path).unwrap();
    let loaded = Vectorizer::load(&path).unwrap();
    assert_eq!(vectorizer, loaded);
}

#[test]
fn fitted_vocabulary_preview_is_stable() {
    let params = VectorizerParams {
        min_df: 1,
        max_df: 1.0,
        max_features: 10,
    };
    let vectorizer = Vectorizer::fit(&["alpha beta", "alpha gamma"], params);
    let preview: Vec<String> = vectorizer
        .entries()
        .map(|(term, entry)| format!("{term} df={} idf={:.4}", entry.document_frequency, entry.idf))
        .collect();
    insta::assert_snapshot!(preview.join("\n"), @r###"
    alpha df=2 idf=1.0000
    beta df=1 idf=1.4055
    gamma df=1 idf=1.4055
    "###);
}
