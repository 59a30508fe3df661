//! Sentiment scoring over fixed emotion dimensions.
//!
//! Lexicon-based fallback scorer. Swap with a model-backed scorer behind the
//! same trait when one is available.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use once_cell::sync::Lazy;

use crate::nlp::text;

/// Trait for sentiment scorer implementations.
pub trait SentimentScorer: Send + Sync {
    /// Average per-dimension scores for a raw text.
    ///
    /// Scores may be zero or negative; callers drop zero entries.
    fn average_scores(&self, text: &str) -> Result<BTreeMap<String, f64>>;
}

/// `word -> (dimension, weight)` associations for the fallback scorer.
static EMOTION_LEXICON: Lazy<HashMap<&'static str, &'static [(&'static str, f64)]>> =
    Lazy::new(|| {
        let entries: &[(&str, &[(&str, f64)])] = &[
            ("love", &[("positive", 1.0), ("joy", 1.0)]),
            ("like", &[("positive", 1.0)]),
            ("great", &[("positive", 1.0), ("joy", 1.0)]),
            ("good", &[("positive", 1.0), ("trust", 1.0)]),
            ("happy", &[("positive", 1.0), ("joy", 1.0)]),
            ("relief", &[("positive", 1.0), ("trust", 1.0)]),
            ("better", &[("positive", 1.0), ("anticipation", 1.0)]),
            ("helps", &[("positive", 1.0), ("trust", 1.0)]),
            ("helped", &[("positive", 1.0), ("trust", 1.0)]),
            ("works", &[("positive", 1.0), ("trust", 1.0)]),
            ("cured", &[("positive", 1.0), ("joy", 1.0)]),
            ("safe", &[("positive", 1.0), ("trust", 1.0)]),
            ("hope", &[("positive", 1.0), ("anticipation", 1.0)]),
            ("hate", &[("negative", 1.0), ("anger", 1.0), ("disgust", 1.0)]),
            ("bad", &[("negative", 1.0)]),
            ("awful", &[("negative", 1.0), ("disgust", 1.0)]),
            ("terrible", &[("negative", 1.0), ("fear", 1.0)]),
            ("horrible", &[("negative", 1.0), ("disgust", 1.0), ("fear", 1.0)]),
            ("worst", &[("negative", 1.0), ("anger", 1.0)]),
            ("sad", &[("negative", 1.0), ("sadness", 1.0)]),
            ("angry", &[("negative", 1.0), ("anger", 1.0)]),
            ("scared", &[("negative", 1.0), ("fear", 1.0)]),
            ("afraid", &[("negative", 1.0), ("fear", 1.0)]),
            ("worried", &[("negative", 1.0), ("fear", 1.0), ("sadness", 1.0)]),
            ("anxious", &[("negative", 1.0), ("fear", 1.0), ("anticipation", 1.0)]),
            ("sick", &[("negative", 1.0), ("disgust", 1.0), ("sadness", 1.0)]),
            ("pain", &[("negative", 1.0), ("sadness", 1.0), ("fear", 1.0)]),
            ("hurts", &[("negative", 1.0), ("sadness", 1.0)]),
            ("tired", &[("negative", 1.0), ("sadness", 1.0)]),
            ("dizzy", &[("negative", 1.0)]),
            ("nausea", &[("negative", 1.0), ("disgust", 1.0)]),
            ("died", &[("negative", 1.0), ("sadness", 1.0), ("fear", 1.0)]),
            ("kill", &[("negative", 1.0), ("anger", 1.0), ("fear", 1.0)]),
            ("surprised", &[("surprise", 1.0)]),
            ("suddenly", &[("surprise", 1.0)]),
            ("finally", &[("anticipation", 1.0), ("joy", 1.0)]),
            ("wow", &[("surprise", 1.0), ("positive", 1.0)]),
        ];
        entries.iter().copied().collect()
    });

/// Emotion-lexicon fallback scorer averaging word weights over token count.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconSentiment;

impl SentimentScorer for LexiconSentiment {
    fn average_scores(&self, text: &str) -> Result<BTreeMap<String, f64>> {
        let words: Vec<String> = text::sentence_tokens(text)
            .into_iter()
            .flatten()
            .filter(|token| token.chars().any(char::is_alphanumeric))
            .collect();
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        if words.is_empty() {
            return Ok(totals);
        }
        for word in &words {
            if let Some(dimensions) = EMOTION_LEXICON.get(word.as_str()) {
                for (dimension, weight) in dimensions.iter() {
                    *totals.entry((*dimension).to_string()).or_insert(0.0) += weight;
                }
            }
        }
        let count = words.len() as f64;
        for value in totals.values_mut() {
            *value /= count;
        }
        Ok(totals)
    }
}
