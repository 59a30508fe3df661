//! Part-of-speech tagging over the universal tagset.
//!
//! Lightweight rule-based fallback. Swap with a model-backed tagger behind the
//! same trait when one is available.

use std::collections::HashSet;

use anyhow::Result;
use once_cell::sync::Lazy;

/// Closed universal tagset produced by every tagger implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    Verb,
    Noun,
    Pron,
    Adj,
    Adv,
    Adp,
    Conj,
    Det,
    Num,
    Prt,
    Other,
    Punct,
}

impl PosTag {
    /// All tags in feature-name order.
    pub const ALL: [PosTag; 12] = [
        PosTag::Verb,
        PosTag::Noun,
        PosTag::Pron,
        PosTag::Adj,
        PosTag::Adv,
        PosTag::Adp,
        PosTag::Conj,
        PosTag::Det,
        PosTag::Num,
        PosTag::Prt,
        PosTag::Other,
        PosTag::Punct,
    ];

    /// Label used inside feature names, e.g. `text_number_of_(VERB)`.
    pub fn label(self) -> &'static str {
        match self {
            PosTag::Verb => "VERB",
            PosTag::Noun => "NOUN",
            PosTag::Pron => "PRON",
            PosTag::Adj => "ADJ",
            PosTag::Adv => "ADV",
            PosTag::Adp => "ADP",
            PosTag::Conj => "CONJ",
            PosTag::Det => "DET",
            PosTag::Num => "NUM",
            PosTag::Prt => "PRT",
            PosTag::Other => "X",
            PosTag::Punct => "pct",
        }
    }

    /// Content-word tags counted by the composite NOUN+VERB+ADJ feature.
    pub fn is_content(self) -> bool {
        matches!(self, PosTag::Noun | PosTag::Verb | PosTag::Adj)
    }
}

/// Trait for POS tagger implementations.
pub trait Tagger: Send + Sync {
    /// Tag one tokenized sentence; output is aligned with the input tokens.
    fn tag(&self, tokens: &[String]) -> Result<Vec<PosTag>>;
}

static PRONOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "me", "you", "he", "she", "it", "we", "they", "him", "her", "us", "them", "my",
        "your", "his", "its", "our", "their", "mine", "yours", "hers", "ours", "theirs", "who",
        "whom", "whose", "myself", "yourself", "himself", "herself", "itself", "ourselves",
        "themselves", "someone", "anyone", "everyone", "nobody", "something", "anything",
        "everything", "nothing",
    ]
    .into_iter()
    .collect()
});

static DETERMINERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "this", "that", "these", "those", "each", "every", "either", "neither",
        "some", "any", "no", "all", "both", "such", "what", "which",
    ]
    .into_iter()
    .collect()
});

static ADPOSITIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "in", "on", "at", "by", "for", "with", "about", "against", "between", "into", "through",
        "during", "before", "after", "above", "below", "from", "up", "down", "of", "off", "over",
        "under", "near", "since", "until", "upon", "within", "without", "toward", "towards",
        "across", "behind", "beyond", "among",
    ]
    .into_iter()
    .collect()
});

static CONJUNCTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "and", "or", "but", "nor", "so", "yet", "because", "although", "though", "while", "if",
        "unless", "whereas", "whether", "when", "where", "as",
    ]
    .into_iter()
    .collect()
});

static PARTICLES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["to", "not", "n't", "'s", "'ll", "'ve", "'re", "'d", "'m"].into_iter().collect());

static COMMON_VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
        "does", "did", "will", "would", "can", "could", "shall", "should", "may", "might", "must",
        "get", "got", "go", "goes", "went", "gone", "take", "took", "taking", "taken", "make",
        "made", "say", "said", "feel", "felt", "think", "thought", "know", "knew", "need", "want",
        "love", "hate", "like", "see", "saw", "seen", "use", "used", "try", "tried", "stop",
        "started", "start", "keep", "kept",
    ]
    .into_iter()
    .collect()
});

static ADVERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "very", "too", "really", "quite", "just", "now", "then", "here", "there", "never",
        "always", "often", "sometimes", "again", "still", "already", "soon", "today", "tomorrow",
        "yesterday", "maybe", "perhaps", "also", "even", "only", "almost", "rather",
    ]
    .into_iter()
    .collect()
});

const ADJ_SUFFIXES: &[&str] = &[
    "ful", "ous", "ive", "able", "ible", "ical", "less", "ish", "est",
];
const VERB_SUFFIXES: &[&str] = &["ing", "ed", "ify", "ise", "ize"];

/// Heuristic tagger backed by closed-class word lists and suffix rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleTagger;

impl Tagger for RuleTagger {
    fn tag(&self, tokens: &[String]) -> Result<Vec<PosTag>> {
        Ok(tokens.iter().map(|token| tag_token(token)).collect())
    }
}

fn tag_token(token: &str) -> PosTag {
    if token.chars().all(|c| !c.is_alphanumeric()) {
        return PosTag::Punct;
    }
    if token.chars().all(|c| c.is_ascii_digit()) || token.parse::<f64>().is_ok() {
        return PosTag::Num;
    }
    if PRONOUNS.contains(token) {
        return PosTag::Pron;
    }
    if DETERMINERS.contains(token) {
        return PosTag::Det;
    }
    if PARTICLES.contains(token) {
        return PosTag::Prt;
    }
    if ADPOSITIONS.contains(token) {
        return PosTag::Adp;
    }
    if CONJUNCTIONS.contains(token) {
        return PosTag::Conj;
    }
    if COMMON_VERBS.contains(token) {
        return PosTag::Verb;
    }
    if ADVERBS.contains(token) || (token.len() > 3 && token.ends_with("ly")) {
        return PosTag::Adv;
    }
    if ADJ_SUFFIXES.iter().any(|s| token.len() > s.len() + 1 && token.ends_with(s)) {
        return PosTag::Adj;
    }
    if VERB_SUFFIXES.iter().any(|s| token.len() > s.len() + 1 && token.ends_with(s)) {
        return PosTag::Verb;
    }
    if !token.chars().any(|c| c.is_alphabetic()) {
        // mixed symbol/digit tokens (emoticons survive tokenization as runs)
        return PosTag::Other;
    }
    PosTag::Noun
}
