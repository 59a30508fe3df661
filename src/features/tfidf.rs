//! Bounded-vocabulary tf-idf over a document corpus.
//!
//! Fitting keeps terms inside the document-frequency band, caps the
//! vocabulary by total corpus frequency, and stores smoothed idf values.
//! A fitted vocabulary round-trips through JSON so later runs can score
//! against a frozen term set.

use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::Context;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Two-plus word characters, the classic vectorizer token pattern.
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
        "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
        "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
        "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
        "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
        "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
        "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
        "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg", "eight",
        "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even", "ever",
        "every", "everyone", "everything", "everywhere", "except", "few", "fifteen", "fifty",
        "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty", "found",
        "four", "from", "front", "full", "further", "get", "give", "go", "had", "has", "hasnt",
        "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
        "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "ie",
        "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself", "keep",
        "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may", "me",
        "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly", "move",
        "much", "must", "my", "myself", "name", "namely", "neither", "never", "nevertheless",
        "next", "nine", "no", "nobody", "none", "noone", "nor", "not", "nothing", "now",
        "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other",
        "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part", "per",
        "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed", "seeming",
        "seems", "serious", "several", "she", "should", "show", "side", "since", "sincere",
        "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
        "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that",
        "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
        "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
        "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
        "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
        "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
        "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
        "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
        "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
        "would", "yet", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Vocabulary selection bounds.
///
/// `min_df` is an absolute document count, `max_df` a corpus fraction;
/// both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorizerParams {
    pub min_df: usize,
    pub max_df: f64,
    pub max_features: usize,
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            min_df: 5,
            max_df: 0.9,
            max_features: 1_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermEntry {
    pub document_frequency: usize,
    pub idf: f64,
}

/// A fitted vectorizer: alphabetical vocabulary plus per-term idf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vectorizer {
    params: VectorizerParams,
    documents: usize,
    vocabulary: IndexMap<String, TermEntry>,
}

impl Vectorizer {
    /// Fits a vocabulary over `corpus`. An empty corpus produces an
    /// empty vocabulary rather than an error.
    pub fn fit<S: AsRef<str>>(corpus: &[S], params: VectorizerParams) -> Self {
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut corpus_frequency: HashMap<String, usize> = HashMap::new();
        for document in corpus {
            for (term, count) in term_counts(document.as_ref()) {
                *corpus_frequency.entry(term.clone()).or_default() += count;
                *document_frequency.entry(term).or_default() += 1;
            }
        }

        let documents = corpus.len();
        let max_df_count = params.max_df * documents as f64;
        let mut kept: Vec<(String, usize)> = document_frequency
            .into_iter()
            .filter(|(_, df)| *df >= params.min_df && (*df as f64) <= max_df_count)
            .collect();

        if kept.len() > params.max_features {
            // Cap by total corpus frequency, ties broken alphabetically.
            kept.sort_by(|a, b| {
                corpus_frequency[&b.0]
                    .cmp(&corpus_frequency[&a.0])
                    .then_with(|| a.0.cmp(&b.0))
            });
            kept.truncate(params.max_features);
        }
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        let vocabulary = kept
            .into_iter()
            .map(|(term, df)| {
                let idf = ((1.0 + documents as f64) / (1.0 + df as f64)).ln() + 1.0;
                (term, TermEntry { document_frequency: df, idf })
            })
            .collect();
        Self {
            params,
            documents,
            vocabulary,
        }
    }

    /// Sparse tf-idf weights for one document, L2-normalized, ordered by
    /// vocabulary index.
    pub fn transform(&self, text: &str) -> Vec<(usize, f64)> {
        let mut weights: Vec<(usize, f64)> = Vec::new();
        for (term, count) in term_counts(text) {
            if let Some((index, _, entry)) = self.vocabulary.get_full(term.as_str()) {
                weights.push((index, count as f64 * entry.idf));
            }
        }
        weights.sort_by_key(|(index, _)| *index);
        let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut weights {
                *weight /= norm;
            }
        }
        weights
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.vocabulary.get_index(index).map(|(term, _)| term.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &TermEntry)> {
        self.vocabulary.iter().map(|(term, entry)| (term.as_str(), entry))
    }

    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let file =
            File::create(path).with_context(|| format!("writing {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("serializing vocabulary to {}", path.display()))?;
        info!(path = %path.display(), terms = self.len(), "saved vocabulary");
        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let vectorizer: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing vocabulary from {}", path.display()))?;
        info!(path = %path.display(), terms = vectorizer.len(), "loaded frozen vocabulary");
        Ok(vectorizer)
    }
}

fn term_counts(text: &str) -> HashMap<String, usize> {
    let lowered = text.to_lowercase();
    let mut counts = HashMap::new();
    for token in TOKEN.find_iter(&lowered) {
        let term = token.as_str();
        if STOP_WORDS.contains(term) {
            continue;
        }
        *counts.entry(term.to_string()).or_default() += 1;
    }
    counts
}
