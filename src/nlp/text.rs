//! Text normalisation and coarse tokenization shared by the extractors.

use once_cell::sync::Lazy;
use regex::Regex;

static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\w+").expect("valid regex"));
static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://\S+|www\.\S+").expect("valid regex"));
static SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]*").expect("valid regex"));
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+|[^\w\s]").expect("valid regex"));

/// Lowercase a post and strip user mentions and URLs.
pub fn normalize(text: &str) -> String {
    let no_mentions = MENTION.replace_all(text, " ");
    let no_urls = URL.replace_all(&no_mentions, " ");
    no_urls.to_lowercase()
}

/// Split text into coarse sentences, terminal punctuation retained.
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Tokenize one sentence into words and single punctuation marks.
pub fn tokenize(sentence: &str) -> Vec<String> {
    TOKEN
        .find_iter(sentence)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Normalise, segment, and tokenize a document in one pass.
///
/// Empty or whitespace-only input yields no sentences rather than an error.
pub fn sentence_tokens(text: &str) -> Vec<Vec<String>> {
    split_sentences(&normalize(text))
        .iter()
        .map(|sentence| tokenize(sentence))
        .filter(|tokens| !tokens.is_empty())
        .collect()
}
