//! Linguistic collaborators: tokenization, tagging, dictionaries, sentiment.

pub mod lexicon;
pub mod sentiment;
pub mod tagger;
pub mod text;
