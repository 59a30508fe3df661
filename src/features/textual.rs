//! Per-document textual features: POS statistics and dictionary matches.

use anyhow::Result;

use crate::{
    features::row::FeatureRow,
    nlp::{
        lexicon::{Lexicon, LexiconSet, TermMatch},
        tagger::{PosTag, Tagger},
        text,
    },
};

/// Output of the document extractor: the sparse feature row plus the derived
/// parent-category text consumed only by the vectorizer, never stored.
#[derive(Debug, Clone, Default)]
pub struct DocumentFeatures {
    pub row: FeatureRow,
    pub parent_text: String,
}

/// Extract the textual-feature row and parent text for one post.
///
/// Empty text yields an empty row. Tagger failure surfaces as an error so the
/// pipeline can degrade that one document without aborting the batch.
pub fn document_features(
    raw_text: &str,
    tagger: &dyn Tagger,
    lexicons: &LexiconSet,
) -> Result<DocumentFeatures> {
    let sentences = text::sentence_tokens(raw_text);
    let mut tags = Vec::new();
    for sentence in &sentences {
        tags.extend(tagger.tag(sentence)?);
    }

    let mut row = FeatureRow::new();
    // Length is taken on the document as received, before any cleanup.
    row.insert_number("post_length_text", raw_text.chars().count() as f64);
    let token_count: usize = sentences.iter().map(Vec::len).sum();
    row.insert_number("post_number_words", token_count as f64);
    row.insert_number(
        "post_number_(NOUN+VERB+ADJ)",
        tags.iter().filter(|tag| tag.is_content()).count() as f64,
    );

    let mut parent_terms = Vec::new();
    for lexicon in lexicons.iter() {
        let matches = match_document(lexicon, &sentences);
        row.insert_number(
            format!("post_number_({})", lexicon.kind().label()),
            matches.len() as f64,
        );
        collect_parents(lexicon, &matches, &mut parent_terms);
    }

    for tag in PosTag::ALL {
        let count = tags.iter().filter(|t| **t == tag).count();
        row.insert_number(format!("text_number_of_({})", tag.label()), count as f64);
    }

    row.sparsify();
    Ok(DocumentFeatures {
        row,
        parent_text: parent_terms.join(" "),
    })
}

/// Concatenated parent-category text for one post, without the POS pass.
///
/// Used when only the parent corpus is needed, e.g. vocabulary previews.
pub fn parent_text(raw_text: &str, lexicons: &LexiconSet) -> String {
    let sentences = text::sentence_tokens(raw_text);
    let mut parent_terms = Vec::new();
    for lexicon in lexicons.iter() {
        let matches = match_document(lexicon, &sentences);
        collect_parents(lexicon, &matches, &mut parent_terms);
    }
    parent_terms.join(" ")
}

/// Matches for one lexicon across every sentence of a document.
pub(crate) fn match_document(lexicon: &Lexicon, sentences: &[Vec<String>]) -> Vec<TermMatch> {
    sentences
        .iter()
        .flat_map(|sentence| lexicon.find_matches(sentence))
        .collect()
}

fn collect_parents(lexicon: &Lexicon, matches: &[TermMatch], out: &mut Vec<String>) {
    for matched in matches {
        for entry_id in &matched.entry_ids {
            if let Some(parent) = lexicon.parent(*entry_id) {
                out.push(parent.to_string());
            }
        }
    }
}
