//! Labeled vocabulary matching for the domain term dictionaries.
//!
//! One polymorphic matcher covers the Drug, MedicalTerm, and NaturalProduct
//! dictionaries; instances are constructed once and injected into the pipeline.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use strsim::jaro_winkler;
use tracing::info;

use crate::nlp::text;

/// Similarity floor for the single-token fuzzy fallback.
const FUZZY_THRESHOLD: f64 = 0.88;
/// Tokens shorter than this are never fuzzy-matched.
const FUZZY_MIN_LEN: usize = 4;

/// Identity of one term dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexiconKind {
    Drug,
    MedicalTerm,
    NaturalProduct,
}

impl LexiconKind {
    /// Fixed iteration order: drugs, medical terms, natural products.
    pub const ALL: [LexiconKind; 3] = [
        LexiconKind::Drug,
        LexiconKind::MedicalTerm,
        LexiconKind::NaturalProduct,
    ];

    /// Label used inside feature names, e.g. `post_number_(Drugs)`.
    pub fn label(self) -> &'static str {
        match self {
            LexiconKind::Drug => "Drugs",
            LexiconKind::MedicalTerm => "MedicalTerms",
            LexiconKind::NaturalProduct => "NaturalProducts",
        }
    }

    /// CSV file stem under the lexicon directory.
    pub fn file_stem(self) -> &'static str {
        match self {
            LexiconKind::Drug => "drugs",
            LexiconKind::MedicalTerm => "medical_terms",
            LexiconKind::NaturalProduct => "natural_products",
        }
    }
}

/// One matched dictionary span over a tokenized sentence.
#[derive(Debug, Clone)]
pub struct TermMatch {
    /// Token offset where the span starts.
    pub start: usize,
    /// Number of tokens covered.
    pub len: usize,
    /// Dictionary entries sharing the matched surface form.
    pub entry_ids: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct LexiconRow {
    term: String,
    entry_id: u64,
    parent: String,
}

/// Immutable term dictionary with exact span matching and a fuzzy fallback.
#[derive(Debug, Clone)]
pub struct Lexicon {
    kind: LexiconKind,
    /// Lowercased token sequence of each surface form, mapped to its entry ids.
    terms: HashMap<Vec<String>, Vec<u64>>,
    parents: HashMap<u64, String>,
    max_span: usize,
}

impl Lexicon {
    /// Load a dictionary from CSV columns `term,entry_id,parent`.
    pub fn from_csv(kind: LexiconKind, path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("opening lexicon {}", path.display()))?;
        let mut entries = Vec::new();
        for result in reader.deserialize() {
            let row: LexiconRow = result?;
            entries.push((row.term, row.entry_id, row.parent));
        }
        let lexicon = Self::from_entries(
            kind,
            entries
                .iter()
                .map(|(term, id, parent)| (term.as_str(), *id, parent.as_str())),
        );
        info!(
            kind = kind.label(),
            terms = lexicon.terms.len(),
            "loaded lexicon"
        );
        Ok(lexicon)
    }

    /// Build a dictionary from in-memory entries; used by tests and fixtures.
    pub fn from_entries<'a, I>(kind: LexiconKind, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u64, &'a str)>,
    {
        let mut terms: HashMap<Vec<String>, Vec<u64>> = HashMap::new();
        let mut parents = HashMap::new();
        let mut max_span = 1;
        for (term, entry_id, parent) in entries {
            let tokens = text::tokenize(&term.to_lowercase());
            if tokens.is_empty() {
                continue;
            }
            max_span = max_span.max(tokens.len());
            terms.entry(tokens).or_default().push(entry_id);
            parents.insert(entry_id, parent.to_string());
        }
        Self {
            kind,
            terms,
            parents,
            max_span,
        }
    }

    pub fn kind(&self) -> LexiconKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Human-readable parent category for one dictionary entry.
    pub fn parent(&self, entry_id: u64) -> Option<&str> {
        self.parents.get(&entry_id).map(String::as_str)
    }

    /// Longest-match scan over one tokenized sentence.
    ///
    /// Exact multi-token spans win over shorter ones; single tokens that match
    /// nothing exactly fall back to Jaro-Winkler similarity against the
    /// single-token surface forms.
    pub fn find_matches(&self, tokens: &[String]) -> Vec<TermMatch> {
        let mut matches = Vec::new();
        let mut idx = 0;
        while idx < tokens.len() {
            let longest = self.max_span.min(tokens.len() - idx);
            let mut advanced = false;
            for span in (1..=longest).rev() {
                if let Some(ids) = self.terms.get(&tokens[idx..idx + span]) {
                    matches.push(TermMatch {
                        start: idx,
                        len: span,
                        entry_ids: ids.clone(),
                    });
                    idx += span;
                    advanced = true;
                    break;
                }
            }
            if !advanced {
                if let Some(ids) = self.fuzzy_single(&tokens[idx]) {
                    matches.push(TermMatch {
                        start: idx,
                        len: 1,
                        entry_ids: ids,
                    });
                }
                idx += 1;
            }
        }
        matches
    }

    fn fuzzy_single(&self, token: &str) -> Option<Vec<u64>> {
        if token.len() < FUZZY_MIN_LEN {
            return None;
        }
        let mut best: Option<(f64, &Vec<u64>)> = None;
        for (surface, ids) in &self.terms {
            if surface.len() != 1 || surface[0].len() < FUZZY_MIN_LEN {
                continue;
            }
            let score = jaro_winkler(token, &surface[0]);
            if score >= FUZZY_THRESHOLD && best.map_or(true, |(b, _)| score > b) {
                best = Some((score, ids));
            }
        }
        best.map(|(_, ids)| ids.clone())
    }
}

/// The three domain dictionaries, constructed once and injected together.
#[derive(Debug, Clone)]
pub struct LexiconSet {
    lexicons: Vec<Lexicon>,
}

impl LexiconSet {
    /// Assemble a set from pre-built dictionaries, one per kind.
    pub fn new(drugs: Lexicon, medical_terms: Lexicon, natural_products: Lexicon) -> Self {
        Self {
            lexicons: vec![drugs, medical_terms, natural_products],
        }
    }

    /// Load every dictionary from `<dir>/<stem>.csv`.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut lexicons = Vec::with_capacity(LexiconKind::ALL.len());
        for kind in LexiconKind::ALL {
            let path: PathBuf = dir.join(format!("{}.csv", kind.file_stem()));
            lexicons.push(Lexicon::from_csv(kind, &path)?);
        }
        Ok(Self { lexicons })
    }

    /// Dictionaries in the fixed drugs, medical terms, natural products order.
    pub fn iter(&self) -> impl Iterator<Item = &Lexicon> {
        self.lexicons.iter()
    }
}
