//! Feature extraction: per-record extractors, corpus-level vocabularies,
//! and the batch pipeline that assembles the final table.

pub mod assemble;
pub mod profile;
pub mod row;
pub mod textual;
pub mod tfidf;
pub mod timeline;

use anyhow::{Context, Result};
use indexmap::IndexSet;
use tracing::{info, instrument, warn};

use crate::{
    features::{
        assemble::FeatureTable,
        row::FeatureRow,
        textual::DocumentFeatures,
        tfidf::{Vectorizer, VectorizerParams},
    },
    nlp::{lexicon::LexiconSet, sentiment::SentimentScorer, tagger::Tagger},
    store::{
        labels::ClassLabels,
        records::{RecordQuery, RecordStore},
    },
};

/// Collaborators wired into one feature build.
pub struct Pipeline<'a> {
    pub posts: &'a dyn RecordStore,
    pub timelines: &'a dyn RecordStore,
    pub labels: &'a ClassLabels,
    pub lexicons: &'a LexiconSet,
    pub tagger: &'a dyn Tagger,
    pub sentiment: &'a dyn SentimentScorer,
}

/// Knobs for one batch run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub task: String,
    pub batch_limit: usize,
    pub history_limit: usize,
    pub params: VectorizerParams,
    /// Previously fitted `(post, parent)` vocabularies to score against
    /// instead of fitting on this batch.
    pub frozen: Option<(Vectorizer, Vectorizer)>,
}

/// Everything a build produces: the table plus the vocabularies that scored
/// it, so callers can persist them for later frozen runs.
pub struct BuildArtifacts {
    pub table: FeatureTable,
    pub post_vectorizer: Vectorizer,
    pub parent_vectorizer: Vectorizer,
}

impl Pipeline<'_> {
    /// Runs the full extraction over one task batch.
    ///
    /// Per-record extractor failures degrade to empty blocks; only store
    /// access on the post corpus aborts the build.
    #[instrument(skip(self, options), fields(task = %options.task))]
    pub fn build(&self, options: BuildOptions) -> Result<BuildArtifacts> {
        let query = RecordQuery::new()
            .task(&options.task)
            .limit(options.batch_limit);
        let records = self.posts.query(&query).context("querying post corpus")?;
        if records.is_empty() {
            warn!("no records matched the task");
        }
        info!(records = records.len(), "building features");

        // Document pass first so the parent corpus exists before any fit.
        let mut documents = Vec::with_capacity(records.len());
        for record in &records {
            let document = match textual::document_features(&record.text, self.tagger, self.lexicons)
            {
                Ok(document) => document,
                Err(err) => {
                    warn!(id = %record.id, %err, "document features failed; degrading to empty");
                    DocumentFeatures::default()
                }
            };
            documents.push(document);
        }

        let authors: IndexSet<&str> = records.iter().map(|r| r.author_id.as_str()).collect();
        let aggregates = timeline::aggregate_authors(
            self.timelines,
            authors.iter().copied(),
            options.history_limit,
            self.lexicons,
        );

        // Both corpora are the raw texts; the vectorizer lowercases and
        // tokenizes on its own, so handles and URL fragments can become terms.
        let (post_vectorizer, parent_vectorizer) = match options.frozen {
            Some((post, parent)) => (post, parent),
            None => {
                let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
                let parents: Vec<&str> =
                    documents.iter().map(|d| d.parent_text.as_str()).collect();
                (
                    Vectorizer::fit(&texts, options.params),
                    Vectorizer::fit(&parents, options.params),
                )
            }
        };
        info!(
            post_terms = post_vectorizer.len(),
            parent_terms = parent_vectorizer.len(),
            "vocabularies ready"
        );

        let mut table = FeatureTable::new();
        for (record, document) in records.iter().zip(documents) {
            let mut assembled = FeatureRow::new();
            let label = self.labels.category(&record.id).or(record.label);
            assembled.insert_opt("y", label.map(|label| label as f64));
            assembled.merge(profile::user_features(
                record.profile.as_ref(),
                self.labels,
                &record.author_id,
            ));
            assembled.merge(profile::temporal_features(record.timestamp));
            assembled.merge(self.sentiment_row(&record.id, &record.text));
            if let Some(aggregate) = aggregates.get(record.author_id.as_str()) {
                assembled.merge(aggregate.clone());
            }
            assembled.merge(document.row);
            assembled.merge(tfidf_row(&post_vectorizer, &record.text, "post_tfidf_"));
            assembled.merge(tfidf_row(
                &parent_vectorizer,
                &document.parent_text,
                "post_tfidf_parent_",
            ));
            table.merge(record.id.clone(), assembled);
        }

        Ok(BuildArtifacts {
            table,
            post_vectorizer,
            parent_vectorizer,
        })
    }

    fn sentiment_row(&self, id: &str, text: &str) -> FeatureRow {
        let scores = match self.sentiment.average_scores(text) {
            Ok(scores) => scores,
            Err(err) => {
                warn!(id, %err, "sentiment scoring failed; degrading to empty");
                return FeatureRow::new();
            }
        };
        let mut sentiments = FeatureRow::new();
        for (dimension, score) in scores {
            sentiments.insert_number(format!("sent_{dimension}"), score);
        }
        sentiments.sparsify();
        sentiments
    }
}

fn tfidf_row(vectorizer: &Vectorizer, text: &str, prefix: &str) -> FeatureRow {
    let mut weights = FeatureRow::new();
    for (index, weight) in vectorizer.transform(text) {
        if let Some(term) = vectorizer.term(index) {
            weights.insert_number(format!("{prefix}({term})"), weight);
        }
    }
    weights
}
