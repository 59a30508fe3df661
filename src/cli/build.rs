//! CLI entry-point for building the feature table.

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument, warn};

use crate::{
    config::Settings,
    features::{
        tfidf::{Vectorizer, VectorizerParams},
        BuildOptions, Pipeline,
    },
    nlp::{lexicon::LexiconSet, sentiment::LexiconSentiment, tagger::RuleTagger},
    store::{
        features::{FeatureStore, JsonlFeatureStore},
        labels::ClassLabels,
        records::JsonlRecordStore,
    },
};

/// Args for the `build` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Task whose records are featurized; defaults to the configured task.
    #[arg(long)]
    pub task: Option<String>,
    /// Override the batch record limit.
    #[arg(long)]
    pub limit: Option<usize>,
    /// Override the per-author history window.
    #[arg(long)]
    pub history_limit: Option<usize>,
    /// Score against the saved vocabularies instead of fitting on this batch.
    #[arg(long)]
    pub frozen_vocab: bool,
    /// Minimum document frequency for vocabulary terms.
    #[arg(long)]
    pub min_df: Option<usize>,
    /// Maximum document-frequency fraction for vocabulary terms.
    #[arg(long)]
    pub max_df: Option<f64>,
    /// Vocabulary size cap per text block.
    #[arg(long)]
    pub max_features: Option<usize>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let task = args.task.clone().unwrap_or_else(|| settings.task.clone());

    let posts = JsonlRecordStore::open(settings.join_data("raw/posts.jsonl"))
        .context("opening post corpus")?;
    let timelines = JsonlRecordStore::open(settings.join_data("raw/timelines.jsonl"))
        .context("opening timeline corpus")?;

    let labels_path = settings.join_data("raw/classes.csv");
    let labels = match ClassLabels::from_csv(&labels_path) {
        Ok(labels) => labels,
        Err(err) => {
            warn!(
                path = %labels_path.display(),
                %err,
                "class labels unavailable; label-derived features will be absent"
            );
            ClassLabels::default()
        }
    };

    let lexicons =
        LexiconSet::load(&settings.join_data("lexicons")).context("loading dictionaries")?;
    let tagger = RuleTagger;
    let sentiment = LexiconSentiment;

    let mut params = VectorizerParams::default();
    if let Some(min_df) = args.min_df {
        params.min_df = min_df;
    }
    if let Some(max_df) = args.max_df {
        params.max_df = max_df;
    }
    if let Some(max_features) = args.max_features {
        params.max_features = max_features;
    }

    let post_vocab_path = settings.join_data("vocab/post_tfidf.json");
    let parent_vocab_path = settings.join_data("vocab/post_tfidf_parent.json");
    let frozen = if args.frozen_vocab {
        Some((
            Vectorizer::load(&post_vocab_path).context("loading frozen post vocabulary")?,
            Vectorizer::load(&parent_vocab_path).context("loading frozen parent vocabulary")?,
        ))
    } else {
        None
    };

    let pipeline = Pipeline {
        posts: &posts,
        timelines: &timelines,
        labels: &labels,
        lexicons: &lexicons,
        tagger: &tagger,
        sentiment: &sentiment,
    };
    let artifacts = pipeline.build(BuildOptions {
        task: task.clone(),
        batch_limit: args.limit.unwrap_or(settings.batch_limit),
        history_limit: args.history_limit.unwrap_or(settings.history_limit),
        params,
        frozen,
    })?;

    if !args.frozen_vocab {
        artifacts.post_vectorizer.save(&post_vocab_path)?;
        artifacts.parent_vectorizer.save(&parent_vocab_path)?;
    }

    let snapshot_path = settings.join_output(format!("{task}_features.parquet"));
    artifacts.table.write_parquet(&snapshot_path)?;

    let store =
        JsonlFeatureStore::new(settings.join_data(format!("features/{task}_features.jsonl")));
    let report = store.replace_all(&artifacts.table.into_docs())?;
    for (id, reason) in &report.failed {
        warn!(%id, %reason, "feature row not written");
    }
    info!(
        rows = report.inserted,
        path = %store.path().display(),
        "feature build complete"
    );
    Ok(())
}
