//! CLI entry-point for fitting and previewing tf-idf vocabularies.

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    cli::VocabCorpus,
    config::Settings,
    features::{
        textual,
        tfidf::{Vectorizer, VectorizerParams},
    },
    nlp::lexicon::LexiconSet,
    store::records::{JsonlRecordStore, RecordField, RecordQuery, RecordStore},
};

/// Args for the `vocab` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Corpus to fit over.
    #[arg(long, default_value = "posts", value_enum)]
    pub corpus: VocabCorpus,
    /// Task whose records form the corpus; defaults to the configured task.
    #[arg(long)]
    pub task: Option<String>,
    /// Number of terms to print.
    #[arg(long, default_value_t = 25)]
    pub top: usize,
    /// Minimum document frequency for vocabulary terms.
    #[arg(long)]
    pub min_df: Option<usize>,
    /// Maximum document-frequency fraction for vocabulary terms.
    #[arg(long)]
    pub max_df: Option<f64>,
    /// Vocabulary size cap.
    #[arg(long)]
    pub max_features: Option<usize>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let task = args.task.clone().unwrap_or_else(|| settings.task.clone());
    let posts = JsonlRecordStore::open(settings.join_data("raw/posts.jsonl"))
        .context("opening post corpus")?;
    let query = RecordQuery::new()
        .task(&task)
        .fields(&[RecordField::Text])
        .limit(settings.batch_limit);
    let records = posts.query(&query).context("querying post corpus")?;

    let corpus: Vec<String> = match args.corpus {
        VocabCorpus::Posts => records.iter().map(|r| r.text.clone()).collect(),
        VocabCorpus::Parents => {
            let lexicons = LexiconSet::load(&settings.join_data("lexicons"))
                .context("loading dictionaries")?;
            records
                .iter()
                .map(|r| textual::parent_text(&r.text, &lexicons))
                .collect()
        }
    };

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
    let vectorizer = Vectorizer::fit(&corpus, params);
    info!(
        documents = vectorizer.documents(),
        terms = vectorizer.len(),
        corpus = ?args.corpus,
        "fitted vocabulary"
    );

    let mut entries: Vec<_> = vectorizer.entries().collect();
    entries.sort_by(|a, b| {
        b.1.document_frequency
            .cmp(&a.1.document_frequency)
            .then_with(|| a.0.cmp(b.0))
    });
    for (term, entry) in entries.into_iter().take(args.top) {
        println!("{term}\tdf={}\tidf={:.4}", entry.document_frequency, entry.idf);
    }
    Ok(())
}
