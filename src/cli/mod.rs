//! Command-line interface wiring for smm-featurizer.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Settings;

pub mod build;
pub mod vocab;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Social-media health-post feature builder", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Build(args) => build::run(args, settings).await,
            Commands::Vocab(args) => vocab::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the feature table for one task batch and replace the store.
    Build(build::Args),
    /// Fit a tf-idf vocabulary and print a term preview.
    Vocab(vocab::Args),
}

/// Which derived corpus a vocabulary is fitted over.
#[derive(Clone, Debug, ValueEnum)]
pub enum VocabCorpus {
    /// Normalized post text.
    Posts,
    /// Parent-category text derived from dictionary matches.
    Parents,
}
