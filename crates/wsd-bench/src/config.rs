//! Command-line and environment configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use wordnet_db::LoadMode;

use crate::corpus::read_training_table;
use crate::lesk::{SenseDictionary, SimplifiedLesk};
use crate::likelihood::DEFAULT_ALPHA;
use crate::mfs::MostFrequentSense;
use crate::naive_bayes::{NaiveBayesConfig, NaiveBayesWsd};
use crate::runner::{DEFAULT_DATASETS, Dataset};
use crate::stats::WordCountMode;
use crate::strategy::{Disambiguator, StrategyKind};
use crate::wordnet::WordNetDictionary;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Parser, Debug)]
#[command(name = "wsd-bench")]
#[command(about = "Word-sense disambiguation benchmark", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify evaluation corpora and write prediction files.
    Run(RunArgs),
    /// Score a prediction file against a gold key file.
    Score(ScoreArgs),
    /// Serve the trained strategies over HTTP.
    Serve(ServeArgs),
}

/// Options shared by every command that builds models.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Cleaned training table.
    #[arg(long, env = "WSD_TRAIN", default_value = "data/cleaned/semcor.csv")]
    pub train: PathBuf,
    /// Additive smoothing constant.
    #[arg(long, env = "WSD_ALPHA", default_value_t = DEFAULT_ALPHA, value_parser = parse_alpha)]
    pub alpha: f64,
    /// Unit of the per-class normalizer: `chars` or `tokens`.
    #[arg(long, env = "WSD_WORD_COUNT", default_value_t = WordCountMode::Characters)]
    pub word_count: WordCountMode,
    /// WordNet dict directory; required for Lesk.
    #[arg(long, env = "WORDNET_DIR")]
    pub wordnet_dir: Option<PathBuf>,
    #[arg(long, env = "WORDNET_LOAD_MODE", default_value = "mmap", value_parser = parse_load_mode)]
    pub wordnet_mode: LoadMode,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub model: ModelArgs,
    /// Directory holding `<dataset>.csv` evaluation tables.
    #[arg(long, env = "WSD_DATA_DIR", default_value = "data/cleaned")]
    pub data_dir: PathBuf,
    #[arg(long = "dataset", default_values_t = DEFAULT_DATASETS.map(String::from))]
    pub datasets: Vec<String>,
    #[arg(long, env = "WSD_OUTPUT_DIR", default_value = "results")]
    pub output_dir: PathBuf,
    #[arg(long = "strategy", default_values = ["nb", "lesk", "mfs"])]
    pub strategies: Vec<StrategyKind>,
    /// Worker threads; defaults to one per core.
    #[arg(long, env = "WSD_THREADS")]
    pub threads: Option<usize>,
}

impl RunArgs {
    pub fn datasets(&self) -> Vec<Dataset> {
        self.datasets
            .iter()
            .map(|name| Dataset::in_dir(&self.data_dir, name))
            .collect()
    }
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    #[arg(long)]
    pub predictions: PathBuf,
    #[arg(long)]
    pub gold: PathBuf,
    /// Print the score as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    #[command(flatten)]
    pub model: ModelArgs,
}

/// Strategies built from [`ModelArgs`].
pub struct Strategies {
    pub naive_bayes: Option<Arc<NaiveBayesWsd>>,
    pub all: Vec<Arc<dyn Disambiguator>>,
}

impl ModelArgs {
    pub fn naive_bayes_config(&self) -> NaiveBayesConfig {
        NaiveBayesConfig {
            alpha: self.alpha,
            word_count: self.word_count,
        }
    }

    /// Build the requested strategies in `kinds` order.
    ///
    /// Lesk is skipped with a warning when no WordNet directory is configured;
    /// MFS then has no dictionary fallback.
    pub fn build(&self, kinds: &[StrategyKind]) -> Result<Strategies> {
        let dictionary: Option<Arc<dyn SenseDictionary>> = match &self.wordnet_dir {
            Some(dir) => Some(Arc::new(load_dictionary(dir, self.wordnet_mode)?)),
            None => None,
        };

        let needs_training = kinds
            .iter()
            .any(|k| matches!(k, StrategyKind::NaiveBayes | StrategyKind::MostFrequentSense));
        let rows = if needs_training {
            read_training_table(&self.train)
                .with_context(|| format!("load training table {}", self.train.display()))?
        } else {
            Vec::new()
        };

        let mut naive_bayes = None;
        let mut all: Vec<Arc<dyn Disambiguator>> = Vec::new();
        for kind in kinds {
            match kind {
                StrategyKind::NaiveBayes => {
                    let model = Arc::new(NaiveBayesWsd::train(&rows, self.naive_bayes_config())?);
                    naive_bayes = Some(Arc::clone(&model));
                    all.push(model);
                }
                StrategyKind::Lesk => match &dictionary {
                    Some(dictionary) => {
                        all.push(Arc::new(SimplifiedLesk::new(Arc::clone(dictionary))));
                    }
                    None => warn!("no WordNet directory configured (WORDNET_DIR); skipping lesk"),
                },
                StrategyKind::MostFrequentSense => {
                    let mut mfs = MostFrequentSense::train(&rows)?;
                    if let Some(dictionary) = &dictionary {
                        mfs = mfs.with_fallback(Arc::clone(dictionary));
                    }
                    all.push(Arc::new(mfs));
                }
            }
        }
        info!(
            "strategies ready: {}",
            all.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
        );
        Ok(Strategies { naive_bayes, all })
    }
}

fn load_dictionary(dir: &Path, mode: LoadMode) -> Result<WordNetDictionary> {
    info!("loading WordNet from {} ({mode:?})", dir.display());
    WordNetDictionary::load(dir, mode)
}

fn parse_alpha(raw: &str) -> Result<f64, String> {
    let alpha: f64 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if alpha > 0.0 && alpha.is_finite() {
        Ok(alpha)
    } else {
        Err(format!("alpha must be positive, got {raw}"))
    }
}

fn parse_load_mode(raw: &str) -> Result<LoadMode, String> {
    LoadMode::parse(raw).ok_or_else(|| format!("unknown load mode `{raw}` (mmap|owned)"))
}
