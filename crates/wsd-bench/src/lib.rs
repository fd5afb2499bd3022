//! Word-sense disambiguation benchmark.
//!
//! Three strategies label target words in sense-tagged corpora with WordNet
//! sense keys: a multinomial Naive Bayes classifier trained on the tagged
//! contexts ([`naive_bayes`]), Simplified Lesk gloss overlap ([`lesk`]) and a
//! most-frequent-sense baseline ([`mfs`]). [`runner`] writes one prediction
//! file per strategy and corpus, [`evaluate`] scores them against gold keys
//! and [`handlers`] serves the trained strategies over HTTP.

pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluate;
pub mod handlers;
pub mod lesk;
pub mod likelihood;
pub mod mfs;
pub mod naive_bayes;
pub mod runner;
pub mod stats;
pub mod strategy;
pub mod text;
pub mod wordnet;

pub use corpus::{EvalRow, TrainingRow, read_eval_table, read_training_table};
pub use error::{DataError, InputError};
pub use handlers::{AppState, router};
pub use lesk::{SenseDictionary, SenseGloss, SimplifiedLesk};
pub use likelihood::{DEFAULT_ALPHA, LikelihoodEngine};
pub use mfs::MostFrequentSense;
pub use naive_bayes::{NaiveBayesConfig, NaiveBayesWsd};
pub use runner::{BatchSummary, Dataset, run_dataset};
pub use stats::{ModelStatistics, WordCountMode};
pub use strategy::{Disambiguator, Prediction, StrategyKind};
pub use wordnet::WordNetDictionary;
