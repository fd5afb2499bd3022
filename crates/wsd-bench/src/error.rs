use std::path::PathBuf;

use thiserror::Error;

/// Malformed or empty training/evaluation tables. Fatal for the run.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("training table has no usable rows")]
    EmptyTrainingSet,
    #[error("{path}: missing required column `{column}`")]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
}

/// A single evaluation row that cannot be classified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("row {id}: missing target word")]
    MissingTargetWord { id: String },
}
