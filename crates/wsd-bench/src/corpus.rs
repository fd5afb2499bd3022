//! Cleaned corpus tables.
//!
//! Tables are CSV files with a header row, as produced by the corpus
//! preprocessing step: one row per target-word instance, the context already
//! lemmatized, lower-cased, stripped of stopwords and of the target itself.
//! Rows with an empty required field are dropped on load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::DataError;

/// One labeled training instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRow {
    pub target_word: String,
    pub sense_class: String,
    pub context_string: String,
}

impl TrainingRow {
    pub fn new(target_word: &str, sense_class: &str, context_string: &str) -> Self {
        Self {
            target_word: target_word.to_string(),
            sense_class: sense_class.to_string(),
            context_string: context_string.to_string(),
        }
    }
}

/// One instance requiring a prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalRow {
    pub id: String,
    pub target_word: String,
    pub context_string: String,
}

impl EvalRow {
    pub fn new(id: &str, target_word: &str, context_string: &str) -> Self {
        Self {
            id: id.to_string(),
            target_word: target_word.to_string(),
            context_string: context_string.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawTrainingRow {
    target_word: Option<String>,
    sense_class: Option<String>,
    context_string: Option<String>,
}

#[derive(Deserialize)]
struct RawEvalRow {
    id: Option<String>,
    target_word: Option<String>,
    context_string: Option<String>,
}

const TRAINING_COLUMNS: [&str; 3] = ["target_word", "sense_class", "context_string"];
const EVAL_COLUMNS: [&str; 3] = ["id", "target_word", "context_string"];

/// Load a training table from `path`.
pub fn read_training_table(path: impl AsRef<Path>) -> Result<Vec<TrainingRow>, DataError> {
    let path = path.as_ref();
    read_training_rows(open(path)?, path)
}

/// Load an evaluation table from `path`.
pub fn read_eval_table(path: impl AsRef<Path>) -> Result<Vec<EvalRow>, DataError> {
    let path = path.as_ref();
    read_eval_rows(open(path)?, path)
}

/// Parse training rows from any reader; `origin` is used in errors and logs.
pub fn read_training_rows<R: Read>(reader: R, origin: &Path) -> Result<Vec<TrainingRow>, DataError> {
    read_table(reader, origin, &TRAINING_COLUMNS, |raw: RawTrainingRow| {
        Some(TrainingRow {
            target_word: raw.target_word?,
            sense_class: raw.sense_class?,
            context_string: raw.context_string?,
        })
    })
}

/// Parse evaluation rows from any reader; `origin` is used in errors and logs.
pub fn read_eval_rows<R: Read>(reader: R, origin: &Path) -> Result<Vec<EvalRow>, DataError> {
    read_table(reader, origin, &EVAL_COLUMNS, |raw: RawEvalRow| {
        Some(EvalRow {
            id: raw.id?,
            target_word: raw.target_word?,
            context_string: raw.context_string?,
        })
    })
}

fn open(path: &Path) -> Result<File, DataError> {
    File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_table<R, Raw, Row>(
    reader: R,
    origin: &Path,
    required: &[&'static str],
    complete: impl Fn(Raw) -> Option<Row>,
) -> Result<Vec<Row>, DataError>
where
    R: Read,
    Raw: DeserializeOwned,
{
    // Short records deserialize with `None` for the absent trailing fields.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataError::MissingColumn {
                path: origin.to_path_buf(),
                column: *column,
            });
        }
    }

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for record in reader.deserialize::<Raw>() {
        match complete(record?) {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }

    info!(
        "loaded {} rows from {} ({} incomplete rows dropped)",
        rows.len(),
        origin.display(),
        dropped
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_rows_with_missing_fields() {
        let csv = "target_word,context_string,sense_class\n\
                   bank,water flow river,bank%1:17:01::\n\
                   bank,,bank%1:14:00::\n\
                   ,money deposit,bank%1:14:00::\n\
                   bank,money deposit account,bank%1:14:00::\n";
        let rows = read_training_rows(csv.as_bytes(), Path::new("train.csv")).unwrap();
        assert_eq!(
            rows,
            vec![
                TrainingRow::new("bank", "bank%1:17:01::", "water flow river"),
                TrainingRow::new("bank", "bank%1:14:00::", "money deposit account"),
            ]
        );
    }

    #[test]
    fn drops_short_records() {
        let csv = "id,target_word,context_string\na,bank,money\nb,bank\nc,bank,loan\n";
        let rows = read_eval_rows(csv.as_bytes(), Path::new("eval.csv")).unwrap();
        assert_eq!(
            rows,
            vec![
                EvalRow::new("a", "bank", "money"),
                EvalRow::new("c", "bank", "loan"),
            ]
        );
    }

    #[test]
    fn ignores_extra_columns() {
        let csv = "id,target_word,context_string,extra\nd000.s000.t000,bank,money account,x\n";
        let rows = read_eval_rows(csv.as_bytes(), Path::new("eval.csv")).unwrap();
        assert_eq!(rows, vec![EvalRow::new("d000.s000.t000", "bank", "money account")]);
    }

    #[test]
    fn missing_column_is_a_data_error() {
        let csv = "target_word,context_string\nbank,money\n";
        let err = read_training_rows(csv.as_bytes(), Path::new("train.csv")).unwrap_err();
        assert!(matches!(
            err,
            DataError::MissingColumn {
                column: "sense_class",
                ..
            }
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_eval_table(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
