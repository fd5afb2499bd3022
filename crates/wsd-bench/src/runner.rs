//! Batch classification of evaluation tables into prediction files.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::corpus::{EvalRow, read_eval_table};
use crate::error::DataError;
use crate::strategy::{Disambiguator, Prediction};

/// Evaluation corpora benchmarked by default.
pub const DEFAULT_DATASETS: [&str; 5] = [
    "semeval2007",
    "semeval2013",
    "semeval2015",
    "senseval2",
    "senseval3",
];

/// A named evaluation table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset {
    pub name: String,
    pub path: PathBuf,
}

impl Dataset {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// `<data_dir>/<name>.csv`
    pub fn in_dir(data_dir: &Path, name: &str) -> Self {
        Self::new(name, data_dir.join(format!("{name}.csv")))
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BatchSummary {
    pub dataset: String,
    pub strategy: &'static str,
    pub rows: usize,
    pub unknown: usize,
    pub invalid: usize,
    pub elapsed_ms: u64,
    pub output: PathBuf,
}

/// Classify every row in parallel. Output order follows input order;
/// rows that fail validation are logged and predicted as unknown.
pub fn predict_rows(strategy: &dyn Disambiguator, rows: &[EvalRow]) -> (Vec<Prediction>, usize) {
    let results: Vec<Option<Prediction>> = rows
        .par_iter()
        .map(|row| match strategy.disambiguate(row) {
            Ok(prediction) => Some(prediction),
            Err(err) => {
                warn!("{}: {err}", strategy.name());
                None
            }
        })
        .collect();

    let invalid = results.iter().filter(|r| r.is_none()).count();
    let predictions = results
        .into_iter()
        .map(|r| r.unwrap_or(Prediction::Unknown))
        .collect();
    (predictions, invalid)
}

/// `<output_dir>/<strategy dir>/<prefix>_<dataset>_predicted.txt`
pub fn prediction_path(output_dir: &Path, strategy: &dyn Disambiguator, dataset: &str) -> PathBuf {
    output_dir
        .join(strategy.name())
        .join(format!("{}_{dataset}_predicted.txt", strategy.file_prefix()))
}

/// Load `dataset`, classify it with `strategy` and write the prediction file.
pub fn run_dataset(
    strategy: &dyn Disambiguator,
    dataset: &Dataset,
    output_dir: &Path,
) -> Result<BatchSummary, DataError> {
    let start = Instant::now();
    let rows = read_eval_table(&dataset.path)?;
    let (predictions, invalid) = predict_rows(strategy, &rows);

    let output = prediction_path(output_dir, strategy, &dataset.name);
    write_predictions(&output, &rows, &predictions)?;

    let summary = BatchSummary {
        dataset: dataset.name.clone(),
        strategy: strategy.name(),
        rows: rows.len(),
        unknown: predictions.iter().filter(|p| p.is_unknown()).count(),
        invalid,
        elapsed_ms: start.elapsed().as_millis() as u64,
        output,
    };
    info!(
        "{} on {}: {} rows, {} unknown, {} invalid in {} ms -> {}",
        summary.strategy,
        summary.dataset,
        summary.rows,
        summary.unknown,
        summary.invalid,
        summary.elapsed_ms,
        summary.output.display()
    );
    Ok(summary)
}

/// One `id predicted` line per row, no header.
pub fn write_predictions(
    path: &Path,
    rows: &[EvalRow],
    predictions: &[Prediction],
) -> Result<(), DataError> {
    let io_err = |source| DataError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
    for (row, prediction) in rows.iter().zip(predictions) {
        writeln!(out, "{} {prediction}", row.id).map_err(io_err)?;
    }
    out.flush().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use crate::strategy::{StrategyKind, target_word};

    /// Echoes the target word back as the sense.
    struct Echo;

    impl Disambiguator for Echo {
        fn kind(&self) -> StrategyKind {
            StrategyKind::MostFrequentSense
        }

        fn disambiguate(&self, row: &EvalRow) -> Result<Prediction, InputError> {
            let word = target_word(row)?;
            Ok(match word {
                "unknown" => Prediction::Unknown,
                other => Prediction::Sense(format!("{other}%1")),
            })
        }
    }

    #[test]
    fn predictions_keep_row_order() {
        let rows: Vec<EvalRow> = (0..200)
            .map(|i| EvalRow::new(&format!("d0.s{i}"), &format!("w{i}"), ""))
            .collect();
        let (predictions, invalid) = predict_rows(&Echo, &rows);
        assert_eq!(invalid, 0);
        for (i, prediction) in predictions.iter().enumerate() {
            assert_eq!(prediction.sense(), Some(format!("w{i}%1").as_str()));
        }
    }

    #[test]
    fn invalid_rows_become_unknown() {
        let rows = vec![
            EvalRow::new("a", "bank", ""),
            EvalRow::new("b", " ", ""),
            EvalRow::new("c", "unknown", ""),
        ];
        let (predictions, invalid) = predict_rows(&Echo, &rows);
        assert_eq!(invalid, 1);
        assert_eq!(
            predictions,
            vec![
                Prediction::Sense("bank%1".into()),
                Prediction::Unknown,
                Prediction::Unknown
            ]
        );
    }

    #[test]
    fn output_path_follows_strategy_layout() {
        assert_eq!(
            prediction_path(Path::new("results"), &Echo, "senseval2"),
            Path::new("results/mfs/mfs_senseval2_predicted.txt")
        );
    }

    #[test]
    fn writes_id_prediction_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");
        let rows = vec![EvalRow::new("x.1", "a", ""), EvalRow::new("x.2", "b", "")];
        let predictions = vec![Prediction::Sense("a%1:00:00::".into()), Prediction::Unknown];
        write_predictions(&path, &rows, &predictions).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "x.1 a%1:00:00::\nx.2 None\n"
        );
    }
}
