//! Precision, recall and F1 of a prediction file against a gold key file.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::strategy::UNKNOWN_SENSE;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}: expected `id key [key ...]`")]
    Malformed { path: PathBuf, line: usize },
}

/// Accepted sense keys per instance id.
#[derive(Debug, Default, Clone)]
pub struct GoldKey {
    keys: HashMap<String, HashSet<String>>,
}

impl GoldKey {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScoreError> {
        let path = path.as_ref();
        Self::parse(&read(path)?, path)
    }

    pub fn parse(text: &str, origin: &Path) -> Result<Self, ScoreError> {
        let mut keys = HashMap::new();
        for (idx, line) in text.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(id) = fields.next() else {
                continue;
            };
            let senses: HashSet<String> = fields.map(str::to_string).collect();
            if senses.is_empty() {
                return Err(ScoreError::Malformed {
                    path: origin.to_path_buf(),
                    line: idx + 1,
                });
            }
            keys.insert(id.to_string(), senses);
        }
        Ok(Self { keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_correct(&self, id: &str, sense: &str) -> bool {
        self.keys.get(id).is_some_and(|senses| senses.contains(sense))
    }
}

/// Read `id predicted` lines. An id without a prediction counts as `None`.
pub fn read_predictions(path: impl AsRef<Path>) -> Result<Vec<(String, String)>, ScoreError> {
    let path = path.as_ref();
    Ok(parse_predictions(&read(path)?))
}

pub fn parse_predictions(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let id = fields.next()?;
            let sense = fields.next().unwrap_or(UNKNOWN_SENSE);
            Some((id.to_string(), sense.to_string()))
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Score {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub attempted: usize,
    pub correct: usize,
    pub total: usize,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P={:.1}%  R={:.1}%  F1={:.1}%  ({} correct, {} attempted, {} gold)",
            self.precision * 100.0,
            self.recall * 100.0,
            self.f1 * 100.0,
            self.correct,
            self.attempted,
            self.total
        )
    }
}

/// Score predictions. `None` predictions are not attempted; when an id is
/// predicted more than once the last line counts.
pub fn score(gold: &GoldKey, predictions: &[(String, String)]) -> Score {
    let latest: HashMap<&str, &str> = predictions
        .iter()
        .map(|(id, sense)| (id.as_str(), sense.as_str()))
        .collect();

    let mut attempted = 0;
    let mut correct = 0;
    for (id, sense) in latest {
        if sense == UNKNOWN_SENSE {
            continue;
        }
        attempted += 1;
        if gold.is_correct(id, sense) {
            correct += 1;
        }
    }

    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
    let precision = ratio(correct, attempted);
    let recall = ratio(correct, gold.len());
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    Score {
        precision,
        recall,
        f1,
        attempted,
        correct,
        total: gold.len(),
    }
}

fn read(path: &Path) -> Result<String, ScoreError> {
    fs::read_to_string(path).map_err(|source| ScoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
