use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::corpus::EvalRow;
use crate::error::InputError;

/// Rendering of [`Prediction::Unknown`] in every output surface.
pub const UNKNOWN_SENSE: &str = "None";

/// Outcome of disambiguating one instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Prediction {
    Sense(String),
    /// The strategy has no candidate sense for the target word.
    Unknown,
}

impl Prediction {
    pub fn sense(&self) -> Option<&str> {
        match self {
            Prediction::Sense(sense) => Some(sense),
            Prediction::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Prediction::Unknown)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sense().unwrap_or(UNKNOWN_SENSE))
    }
}

impl Serialize for Prediction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The benchmarked strategies.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StrategyKind {
    NaiveBayes,
    Lesk,
    MostFrequentSense,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::NaiveBayes,
        StrategyKind::Lesk,
        StrategyKind::MostFrequentSense,
    ];

    /// Results sub-directory.
    pub fn dir_name(self) -> &'static str {
        match self {
            StrategyKind::NaiveBayes => "naiveBayes",
            StrategyKind::Lesk => "lesk",
            StrategyKind::MostFrequentSense => "mfs",
        }
    }

    /// Prefix of prediction file names.
    pub fn file_prefix(self) -> &'static str {
        match self {
            StrategyKind::NaiveBayes => "nb",
            StrategyKind::Lesk => "lesk",
            StrategyKind::MostFrequentSense => "mfs",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "nb" | "naivebayes" | "naive-bayes" => Ok(StrategyKind::NaiveBayes),
            "lesk" => Ok(StrategyKind::Lesk),
            "mfs" | "most-frequent-sense" => Ok(StrategyKind::MostFrequentSense),
            other => Err(format!("unknown strategy `{other}` (nb|lesk|mfs)")),
        }
    }
}

/// A word-sense disambiguation strategy applied row by row.
///
/// Implementations are read-only after construction so a batch can fan rows
/// out across threads.
pub trait Disambiguator: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn name(&self) -> &'static str {
        self.kind().dir_name()
    }

    fn file_prefix(&self) -> &'static str {
        self.kind().file_prefix()
    }

    fn disambiguate(&self, row: &EvalRow) -> Result<Prediction, InputError>;
}

/// Reject rows that carry no target word.
pub(crate) fn target_word(row: &EvalRow) -> Result<&str, InputError> {
    let word = row.target_word.trim();
    if word.is_empty() {
        return Err(InputError::MissingTargetWord { id: row.id.clone() });
    }
    Ok(word)
}
