//! Vocabulary and per-class statistics for the Naive Bayes model.
//!
//! Everything is computed in one pass over the training rows and frozen into
//! [`ModelStatistics`]; scoring only ever borrows it.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::corpus::TrainingRow;
use crate::error::DataError;

/// Unit of the per-class normalizer in the likelihood denominator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordCountMode {
    /// Length of the concatenated class context in characters. This is what
    /// the published results were produced with.
    #[default]
    Characters,
    /// Number of whitespace-separated tokens in the class context.
    Tokens,
}

impl WordCountMode {
    fn measure(self, text: &str) -> usize {
        match self {
            WordCountMode::Characters => text.chars().count(),
            WordCountMode::Tokens => text.split_whitespace().count(),
        }
    }
}

impl FromStr for WordCountMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "chars" | "characters" => Ok(WordCountMode::Characters),
            "tokens" => Ok(WordCountMode::Tokens),
            other => Err(format!("unknown word-count mode `{other}` (chars|tokens)")),
        }
    }
}

impl fmt::Display for WordCountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WordCountMode::Characters => "chars",
            WordCountMode::Tokens => "tokens",
        })
    }
}

/// Statistics of one sense class.
#[derive(Debug, Clone)]
pub struct ClassStats {
    /// Position in first-seen order.
    pub id: usize,
    pub name: String,
    pub instance_count: usize,
    /// `ln(instance_count / total_rows)`
    pub apriori_log_prob: f64,
    /// Every training context of this class, space-joined in row order.
    pub context_text: String,
    pub word_count: usize,
}

/// Immutable output of a training pass.
#[derive(Debug, Clone)]
pub struct ModelStatistics {
    /// In first-seen order.
    classes: Vec<ClassStats>,
    class_index: HashMap<String, usize>,
    /// Candidate classes per target word, in first-seen order.
    word_classes: HashMap<String, Vec<usize>>,
    vocabulary: HashSet<String>,
    total_rows: usize,
    word_count_mode: WordCountMode,
}

/// Serializable overview of a trained model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub classes: usize,
    pub target_words: usize,
    pub vocabulary_size: usize,
    pub training_rows: usize,
    pub word_count_mode: WordCountMode,
}

impl ModelStatistics {
    /// Scan the training rows once and freeze the result.
    pub fn build(rows: &[TrainingRow], mode: WordCountMode) -> Result<Self, DataError> {
        if rows.is_empty() {
            return Err(DataError::EmptyTrainingSet);
        }

        let mut class_index: HashMap<String, usize> = HashMap::new();
        let mut contexts: Vec<(String, usize, Vec<&str>)> = Vec::new();
        let mut word_classes: HashMap<String, Vec<usize>> = HashMap::new();
        let mut vocabulary = HashSet::new();

        for row in rows {
            let idx = *class_index.entry(row.sense_class.clone()).or_insert_with(|| {
                contexts.push((row.sense_class.clone(), 0, Vec::new()));
                contexts.len() - 1
            });
            let (_, count, texts) = &mut contexts[idx];
            *count += 1;
            texts.push(row.context_string.as_str());

            let candidates = word_classes.entry(row.target_word.clone()).or_default();
            if !candidates.contains(&idx) {
                candidates.push(idx);
            }

            for token in row.context_string.split_whitespace() {
                if !vocabulary.contains(token) {
                    vocabulary.insert(token.to_string());
                }
            }
        }

        let total_rows = rows.len();
        let classes: Vec<ClassStats> = contexts
            .into_iter()
            .enumerate()
            .map(|(id, (name, instance_count, texts))| {
                let context_text = texts.join(" ");
                ClassStats {
                    id,
                    name,
                    instance_count,
                    apriori_log_prob: (instance_count as f64 / total_rows as f64).ln(),
                    word_count: mode.measure(&context_text),
                    context_text,
                }
            })
            .collect();

        info!(
            "built statistics: {} classes, {} target words, vocabulary of {} from {} rows",
            classes.len(),
            word_classes.len(),
            vocabulary.len(),
            total_rows
        );

        Ok(Self {
            classes,
            class_index,
            word_classes,
            vocabulary,
            total_rows,
            word_count_mode: mode,
        })
    }

    /// All classes in first-seen order.
    pub fn classes(&self) -> &[ClassStats] {
        &self.classes
    }

    pub fn class(&self, name: &str) -> Option<&ClassStats> {
        self.class_index.get(name).map(|idx| &self.classes[*idx])
    }

    /// Classes attested for `word` in training, or `None` for an unseen word.
    pub fn candidates(&self, word: &str) -> Option<impl Iterator<Item = &ClassStats> + '_> {
        self.word_classes
            .get(word)
            .map(|indices| indices.iter().map(|idx| &self.classes[*idx]))
    }

    /// Sense inventory entry for `word` as class names.
    pub fn senses_of(&self, word: &str) -> Option<Vec<&str>> {
        self.candidates(word)
            .map(|classes| classes.map(|c| c.name.as_str()).collect())
    }

    pub fn in_vocabulary(&self, token: &str) -> bool {
        self.vocabulary.contains(token)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn word_count_mode(&self) -> WordCountMode {
        self.word_count_mode
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            classes: self.classes.len(),
            target_words: self.word_classes.len(),
            vocabulary_size: self.vocabulary.len(),
            training_rows: self.total_rows,
            word_count_mode: self.word_count_mode,
        }
    }
}
