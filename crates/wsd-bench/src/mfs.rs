//! Most-frequent-sense baseline.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::corpus::{EvalRow, TrainingRow};
use crate::error::{DataError, InputError};
use crate::lesk::SenseDictionary;
use crate::strategy::{Disambiguator, Prediction, StrategyKind, target_word};

/// Predicts the sense class seen most often with the word in training.
///
/// Words absent from training fall back to the dictionary's first sense when
/// a dictionary is attached.
pub struct MostFrequentSense {
    best: HashMap<String, String>,
    fallback: Option<Arc<dyn SenseDictionary>>,
}

impl MostFrequentSense {
    pub fn train(rows: &[TrainingRow]) -> Result<Self, DataError> {
        if rows.is_empty() {
            return Err(DataError::EmptyTrainingSet);
        }

        // Per word: (class, count) in first-seen order.
        let mut counts: HashMap<&str, Vec<(&str, usize)>> = HashMap::new();
        for row in rows {
            let classes = counts.entry(row.target_word.as_str()).or_default();
            match classes.iter_mut().find(|(class, _)| *class == row.sense_class) {
                Some((_, count)) => *count += 1,
                None => classes.push((row.sense_class.as_str(), 1)),
            }
        }

        let best: HashMap<String, String> = counts
            .into_iter()
            .filter_map(|(word, classes)| {
                let mut top: Option<(&str, usize)> = None;
                for (class, count) in classes {
                    if top.is_none_or(|(_, max)| count > max) {
                        top = Some((class, count));
                    }
                }
                top.map(|(class, _)| (word.to_string(), class.to_string()))
            })
            .collect();
        info!("most frequent sense built for {} target words", best.len());

        Ok(Self {
            best,
            fallback: None,
        })
    }

    pub fn with_fallback(mut self, dictionary: Arc<dyn SenseDictionary>) -> Self {
        self.fallback = Some(dictionary);
        self
    }

    pub fn classify(&self, target_word: &str) -> Prediction {
        if let Some(class) = self.best.get(target_word) {
            return Prediction::Sense(class.clone());
        }
        self.fallback
            .as_ref()
            .and_then(|dictionary| dictionary.senses(target_word).into_iter().next())
            .map_or(Prediction::Unknown, |sense| Prediction::Sense(sense.key))
    }
}

impl Disambiguator for MostFrequentSense {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MostFrequentSense
    }

    fn disambiguate(&self, row: &EvalRow) -> Result<Prediction, InputError> {
        let word = target_word(row)?;
        Ok(self.classify(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesk::tests::bank_dictionary;

    fn rows() -> Vec<TrainingRow> {
        vec![
            TrainingRow::new("bank", "bank/river", "a"),
            TrainingRow::new("bank", "bank/money", "b"),
            TrainingRow::new("bank", "bank/money", "c"),
            TrainingRow::new("plant", "plant/factory", "d"),
            TrainingRow::new("plant", "plant/flora", "e"),
        ]
    }

    #[test]
    fn picks_most_frequent_class() {
        let mfs = MostFrequentSense::train(&rows()).unwrap();
        assert_eq!(mfs.classify("bank"), Prediction::Sense("bank/money".into()));
    }

    #[test]
    fn ties_go_to_first_seen_class() {
        let mfs = MostFrequentSense::train(&rows()).unwrap();
        assert_eq!(
            mfs.classify("plant"),
            Prediction::Sense("plant/factory".into())
        );
    }

    #[test]
    fn unseen_word_uses_dictionary_when_attached() {
        let mfs = MostFrequentSense::train(&rows()).unwrap();
        assert_eq!(mfs.classify("teller"), Prediction::Unknown);

        let rows = vec![TrainingRow::new("plant", "plant/flora", "x")];
        let mfs = MostFrequentSense::train(&rows)
            .unwrap()
            .with_fallback(Arc::new(bank_dictionary()));
        assert_eq!(
            mfs.classify("bank"),
            Prediction::Sense("bank%1:17:01::".into())
        );
        assert_eq!(mfs.classify("teller"), Prediction::Unknown);
    }

    #[test]
    fn empty_training_set_is_an_error() {
        assert!(matches!(
            MostFrequentSense::train(&[]),
            Err(DataError::EmptyTrainingSet)
        ));
    }
}
