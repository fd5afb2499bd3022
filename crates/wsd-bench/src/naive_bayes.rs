//! Multinomial Naive Bayes over sense classes.
//!
//! A target word is only ever assigned one of the classes it was observed with
//! in training. Scores are compared in log space:
//! `apriori(c) + sum over in-vocabulary context tokens of loglik(token | c)`.

use std::time::Instant;

use tracing::info;

use crate::corpus::{EvalRow, TrainingRow};
use crate::error::{DataError, InputError};
use crate::likelihood::{DEFAULT_ALPHA, LikelihoodEngine};
use crate::stats::{ClassStats, ModelStatistics, WordCountMode};
use crate::strategy::{Disambiguator, Prediction, StrategyKind, target_word};

/// Training options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NaiveBayesConfig {
    /// Additive smoothing constant, positive.
    pub alpha: f64,
    pub word_count: WordCountMode,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            word_count: WordCountMode::default(),
        }
    }
}

/// Trained classifier. Read-only; safe to share across threads.
#[derive(Debug)]
pub struct NaiveBayesWsd {
    stats: ModelStatistics,
    engine: LikelihoodEngine,
}

impl NaiveBayesWsd {
    pub fn train(rows: &[TrainingRow], config: NaiveBayesConfig) -> Result<Self, DataError> {
        let start = Instant::now();
        let stats = ModelStatistics::build(rows, config.word_count)?;
        info!(
            "naive bayes trained in {} ms (alpha {})",
            start.elapsed().as_millis(),
            config.alpha
        );
        Ok(Self::from_statistics(stats, config.alpha))
    }

    pub fn from_statistics(stats: ModelStatistics, alpha: f64) -> Self {
        Self {
            stats,
            engine: LikelihoodEngine::new(alpha),
        }
    }

    pub fn statistics(&self) -> &ModelStatistics {
        &self.stats
    }

    pub fn alpha(&self) -> f64 {
        self.engine.alpha()
    }

    /// Pick a sense class for `target_word` given a whitespace-separated
    /// context.
    ///
    /// Unseen words yield [`Prediction::Unknown`]. A word with a single
    /// training class gets that class without scoring.
    pub fn classify(&self, target_word: &str, context: &str) -> Prediction {
        let tokens: Vec<&str> = context.split_whitespace().collect();
        self.classify_tokens(target_word, &tokens)
    }

    pub fn classify_tokens(&self, target_word: &str, tokens: &[&str]) -> Prediction {
        let Some(candidates) = self.stats.candidates(target_word) else {
            return Prediction::Unknown;
        };
        let candidates: Vec<&ClassStats> = candidates.collect();
        if let [only] = candidates.as_slice() {
            return Prediction::Sense(only.name.clone());
        }

        let mut best: Option<(&ClassStats, f64)> = None;
        for class in candidates {
            let score = self.class_score(class, tokens);
            // Strict comparison keeps the earliest class on ties.
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((class, score));
            }
        }
        best.map_or(Prediction::Unknown, |(class, _)| {
            Prediction::Sense(class.name.clone())
        })
    }

    /// Posterior score of `class` for the given context tokens, or `None` for
    /// an unknown class name.
    pub fn score(&self, class: &str, tokens: &[&str]) -> Option<f64> {
        self.stats
            .class(class)
            .map(|class| self.class_score(class, tokens))
    }

    fn class_score(&self, class: &ClassStats, tokens: &[&str]) -> f64 {
        let mut score = class.apriori_log_prob;
        for token in tokens.iter().filter(|t| self.stats.in_vocabulary(t)) {
            score += self.engine.log_likelihood(&self.stats, class, token);
        }
        score
    }
}

impl Disambiguator for NaiveBayesWsd {
    fn kind(&self) -> StrategyKind {
        StrategyKind::NaiveBayes
    }

    fn disambiguate(&self, row: &EvalRow) -> Result<Prediction, InputError> {
        let word = target_word(row)?;
        Ok(self.classify(word, &row.context_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_rows() -> Vec<TrainingRow> {
        vec![
            TrainingRow::new("bank", "bank/river", "water flow river"),
            TrainingRow::new("bank", "bank/money", "money deposit account"),
            TrainingRow::new("bank", "bank/money", "loan money"),
            TrainingRow::new("deposit", "deposit/money", "money bank"),
        ]
    }

    fn model() -> NaiveBayesWsd {
        NaiveBayesWsd::train(&bank_rows(), NaiveBayesConfig::default()).unwrap()
    }

    #[test]
    fn two_row_bank_example() {
        let rows = vec![
            TrainingRow::new("bank", "bank/river", "water flow river"),
            TrainingRow::new("bank", "bank/money", "money deposit account"),
        ];
        let model = NaiveBayesWsd::train(&rows, NaiveBayesConfig::default()).unwrap();
        assert_eq!(model.statistics().vocabulary_size(), 6);
        assert_eq!(
            model.classify("bank", "money account"),
            Prediction::Sense("bank/money".into())
        );
    }

    #[test]
    fn unseen_word_is_unknown() {
        assert_eq!(model().classify("teller", "money"), Prediction::Unknown);
    }

    #[test]
    fn single_class_word_skips_scoring() {
        let model = model();
        assert_eq!(
            model.classify("deposit", ""),
            Prediction::Sense("deposit/money".into())
        );
        assert_eq!(
            model.classify("deposit", "water river"),
            Prediction::Sense("deposit/money".into())
        );
    }

    #[test]
    fn context_evidence_picks_the_class() {
        let model = model();
        assert_eq!(
            model.classify("bank", "money deposit"),
            Prediction::Sense("bank/money".into())
        );
        assert_eq!(
            model.classify("bank", "river water flow"),
            Prediction::Sense("bank/river".into())
        );
    }

    #[test]
    fn out_of_vocabulary_tokens_are_ignored() {
        let model = model();
        let with_noise = model.score("bank/river", &["river", "zzz", "qqq"]).unwrap();
        let without = model.score("bank/river", &["river"]).unwrap();
        assert_eq!(with_noise, without);
        assert_eq!(
            model.classify("bank", "zzz qqq"),
            model.classify("bank", "")
        );
    }

    #[test]
    fn empty_context_falls_back_to_priors() {
        let model = model();
        assert_eq!(
            model.score("bank/money", &[]).unwrap(),
            (2.0f64 / 4.0).ln()
        );
        assert_eq!(model.classify("bank", ""), Prediction::Sense("bank/money".into()));
    }

    #[test]
    fn ties_go_to_first_seen_class() {
        let rows = vec![
            TrainingRow::new("w", "w/a", "x"),
            TrainingRow::new("w", "w/b", "y"),
        ];
        let model = NaiveBayesWsd::train(&rows, NaiveBayesConfig::default()).unwrap();
        assert_eq!(
            model.score("w/a", &["z"]),
            model.score("w/b", &["z"])
        );
        assert_eq!(model.classify("w", ""), Prediction::Sense("w/a".into()));
    }

    #[test]
    fn classification_is_idempotent() {
        let model = model();
        let first = model.classify("bank", "money river loan");
        for _ in 0..3 {
            assert_eq!(model.classify("bank", "money river loan"), first);
        }
    }

    #[test]
    fn prediction_is_always_a_training_class_of_the_word() {
        let model = model();
        let allowed = model.statistics().senses_of("bank").unwrap();
        for context in ["", "money", "deposit money", "water", "bank loan river"] {
            let prediction = model.classify("bank", context);
            assert!(allowed.contains(&prediction.sense().unwrap()));
        }
    }

    #[test]
    fn disambiguate_rejects_blank_target() {
        let model = model();
        let row = EvalRow::new("d1.s1.t1", "", "money");
        assert!(matches!(
            model.disambiguate(&row),
            Err(InputError::MissingTargetWord { .. })
        ));
        let row = EvalRow::new("d1.s1.t2", "bank", "money loan");
        assert_eq!(
            model.disambiguate(&row).unwrap(),
            Prediction::Sense("bank/money".into())
        );
    }

    #[test]
    fn empty_training_set_is_an_error() {
        assert!(matches!(
            NaiveBayesWsd::train(&[], NaiveBayesConfig::default()),
            Err(DataError::EmptyTrainingSet)
        ));
    }
}
