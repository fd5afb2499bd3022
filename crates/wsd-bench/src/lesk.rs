//! Simplified Lesk: pick the sense whose gloss shares the most words with the
//! context.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;

use crate::corpus::EvalRow;
use crate::error::InputError;
use crate::strategy::{Disambiguator, Prediction, StrategyKind, target_word};
use crate::text::{signature_tokens, word_tokenize};

/// One dictionary sense of a word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SenseGloss {
    /// Sense key of the sense's first lemma.
    pub key: String,
    pub definition: String,
    pub examples: Vec<String>,
}

impl SenseGloss {
    /// Definition followed by every example, space-joined.
    pub fn signature_text(&self) -> String {
        let mut text = self.definition.clone();
        for example in &self.examples {
            text.push(' ');
            text.push_str(example);
        }
        text
    }
}

/// Sense inventory consulted by the dictionary-based strategies.
pub trait SenseDictionary: Send + Sync {
    /// Senses of `word` in dictionary order; empty when the word is unknown.
    fn senses(&self, word: &str) -> Vec<SenseGloss>;
}

pub struct SimplifiedLesk {
    dictionary: Arc<dyn SenseDictionary>,
    signatures: DashMap<String, Arc<HashSet<String>>>,
}

impl SimplifiedLesk {
    pub fn new(dictionary: Arc<dyn SenseDictionary>) -> Self {
        Self {
            dictionary,
            signatures: DashMap::new(),
        }
    }

    pub fn classify(&self, target_word: &str, context: &str) -> Prediction {
        let senses = self.dictionary.senses(target_word);
        let Some(first) = senses.first() else {
            return Prediction::Unknown;
        };
        let context = word_tokenize(context);

        let mut best = first;
        let mut max_overlap = 0;
        for sense in &senses {
            let signature = self.signature(sense);
            let overlap = compute_overlap(&signature, &context);
            if overlap > max_overlap {
                max_overlap = overlap;
                best = sense;
            }
        }
        Prediction::Sense(best.key.clone())
    }

    fn signature(&self, sense: &SenseGloss) -> Arc<HashSet<String>> {
        if let Some(cached) = self.signatures.get(&sense.key) {
            return Arc::clone(&cached);
        }
        let signature = Arc::new(signature_tokens(&sense.signature_text()));
        self.signatures
            .insert(sense.key.clone(), Arc::clone(&signature));
        signature
    }
}

impl Disambiguator for SimplifiedLesk {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Lesk
    }

    fn disambiguate(&self, row: &EvalRow) -> Result<Prediction, InputError> {
        let word = target_word(row)?;
        Ok(self.classify(word, &row.context_string))
    }
}

/// Number of context tokens found in the signature, repeats included.
pub fn compute_overlap(signature: &HashSet<String>, context: &[String]) -> usize {
    context
        .iter()
        .filter(|token| signature.contains(token.as_str()))
        .count()
}
