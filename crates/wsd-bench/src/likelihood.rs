//! Smoothed log-likelihood of a context word given a sense class.
//!
//! `ln((occurrences + alpha) / (word_count + alpha * |V|))`, where
//! `occurrences` counts whole-word matches of the token inside the class's
//! concatenated context text. A match must be delimited by word boundaries in
//! the regular-expression sense (`\bTOKEN\b`), so a token that starts or ends
//! with punctuation only matches where the neighbouring character changes
//! word-ness.

use crate::stats::{ClassStats, ModelStatistics};

pub const DEFAULT_ALPHA: f64 = 1.0;

/// Computes likelihoods against frozen statistics.
///
/// Holds no state besides `alpha`; every call is a pure function of the
/// statistics it is given.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LikelihoodEngine {
    alpha: f64,
}

impl LikelihoodEngine {
    /// `alpha` must be positive and finite.
    pub fn new(alpha: f64) -> Self {
        debug_assert!(alpha > 0.0 && alpha.is_finite(), "alpha must be positive");
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn log_likelihood(&self, stats: &ModelStatistics, class: &ClassStats, token: &str) -> f64 {
        let occurrences = count_whole_word(&class.context_text, token) as f64;
        let denominator = class.word_count as f64 + self.alpha * stats.vocabulary_size() as f64;
        ((occurrences + self.alpha) / denominator).ln()
    }
}

impl Default for LikelihoodEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

/// Non-overlapping, leftmost-first count of `\btoken\b` in `text`.
pub fn count_whole_word(text: &str, token: &str) -> usize {
    let (Some(first), Some(last)) = (token.chars().next(), token.chars().next_back()) else {
        return 0;
    };

    let mut count = 0;
    let mut pos = 0;
    while let Some(found) = text[pos..].find(token) {
        let start = pos + found;
        let end = start + token.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        if is_boundary(before, first) && is_boundary(after, last) {
            count += 1;
            pos = end;
        } else {
            pos = start + first.len_utf8();
        }
    }
    count
}

fn is_boundary(outside: Option<char>, inside: char) -> bool {
    outside.is_some_and(is_word_char) != is_word_char(inside)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
