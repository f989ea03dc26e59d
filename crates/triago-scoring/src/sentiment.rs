// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexicon-based sentiment polarity scoring.
//!
//! Tokenizes the query, sums weighted polarity terms with negation flipping
//! and intensity boosting, then squashes the raw sum into [-1, 1]. The
//! scorer never aborts the pipeline: a degraded scorer fails closed to
//! neutral 0.0 and logs the event.

use tracing::warn;

use crate::lexicon;

/// How many preceding tokens are scanned for negations and boosters.
pub const NEGATION_WINDOW: usize = 2;

/// Normalization constant from the VADER literature: raw sums are squashed
/// via `s / sqrt(s^2 + ALPHA)`.
const NORMALIZATION_ALPHA: f64 = 15.0;

/// Additional emphasis per trailing exclamation mark, capped at 3.
const EXCLAMATION_EMPHASIS: f64 = 0.1;

/// Coarse polarity label for a sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

/// Map a sentiment score to a coarse label (±0.1 bounds).
pub fn sentiment_label(score: f64) -> SentimentLabel {
    if score >= 0.1 {
        SentimentLabel::Positive
    } else if score <= -0.1 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Deterministic lexicon-based sentiment scorer.
pub struct SentimentScorer {
    /// Polarity entries in use. Empty means the scorer is degraded and
    /// every score fails closed to neutral.
    entries: &'static [(&'static str, f64)],
}

impl SentimentScorer {
    /// Create a scorer backed by the built-in lexicon.
    pub fn new() -> Self {
        Self {
            entries: lexicon::POLARITY,
        }
    }

    /// Create a degraded scorer with no lexicon. Used to exercise the
    /// fail-closed path in tests.
    pub fn degraded() -> Self {
        Self { entries: &[] }
    }

    /// True when the scorer has no usable lexicon.
    pub fn is_degraded(&self) -> bool {
        self.entries.is_empty()
    }

    /// Score sentiment polarity in [-1, 1]. Negative indicates frustration.
    ///
    /// Deterministic given identical input; empty or blank text scores 0.0.
    /// A degraded scorer fails closed to neutral 0.0 instead of erroring.
    pub fn score(&self, text: &str) -> f64 {
        if self.is_degraded() {
            warn!("sentiment scorer degraded, failing closed to neutral");
            return 0.0;
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return 0.0;
        }

        let tokens: Vec<String> = trimmed
            .split_whitespace()
            .map(|t| {
                t.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                    .to_lowercase()
            })
            .filter(|t| !t.is_empty())
            .collect();

        let mut raw_sum = 0.0;
        for (i, token) in tokens.iter().enumerate() {
            let Some(weight) = lexicon::polarity_of(token) else {
                continue;
            };

            let mut adjusted = weight;
            let window_start = i.saturating_sub(NEGATION_WINDOW);
            for prior in &tokens[window_start..i] {
                if lexicon::is_negation(prior) {
                    adjusted = -adjusted;
                } else if let Some(multiplier) = lexicon::booster_of(prior) {
                    adjusted *= multiplier;
                }
            }
            raw_sum += adjusted;
        }

        if raw_sum != 0.0 {
            let exclamations = trimmed.chars().filter(|c| *c == '!').count().min(3);
            raw_sum *= 1.0 + EXCLAMATION_EMPHASIS * exclamations as f64;
        }

        normalize(raw_sum)
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Squash a raw lexicon sum into [-1, 1].
fn normalize(raw: f64) -> f64 {
    (raw / (raw * raw + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}
