// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in polarity lexicon for the sentiment scorer.
//!
//! Weights follow the VADER convention: roughly -4.0 to 4.0 per token,
//! later squashed into [-1, 1] by the scorer's normalization.

/// (token, polarity weight) pairs. Negative weights mark frustration terms
/// common in support conversations.
pub const POLARITY: &[(&str, f64)] = &[
    // Negative.
    ("angry", -2.5),
    ("annoyed", -1.5),
    ("annoying", -1.6),
    ("awful", -2.5),
    ("bad", -1.5),
    ("broken", -1.5),
    ("cancel", -0.8),
    ("complaint", -1.3),
    ("confusing", -1.2),
    ("disappointed", -1.8),
    ("disappointing", -1.8),
    ("fail", -1.5),
    ("failed", -1.5),
    ("failing", -1.5),
    ("frustrated", -2.0),
    ("frustrating", -2.0),
    ("furious", -2.8),
    ("hate", -2.5),
    ("horrible", -2.5),
    ("impossible", -1.4),
    ("issue", -0.8),
    ("outraged", -2.7),
    ("problem", -1.0),
    ("ridiculous", -2.0),
    ("slow", -1.0),
    ("terrible", -2.5),
    ("unacceptable", -2.5),
    ("unhappy", -1.8),
    ("unusable", -2.0),
    ("upset", -1.8),
    ("useless", -2.0),
    ("waiting", -0.6),
    ("worst", -2.5),
    ("wrong", -1.2),
    // Positive.
    ("amazing", 2.5),
    ("appreciate", 1.8),
    ("awesome", 2.5),
    ("excellent", 2.5),
    ("fantastic", 2.5),
    ("glad", 1.6),
    ("good", 1.5),
    ("great", 2.0),
    ("happy", 1.9),
    ("helpful", 1.8),
    ("love", 2.5),
    ("perfect", 2.5),
    ("pleased", 1.7),
    ("resolved", 1.4),
    ("solved", 1.5),
    ("thank", 1.5),
    ("thanks", 1.5),
    ("wonderful", 2.4),
];

/// Tokens that flip the polarity of the following sentiment word
/// (within [`NEGATION_WINDOW`](crate::sentiment::NEGATION_WINDOW) tokens).
pub const NEGATIONS: &[&str] = &[
    "not", "no", "never", "cannot", "can't", "cant", "don't", "dont", "doesn't", "doesnt",
    "won't", "wont", "isn't", "isnt", "wasn't", "wasnt", "couldn't", "couldnt", "nothing",
];

/// (token, multiplier) intensity boosters applied to the following
/// sentiment word.
pub const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", 1.4),
    ("completely", 1.4),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("really", 1.3),
    ("so", 1.2),
    ("totally", 1.4),
    ("very", 1.3),
];

/// Look up the polarity weight of a token.
pub fn polarity_of(token: &str) -> Option<f64> {
    POLARITY
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, w)| *w)
}

/// Look up the booster multiplier of a token.
pub fn booster_of(token: &str) -> Option<f64> {
    BOOSTERS.iter().find(|(t, _)| *t == token).map(|(_, m)| *m)
}

/// True if the token negates a following sentiment word.
pub fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token)
}
