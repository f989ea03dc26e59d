// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Complexity and sentiment scoring for the Triago support engine.
//!
//! Both scorers are deterministic, synchronous, and side-effect free. The
//! complexity scorer blends zero-cost heuristic rules with an optional
//! embedding anchor signal; the sentiment scorer is a weighted-lexicon
//! polarity estimate that fails closed to neutral.

pub mod complexity;
pub mod lexicon;
pub mod sentiment;

pub use complexity::{ComplexityScorer, QueryClass};
pub use sentiment::{sentiment_label, SentimentLabel, SentimentScorer};
