// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model routing for the Triago support engine.
//!
//! [`ModelRouter::route`] maps a complexity score onto a closed set of
//! model profiles via deterministic banding; [`ModelRouter::dispatch`]
//! executes the completion against the provider with a bounded
//! retry-then-fallback chain.

pub mod router;

pub use router::{CompletionOutcome, ModelRouter, ProfileKind, RoutingDecision};
