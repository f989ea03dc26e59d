// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Triago integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockEmbedder`] - Deterministic embeddings with canned per-text vectors
//! - [`MockProvider`] - Mock LLM provider with pre-configured responses and
//!   scriptable failures
//! - [`MockTicketing`] - Recording CRM adapter with an outage switch
//! - [`TestHarness`] - Fully assembled engine over the mocks

pub mod harness;
pub mod mock_embedder;
pub mod mock_provider;
pub mod mock_ticketing;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_embedder::MockEmbedder;
pub use mock_provider::MockProvider;
pub use mock_ticketing::MockTicketing;
