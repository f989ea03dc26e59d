// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete engine over the mock adapters.
//! Anchors are disabled by default so complexity scores in tests come from
//! the deterministic heuristic alone; tests that want the embedding signal
//! opt back in.

use std::sync::Arc;

use triago::TriagoEngine;
use triago_config::TriagoConfig;
use triago_core::TriagoError;

use crate::mock_embedder::MockEmbedder;
use crate::mock_provider::MockProvider;
use crate::mock_ticketing::MockTicketing;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: TriagoConfig,
    responses: Vec<String>,
    keep_anchors: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: TriagoConfig::default(),
            responses: Vec::new(),
            keep_anchors: false,
        }
    }

    /// Replace the default configuration.
    pub fn with_config(mut self, config: TriagoConfig) -> Self {
        self.config = config;
        self
    }

    /// Set mock provider responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Keep the configured anchor phrases so complexity blends in the
    /// embedding signal from the mock embedder.
    pub fn with_anchors(mut self) -> Self {
        self.keep_anchors = true;
        self
    }

    /// Build the test harness, wiring all mocks into an engine.
    pub async fn build(mut self) -> Result<TestHarness, TriagoError> {
        if !self.keep_anchors {
            self.config.scoring.simple_anchors.clear();
            self.config.scoring.complex_anchors.clear();
        }

        let embedder = Arc::new(MockEmbedder::new());
        let provider = Arc::new(if self.responses.is_empty() {
            MockProvider::new()
        } else {
            MockProvider::with_responses(self.responses)
        });
        let ticketing = Arc::new(MockTicketing::new());

        let engine = TriagoEngine::builder(self.config)
            .with_embedder(embedder.clone())
            .with_provider(provider.clone())
            .with_ticketing(ticketing.clone())
            .build()
            .await?;

        Ok(TestHarness {
            engine,
            embedder,
            provider,
            ticketing,
        })
    }
}

/// A fully assembled engine over mock adapters, plus handles to the mocks
/// for scripting and assertions.
pub struct TestHarness {
    pub engine: TriagoEngine,
    pub embedder: Arc<MockEmbedder>,
    pub provider: Arc<MockProvider>,
    pub ticketing: Arc<MockTicketing>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_builds_and_serves_a_query() {
        let harness = TestHarness::builder()
            .with_mock_responses(vec!["We are open 9-5.".to_string()])
            .build()
            .await
            .unwrap();
        let envelope = harness
            .engine
            .process_query("What are your business hours?", "s-1", "c-1")
            .await
            .unwrap();
        assert_eq!(envelope.response_text, "We are open 9-5.");
        assert!(!envelope.cached);
        assert_eq!(harness.provider.call_count(), 1);
    }
}
