// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding adapter with deterministic, controllable vectors.
//!
//! Tests that need a specific similarity between two queries register
//! canned vectors for both texts. Unregistered texts fall back to a
//! hash-derived vector, so distinct texts come out dissimilar and the
//! same text always embeds identically.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use triago_core::traits::{EmbeddingAdapter, PluginAdapter};
use triago_core::types::{AdapterType, HealthStatus};
use triago_core::TriagoError;

const DEFAULT_DIMENSIONS: usize = 8;

/// A mock embedder returning canned or hash-derived vectors.
pub struct MockEmbedder {
    dimensions: usize,
    canned: RwLock<HashMap<String, Vec<f32>>>,
    unavailable: AtomicBool,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
            canned: RwLock::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Register a canned vector for an exact text. Panics in tests if the
    /// vector length does not match the embedder dimensionality.
    pub fn set_vector(&self, text: impl Into<String>, vector: Vec<f32>) {
        assert_eq!(vector.len(), self.dimensions, "canned vector length");
        self.canned
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(text.into(), vector);
    }

    /// Toggle the outage mode. While set, `embed` fails with
    /// `EmbeddingUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn hash_vector(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();
        (0..self.dimensions)
            .map(|_| {
                // splitmix64 step per component
                state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
                let mut z = state;
                z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
                z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
                z ^= z >> 31;
                (z as f64 / u64::MAX as f64 * 2.0 - 1.0) as f32
            })
            .collect()
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, TriagoError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Ok(HealthStatus::Unhealthy("outage mode".to_string()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), TriagoError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, TriagoError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TriagoError::EmbeddingUnavailable {
                message: "mock embedder in outage mode".to_string(),
            });
        }
        let canned = self.canned.read().unwrap_or_else(|e| e.into_inner());
        Ok(canned
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.hash_vector(text)))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use triago_core::cosine_similarity;

    use super::*;

    #[tokio::test]
    async fn same_text_embeds_identically() {
        let embedder = MockEmbedder::new();
        let a = embedder.embed("hello world").await.unwrap();
        let b = embedder.embed("hello world").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), embedder.dimensions());
    }

    #[tokio::test]
    async fn canned_vectors_override_hashing() {
        let embedder = MockEmbedder::new();
        let v = vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        embedder.set_vector("pinned", v.clone());
        assert_eq!(embedder.embed("pinned").await.unwrap(), v);
    }

    #[tokio::test]
    async fn canned_vectors_control_similarity() {
        let embedder = MockEmbedder::new();
        embedder.set_vector("a", vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        embedder.set_vector("b", vec![0.92, 0.392, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let a = embedder.embed("a").await.unwrap();
        let b = embedder.embed("b").await.unwrap();
        let sim = cosine_similarity(&a, &b);
        assert!((sim - 0.92).abs() < 0.01, "got {sim}");
    }

    #[tokio::test]
    async fn outage_mode_fails_embed() {
        let embedder = MockEmbedder::new();
        embedder.set_unavailable(true);
        let err = embedder.embed("anything").await.unwrap_err();
        assert!(matches!(err, TriagoError::EmbeddingUnavailable { .. }));
    }
}
