// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::TriagoError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for converting query text into fixed-length embedding vectors.
///
/// The embedding powers both semantic cache lookups and the anchor-based
/// complexity signal. Failures surface as
/// [`TriagoError::EmbeddingUnavailable`](crate::TriagoError::EmbeddingUnavailable).
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Generates an embedding for the given text.
    ///
    /// The returned vector always has [`dimensions`](Self::dimensions)
    /// elements.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, TriagoError>;

    /// Fixed output dimensionality of this embedder.
    fn dimensions(&self) -> usize;
}
