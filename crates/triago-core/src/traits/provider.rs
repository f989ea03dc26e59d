// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM backend integrations.

use async_trait::async_trait;

use crate::error::TriagoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// Adapter for LLM backend integrations.
///
/// Provider adapters handle communication with language model APIs. The
/// router drives retries and fallback chaining above this trait; a single
/// `complete` call maps to exactly one backend attempt.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, TriagoError>;
}
