// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Triago support engine.

use thiserror::Error;

/// The primary error type used across all Triago adapter traits and core operations.
#[derive(Debug, Error)]
pub enum TriagoError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed query or session input, rejected before pipeline entry.
    #[error("validation error: {0}")]
    Validation(String),

    /// The embedding backend is unreachable or returned an unusable vector.
    ///
    /// Aborts the query: routing and caching both require the vector, so
    /// there is no silent fallback.
    #[error("embedding unavailable: {message}")]
    EmbeddingUnavailable { message: String },

    /// A single model-call attempt failed (network error, non-2xx, bad payload).
    ///
    /// Per-attempt error; the router's retry/fallback chain consumes these
    /// before surfacing [`TriagoError::ModelUnavailable`].
    #[error("model error{}: {message}", status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Model { status: Option<u16>, message: String },

    /// Terminal model failure after retry and fallback are exhausted.
    #[error("model unavailable for session {session_id} after {attempts} attempts")]
    ModelUnavailable { session_id: String, attempts: u32 },

    /// The ticketing collaborator is unreachable.
    ///
    /// Non-fatal: escalation degrades to a local-only decision with a
    /// pending-retry flag instead of failing the query.
    #[error("ticketing unavailable: {message}")]
    TicketingUnavailable { message: String },

    /// An external call exceeded its configured timeout.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TriagoError {
    /// Short machine-readable kind used in structured log events.
    pub fn kind(&self) -> &'static str {
        match self {
            TriagoError::Config(_) => "config",
            TriagoError::Validation(_) => "validation",
            TriagoError::EmbeddingUnavailable { .. } => "embedding_unavailable",
            TriagoError::Model { .. } => "model",
            TriagoError::ModelUnavailable { .. } => "model_unavailable",
            TriagoError::TicketingUnavailable { .. } => "ticketing_unavailable",
            TriagoError::Timeout { .. } => "timeout",
            TriagoError::Internal(_) => "internal",
        }
    }

    /// True for failures the router treats as retryable within one profile.
    pub fn is_model_attempt_failure(&self) -> bool {
        matches!(
            self,
            TriagoError::Model { .. } | TriagoError::Timeout { .. }
        )
    }
}
