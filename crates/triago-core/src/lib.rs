// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Triago support engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Triago workspace. The external
//! collaborators (embedder, LLM backends, CRM ticketing) are consumed
//! through the adapter traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TriagoError;
pub use types::{
    cosine_similarity, AdapterType, EscalationReason, EscalationStatus, HealthStatus, MessageId,
    Query, SessionId, TicketId, TicketPriority, TicketStatus,
};

// Re-export all adapter traits at crate root.
pub use traits::{EmbeddingAdapter, PluginAdapter, ProviderAdapter, TicketingAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct() {
        let _validation = TriagoError::Validation("empty query".into());
        let _embedding = TriagoError::EmbeddingUnavailable {
            message: "connection refused".into(),
        };
        let _model = TriagoError::Model {
            status: Some(502),
            message: "bad gateway".into(),
        };
        let _terminal = TriagoError::ModelUnavailable {
            session_id: "s-1".into(),
            attempts: 4,
        };
        let _ticketing = TriagoError::TicketingUnavailable {
            message: "crm offline".into(),
        };
        let _timeout = TriagoError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
    }

    #[test]
    fn all_adapter_traits_are_exported() {
        // If any trait module is missing or fails to compile, this test
        // won't compile.
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_embedding_adapter<T: EmbeddingAdapter>() {}
        fn _assert_provider_adapter<T: ProviderAdapter>() {}
        fn _assert_ticketing_adapter<T: TicketingAdapter>() {}
    }
}
