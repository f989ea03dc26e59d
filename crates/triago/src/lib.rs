// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Triago: a customer-support query routing, semantic caching, and
//! escalation engine.
//!
//! The engine routes queries across language-model profiles by estimated
//! complexity, serves semantically near-duplicate queries from a
//! similarity-indexed cache, and escalates sessions to human agents when
//! sentiment, complexity, or repeated failures cross risk thresholds.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use triago::TriagoEngine;
//! use triago_config::TriagoConfig;
//! # use triago_core::traits::{EmbeddingAdapter, ProviderAdapter, TicketingAdapter};
//! # async fn run(
//! #     embedder: Arc<dyn EmbeddingAdapter>,
//! #     provider: Arc<dyn ProviderAdapter>,
//! #     ticketing: Arc<dyn TicketingAdapter>,
//! # ) -> Result<(), triago_core::TriagoError> {
//! let engine = TriagoEngine::builder(TriagoConfig::default())
//!     .with_embedder(embedder)
//!     .with_provider(provider)
//!     .with_ticketing(ticketing)
//!     .build()
//!     .await?;
//!
//! let envelope = engine
//!     .process_query("What are your business hours?", "session-1", "customer-1")
//!     .await?;
//! println!("{} (cached: {})", envelope.response_text, envelope.cached);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod envelope;
pub mod session;

pub use engine::{EngineHealth, TriagoEngine, TriagoEngineBuilder};
pub use envelope::ResponseEnvelope;
pub use session::{SessionSnapshot, SessionState, SessionStore};
