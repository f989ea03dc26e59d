// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Triago engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a processed message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Unique identifier for an escalation ticket, assigned by the ticketing
/// collaborator (or locally when the collaborator is unavailable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(pub String);

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Embedding,
    Provider,
    Ticketing,
}

/// An incoming customer query. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// Raw query text as received from the front door.
    pub text: String,
    /// Session this query belongs to.
    pub session_id: SessionId,
    /// Customer the session belongs to.
    pub customer_id: String,
    /// UTC timestamp when the query entered the pipeline.
    pub received_at: DateTime<Utc>,
}

/// Role of a chat message sent to an LLM provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message in a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A completion request to an LLM provider backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model name from the selected profile.
    pub model: String,
    /// Opaque endpoint reference from the selected profile.
    pub endpoint_ref: String,
    /// Conversation messages, system prompt first.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// A completion response from an LLM provider backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated response text.
    pub text: String,
    /// Model that actually served the request.
    pub model: String,
    /// Total tokens consumed, when the backend reports usage.
    pub tokens_used: Option<u32>,
}

/// Why a session was escalated to a human agent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EscalationReason {
    /// Sentiment fell below the escalation threshold.
    NegativeSentiment,
    /// Complexity exceeded the escalation threshold.
    HighComplexity,
    /// Consecutive model failures exceeded the session limit.
    RepeatedFailures,
    /// The customer explicitly asked for a human agent.
    ManualRequest,
}

/// Priority assigned to an escalation ticket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Urgent,
    High,
    Medium,
    Low,
}

/// Lifecycle status of an escalation ticket in the external CRM.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
}

/// Per-session escalation state. Forward-only within the taxonomy
/// none -> pending -> escalated -> resolved.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, Default,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EscalationStatus {
    #[default]
    None,
    Pending,
    Escalated,
    Resolved,
}

impl EscalationStatus {
    fn rank(self) -> u8 {
        match self {
            EscalationStatus::None => 0,
            EscalationStatus::Pending => 1,
            EscalationStatus::Escalated => 2,
            EscalationStatus::Resolved => 3,
        }
    }

    /// True when moving to `next` preserves the forward-only invariant.
    pub fn can_advance_to(self, next: EscalationStatus) -> bool {
        next.rank() >= self.rank()
    }
}

/// Compute cosine similarity between two raw (not necessarily normalized)
/// embedding vectors.
///
/// Returns 0.0 for zero-norm vectors so degenerate embeddings never match
/// anything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// A request to the external ticketing collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRequest {
    pub session_id: SessionId,
    pub customer_id: String,
    pub reason: EscalationReason,
    pub priority: TicketPriority,
    /// Human-readable escalation summary handed to the agent.
    pub context: String,
}
