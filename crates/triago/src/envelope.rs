// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response envelope returned to the front door for every processed query.

use triago_core::types::{EscalationReason, MessageId, SessionId, TicketId};

/// Everything the front door needs about one processed query.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    /// The answer text, from the model or the semantic cache.
    pub response_text: String,
    /// Model that produced the response (possibly at cache-insert time).
    pub model_used: String,
    /// Sentiment of the current exchange, in [-1.0, 1.0].
    pub sentiment_score: f64,
    /// Complexity of the query, in [0.0, 1.0].
    pub complexity_score: f64,
    /// Wall-clock pipeline latency in milliseconds.
    pub response_time_ms: u64,
    /// True when the response came from the semantic cache.
    pub cached: bool,
    /// True when the session is escalated after this query.
    pub escalated: bool,
    /// Reason behind the session's escalation, when escalated.
    pub escalation_reason: Option<EscalationReason>,
    /// Ticket backing the escalation. Ids prefixed `local-` were minted
    /// while the CRM was unreachable.
    pub ticket_id: Option<TicketId>,
    pub message_id: MessageId,
    pub session_id: SessionId,
}
