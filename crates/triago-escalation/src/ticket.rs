// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escalation ticket record and the agent-facing summary text.

use chrono::{DateTime, Utc};
use triago_core::types::{EscalationReason, SessionId, TicketId, TicketPriority, TicketStatus};

/// Longest query excerpt carried in the ticket context.
const EXCERPT_CHARS: usize = 200;

/// An escalation ticket as tracked by the engine.
///
/// `pending_retry` marks tickets created locally while the CRM was
/// unreachable; their ids are engine-generated and nothing exists upstream
/// yet.
#[derive(Debug, Clone)]
pub struct EscalationTicket {
    pub ticket_id: TicketId,
    pub session_id: SessionId,
    pub reason: EscalationReason,
    pub priority: TicketPriority,
    pub created_at: DateTime<Utc>,
    pub status: TicketStatus,
    pub pending_retry: bool,
}

/// Session context folded into the ticket summary.
#[derive(Debug, Clone)]
pub struct SummaryInput<'a> {
    pub reason: EscalationReason,
    pub priority: TicketPriority,
    pub message_count: u64,
    pub latest_query: &'a str,
    pub sentiment_score: f64,
    pub complexity_score: f64,
}

/// Build the human-readable summary handed to the agent as ticket context.
pub fn summarize_for_agent(input: &SummaryInput<'_>) -> String {
    let mut excerpt: String = input.latest_query.chars().take(EXCERPT_CHARS).collect();
    if input.latest_query.chars().count() > EXCERPT_CHARS {
        excerpt.push_str("...");
    }
    format!(
        "Escalation: {} (priority {})\n\
         Messages in session: {}\n\
         Sentiment: {:.2}, complexity: {:.2}\n\
         Latest query: {}",
        input.reason, input.priority, input.message_count, input.sentiment_score,
        input.complexity_score, excerpt
    )
}
