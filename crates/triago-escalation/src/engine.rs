// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escalation trigger evaluation, priority mapping, and ticket creation.

use std::time::Duration;

use chrono::Utc;
use metrics::counter;
use tokio::time::timeout;
use tracing::{info, warn};
use triago_config::model::EscalationConfig;
use triago_core::traits::TicketingAdapter;
use triago_core::types::{
    EscalationReason, SessionId, TicketId, TicketPriority, TicketRequest, TicketStatus,
};
use triago_core::TriagoError;

use crate::ticket::EscalationTicket;

/// Phrases that count as an explicit request for a human agent.
const MANUAL_REQUEST_PHRASES: &[&str] = &[
    "speak to a human",
    "speak to an agent",
    "speak with a human",
    "talk to a human",
    "talk to an agent",
    "talk to a person",
    "real person",
    "human agent",
    "human support",
    "live agent",
    "customer representative",
    "speak to a representative",
    "transfer me to",
];

/// Returns true when the query text explicitly asks for a human agent.
pub fn detect_manual_request(text: &str) -> bool {
    let lowered = text.to_lowercase();
    MANUAL_REQUEST_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}

/// Per-query signals the engine evaluates escalation triggers against.
#[derive(Debug, Clone, Default)]
pub struct EscalationSignals {
    /// Sentiment score in [-1.0, 1.0].
    pub sentiment_score: f64,
    /// Complexity score in [0.0, 1.0].
    pub complexity_score: f64,
    /// Consecutive model failures in this session, including the current
    /// query when it failed.
    pub consecutive_failures: u32,
    /// Explicit human request, from phrase detection or a caller flag.
    pub manual_request: bool,
    /// Caller-supplied priority for manual requests.
    pub requested_priority: Option<TicketPriority>,
}

/// A positive escalation decision: why, and at what priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationDecision {
    pub reason: EscalationReason,
    pub priority: TicketPriority,
}

/// Evaluates escalation triggers and drives ticket creation.
pub struct EscalationEngine {
    config: EscalationConfig,
}

impl EscalationEngine {
    pub fn new(config: EscalationConfig) -> Self {
        Self { config }
    }

    /// Evaluate the trigger conditions against the signals.
    ///
    /// Returns `None` when no trigger fires. Trigger precedence when
    /// several fire at once: negative sentiment, then high complexity,
    /// then repeated failures, then manual request. The priority mapping
    /// still sees all signals, so a manually-requested escalation with
    /// very negative sentiment comes out urgent.
    pub fn evaluate(&self, signals: &EscalationSignals) -> Option<EscalationDecision> {
        let reason = if signals.sentiment_score < self.config.sentiment_escalation_threshold {
            EscalationReason::NegativeSentiment
        } else if signals.complexity_score > self.config.escalation_complexity_threshold {
            EscalationReason::HighComplexity
        } else if signals.consecutive_failures > self.config.max_consecutive_failures {
            EscalationReason::RepeatedFailures
        } else if signals.manual_request {
            EscalationReason::ManualRequest
        } else {
            return None;
        };

        Some(EscalationDecision {
            reason,
            priority: priority_for(reason, signals),
        })
    }

    /// Create an escalation ticket against the CRM.
    ///
    /// On [`TriagoError::TicketingUnavailable`] or a timed-out call the
    /// escalation degrades to a locally-generated ticket with
    /// `pending_retry` set; the response path is never failed by the
    /// ticketing collaborator.
    pub async fn open_ticket(
        &self,
        ticketing: &dyn TicketingAdapter,
        session_id: &SessionId,
        customer_id: &str,
        decision: EscalationDecision,
        context: String,
        call_timeout: Duration,
    ) -> EscalationTicket {
        let request = TicketRequest {
            session_id: session_id.clone(),
            customer_id: customer_id.to_string(),
            reason: decision.reason,
            priority: decision.priority,
            context,
        };

        let result = match timeout(call_timeout, ticketing.create_ticket(request)).await {
            Ok(inner) => inner,
            Err(_) => Err(TriagoError::Timeout {
                duration: call_timeout,
            }),
        };

        match result {
            Ok(ticket_id) => {
                counter!("triago_escalation_tickets_total", "outcome" => "created").increment(1);
                info!(
                    session_id = %session_id,
                    ticket_id = %ticket_id,
                    reason = %decision.reason,
                    priority = %decision.priority,
                    "escalation ticket created"
                );
                EscalationTicket {
                    ticket_id,
                    session_id: session_id.clone(),
                    reason: decision.reason,
                    priority: decision.priority,
                    created_at: Utc::now(),
                    status: TicketStatus::Open,
                    pending_retry: false,
                }
            }
            Err(err) => {
                counter!("triago_escalation_tickets_total", "outcome" => "local").increment(1);
                warn!(
                    session_id = %session_id,
                    reason = %decision.reason,
                    error = %err,
                    "ticketing unavailable, recording local escalation"
                );
                EscalationTicket {
                    ticket_id: TicketId(format!("local-{}", uuid::Uuid::new_v4())),
                    session_id: session_id.clone(),
                    reason: decision.reason,
                    priority: decision.priority,
                    created_at: Utc::now(),
                    status: TicketStatus::Open,
                    pending_retry: true,
                }
            }
        }
    }

    /// Relay a resolution to the CRM. Local tickets flagged
    /// `pending_retry` have nothing to update upstream.
    pub async fn resolve_ticket(
        &self,
        ticketing: &dyn TicketingAdapter,
        ticket: &EscalationTicket,
        call_timeout: Duration,
    ) -> Result<(), TriagoError> {
        if ticket.pending_retry {
            return Ok(());
        }
        match timeout(
            call_timeout,
            ticketing.update_status(&ticket.ticket_id, TicketStatus::Resolved),
        )
        .await
        {
            Ok(inner) => inner,
            Err(_) => Err(TriagoError::Timeout {
                duration: call_timeout,
            }),
        }
    }
}

/// Map a decision and the full signal set to a ticket priority.
fn priority_for(reason: EscalationReason, signals: &EscalationSignals) -> TicketPriority {
    if signals.sentiment_score < -0.8 {
        return TicketPriority::Urgent;
    }
    if signals.sentiment_score < -0.5 || signals.complexity_score > 0.8 {
        return TicketPriority::High;
    }
    match reason {
        EscalationReason::RepeatedFailures => TicketPriority::Medium,
        EscalationReason::ManualRequest => {
            signals.requested_priority.unwrap_or(TicketPriority::Medium)
        }
        _ => TicketPriority::Medium,
    }
}
