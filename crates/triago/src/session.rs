// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session conversation state and the session store.
//!
//! Sessions are keyed by session id in a concurrent map. Each holds its
//! state behind a `tokio::sync::Mutex`, which queues waiters in FIFO
//! order, so queries within one session are processed in arrival order
//! while distinct sessions run fully in parallel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use triago_core::types::{EscalationStatus, SessionId, TicketId};
use triago_escalation::EscalationTicket;

/// Mutable state of an active session. Mutated only by the pipeline
/// coordinator while holding the per-session lock.
#[derive(Debug)]
pub struct SessionState {
    pub session_id: SessionId,
    pub customer_id: String,
    /// Successfully processed queries in this session.
    pub message_count: u64,
    /// Running average of per-exchange sentiment scores.
    pub cumulative_sentiment: f64,
    pub escalation_status: EscalationStatus,
    /// Model failures since the last successful completion.
    pub consecutive_failures: u32,
    pub created_at: DateTime<Utc>,
    /// Escalation ticket for this session, once one exists.
    pub ticket: Option<EscalationTicket>,
}

impl SessionState {
    fn new(session_id: SessionId, customer_id: String) -> Self {
        Self {
            session_id,
            customer_id,
            message_count: 0,
            cumulative_sentiment: 0.0,
            escalation_status: EscalationStatus::None,
            consecutive_failures: 0,
            created_at: Utc::now(),
            ticket: None,
        }
    }

    /// Fold a new exchange sentiment into the running average.
    pub fn record_sentiment(&mut self, sentiment: f64) {
        self.message_count += 1;
        self.cumulative_sentiment +=
            (sentiment - self.cumulative_sentiment) / self.message_count as f64;
    }

    /// Advance escalation status, ignoring transitions that would regress.
    pub fn advance_escalation(&mut self, next: EscalationStatus) -> bool {
        if self.escalation_status.can_advance_to(next) {
            self.escalation_status = next;
            true
        } else {
            false
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            customer_id: self.customer_id.clone(),
            message_count: self.message_count,
            cumulative_sentiment: self.cumulative_sentiment,
            escalation_status: self.escalation_status,
            consecutive_failures: self.consecutive_failures,
            created_at: self.created_at,
            ticket_id: self.ticket.as_ref().map(|t| t.ticket_id.clone()),
            ticket_pending_retry: self.ticket.as_ref().map(|t| t.pending_retry),
        }
    }
}

/// Read-only view of a session, safe to hand out without the lock.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub customer_id: String,
    pub message_count: u64,
    pub cumulative_sentiment: f64,
    pub escalation_status: EscalationStatus,
    pub consecutive_failures: u32,
    pub created_at: DateTime<Utc>,
    pub ticket_id: Option<TicketId>,
    pub ticket_pending_retry: Option<bool>,
}

/// Concurrent map of active sessions.
pub struct SessionStore {
    sessions: DashMap<String, Arc<Mutex<SessionState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Fetch the session for an id, creating it on first use.
    pub fn get_or_create(&self, session_id: &str, customer_id: &str) -> Arc<Mutex<SessionState>> {
        let entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                Arc::new(Mutex::new(SessionState::new(
                    SessionId(session_id.to_string()),
                    customer_id.to_string(),
                )))
            });
        Arc::clone(entry.value())
    }

    /// Fetch an existing session without creating one.
    pub fn get(&self, session_id: &str) -> Option<Arc<Mutex<SessionState>>> {
        self.sessions
            .get(session_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Remove a session from the store, returning its final state.
    pub fn remove(&self, session_id: &str) -> Option<Arc<Mutex<SessionState>>> {
        self.sessions.remove(session_id).map(|(_, state)| state)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
