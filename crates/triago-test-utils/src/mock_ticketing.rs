// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock CRM ticketing adapter with request capture and an outage switch.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use triago_core::traits::{PluginAdapter, TicketingAdapter};
use triago_core::types::{
    AdapterType, HealthStatus, TicketId, TicketRequest, TicketStatus,
};
use triago_core::TriagoError;

/// A recording ticketing adapter.
///
/// Created tickets and status updates are captured for assertions. While
/// outage mode is set every call fails with `TicketingUnavailable`, which
/// the escalation engine degrades into a local decision.
pub struct MockTicketing {
    created: Mutex<Vec<TicketRequest>>,
    updates: Mutex<Vec<(TicketId, TicketStatus)>>,
    unavailable: AtomicBool,
    next_id: AtomicU32,
}

impl MockTicketing {
    pub fn new() -> Self {
        Self {
            created: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            unavailable: AtomicBool::new(false),
            next_id: AtomicU32::new(1),
        }
    }

    /// Toggle the outage mode.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// All ticket requests received so far.
    pub fn created_tickets(&self) -> Vec<TicketRequest> {
        self.created
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// All status updates received so far.
    pub fn status_updates(&self) -> Vec<(TicketId, TicketStatus)> {
        self.updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for MockTicketing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockTicketing {
    fn name(&self) -> &str {
        "mock-ticketing"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Ticketing
    }

    async fn health_check(&self) -> Result<HealthStatus, TriagoError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Ok(HealthStatus::Unhealthy("outage mode".to_string()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), TriagoError> {
        Ok(())
    }
}

#[async_trait]
impl TicketingAdapter for MockTicketing {
    async fn create_ticket(&self, request: TicketRequest) -> Result<TicketId, TriagoError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TriagoError::TicketingUnavailable {
                message: "mock ticketing in outage mode".to_string(),
            });
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.created
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        Ok(TicketId(format!("TKT-{n:04}")))
    }

    async fn update_status(
        &self,
        ticket_id: &TicketId,
        status: TicketStatus,
    ) -> Result<(), TriagoError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TriagoError::TicketingUnavailable {
                message: "mock ticketing in outage mode".to_string(),
            });
        }
        self.updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((ticket_id.clone(), status));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use triago_core::types::{EscalationReason, SessionId, TicketPriority};

    use super::*;

    fn request() -> TicketRequest {
        TicketRequest {
            session_id: SessionId("s-1".into()),
            customer_id: "c-1".into(),
            reason: EscalationReason::ManualRequest,
            priority: TicketPriority::Medium,
            context: "ctx".into(),
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let ticketing = MockTicketing::new();
        let a = ticketing.create_ticket(request()).await.unwrap();
        let b = ticketing.create_ticket(request()).await.unwrap();
        assert_eq!(a.0, "TKT-0001");
        assert_eq!(b.0, "TKT-0002");
        assert_eq!(ticketing.created_tickets().len(), 2);
    }

    #[tokio::test]
    async fn outage_mode_fails_and_records_nothing() {
        let ticketing = MockTicketing::new();
        ticketing.set_unavailable(true);
        let err = ticketing.create_ticket(request()).await.unwrap_err();
        assert!(matches!(err, TriagoError::TicketingUnavailable { .. }));
        assert!(ticketing.created_tickets().is_empty());
    }

    #[tokio::test]
    async fn status_updates_are_captured() {
        let ticketing = MockTicketing::new();
        let id = ticketing.create_ticket(request()).await.unwrap();
        ticketing
            .update_status(&id, TicketStatus::Resolved)
            .await
            .unwrap();
        let updates = ticketing.status_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].1, TicketStatus::Resolved);
    }
}
