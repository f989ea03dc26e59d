// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticketing adapter trait for the external CRM collaborator.

use async_trait::async_trait;

use crate::error::TriagoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{TicketId, TicketRequest, TicketStatus};

/// Adapter for the external CRM ticketing system.
///
/// Ticket creation is attempted synchronously on escalation but must never
/// fail the query: a [`TriagoError::TicketingUnavailable`](crate::TriagoError::TicketingUnavailable)
/// degrades the escalation to a local-only decision.
#[async_trait]
pub trait TicketingAdapter: PluginAdapter {
    /// Creates an escalation ticket and returns its CRM-assigned id.
    async fn create_ticket(&self, request: TicketRequest) -> Result<TicketId, TriagoError>;

    /// Updates ticket status; driven by the external agent workflow, the
    /// engine only relays the transition.
    async fn update_status(
        &self,
        ticket_id: &TicketId,
        status: TicketStatus,
    ) -> Result<(), TriagoError>;
}
