// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escalation engine for the Triago support pipeline.
//!
//! Decides when a session needs a human agent, maps the decision to a
//! ticket priority, and creates the ticket against the external CRM. A
//! ticketing outage never fails the query: the escalation degrades to a
//! local decision flagged for retry.

pub mod engine;
pub mod ticket;

pub use engine::{detect_manual_request, EscalationDecision, EscalationEngine, EscalationSignals};
pub use ticket::{summarize_for_agent, EscalationTicket, SummaryInput};
