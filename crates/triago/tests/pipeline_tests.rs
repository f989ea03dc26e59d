// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end pipeline tests over mock adapters.

use tokio_util::sync::CancellationToken;
use triago_core::types::{EscalationReason, EscalationStatus, TicketPriority};
use triago_core::TriagoError;
use triago_test_utils::TestHarness;

#[tokio::test]
async fn simple_query_routes_to_simple_profile() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["We are open 9am to 5pm, Monday to Friday.".to_string()])
        .build()
        .await
        .unwrap();

    let envelope = harness
        .engine
        .process_query("What are your business hours?", "s-1", "c-1")
        .await
        .unwrap();

    assert!(
        envelope.complexity_score >= 0.1 && envelope.complexity_score <= 0.3,
        "complexity {}",
        envelope.complexity_score
    );
    // Below the simple threshold, so the cost-effective profile serves it.
    assert_eq!(envelope.model_used, "llama-3.3-70b-versatile");
    assert!(!envelope.cached);
    assert!(!envelope.escalated);
    assert!(envelope.ticket_id.is_none());
    assert!(harness.ticketing.created_tickets().is_empty());
}

#[tokio::test]
async fn frustrated_query_escalates_with_high_priority_ticket() {
    let harness = TestHarness::builder().build().await.unwrap();

    let envelope = harness
        .engine
        .process_query(
            "I cannot access my account and I am very frustrated",
            "s-2",
            "c-2",
        )
        .await
        .unwrap();

    assert!(envelope.sentiment_score < -0.5, "sentiment {}", envelope.sentiment_score);
    assert!(envelope.escalated);
    assert_eq!(
        envelope.escalation_reason,
        Some(EscalationReason::NegativeSentiment)
    );
    assert!(envelope.ticket_id.is_some());

    let tickets = harness.ticketing.created_tickets();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].priority, TicketPriority::High);
    assert_eq!(tickets[0].reason, EscalationReason::NegativeSentiment);
    assert!(tickets[0].context.contains("negative_sentiment"));
}

#[tokio::test]
async fn near_duplicate_query_is_served_from_cache() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["You can update billing in settings.".to_string()])
        .build()
        .await
        .unwrap();

    // Embeddings with cosine similarity ~0.92, above the 0.85 threshold.
    harness
        .embedder
        .set_vector("how do I update my billing", vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    harness.embedder.set_vector(
        "how can I change my billing",
        vec![0.92, 0.392, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    );

    let first = harness
        .engine
        .process_query("how do I update my billing", "s-3", "c-3")
        .await
        .unwrap();
    assert!(!first.cached);
    assert_eq!(harness.provider.call_count(), 1);

    let second = harness
        .engine
        .process_query("how can I change my billing", "s-3", "c-3")
        .await
        .unwrap();
    assert!(second.cached);
    assert_eq!(second.response_text, first.response_text);
    assert_eq!(second.model_used, first.model_used);
    // No additional model call was made.
    assert_eq!(harness.provider.call_count(), 1);
}

#[tokio::test]
async fn identical_requery_hits_cache_with_identical_response() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["Here is your answer.".to_string()])
        .build()
        .await
        .unwrap();

    let first = harness
        .engine
        .process_query("where is my invoice", "s-4", "c-4")
        .await
        .unwrap();
    let second = harness
        .engine
        .process_query("where is my invoice", "s-4", "c-4")
        .await
        .unwrap();

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(second.response_text, first.response_text);
    assert_eq!(harness.provider.call_count(), 1);
}

#[tokio::test]
async fn provider_outage_surfaces_model_unavailable() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.provider.set_unavailable(true);

    let err = harness
        .engine
        .process_query("please summarize my open orders", "s-5", "c-5")
        .await
        .unwrap_err();

    match err {
        TriagoError::ModelUnavailable { session_id, attempts } => {
            assert_eq!(session_id, "s-5");
            assert_eq!(attempts, 4);
        }
        other => panic!("expected ModelUnavailable, got {other:?}"),
    }
    // Routed profile tried twice, fallback twice.
    assert_eq!(harness.provider.call_count(), 4);
}

#[tokio::test]
async fn repeated_failures_escalate_the_session() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.provider.set_unavailable(true);

    // max_consecutive_failures is 2; the third failing query trips it.
    for _ in 0..3 {
        let err = harness
            .engine
            .process_query("any update on my order", "s-6", "c-6")
            .await
            .unwrap_err();
        assert!(matches!(err, TriagoError::ModelUnavailable { .. }));
    }

    let snapshot = harness.engine.session_snapshot("s-6").await.unwrap();
    assert_eq!(snapshot.escalation_status, EscalationStatus::Escalated);
    assert_eq!(snapshot.consecutive_failures, 3);

    let tickets = harness.ticketing.created_tickets();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].reason, EscalationReason::RepeatedFailures);
    assert_eq!(tickets[0].priority, TicketPriority::Medium);
}

#[tokio::test]
async fn reentrant_trigger_does_not_create_duplicate_ticket() {
    let harness = TestHarness::builder().build().await.unwrap();

    let first = harness
        .engine
        .process_query("this is terrible, nothing works at all", "s-7", "c-7")
        .await
        .unwrap();
    assert!(first.escalated);

    let second = harness
        .engine
        .process_query("still terrible, I am very frustrated", "s-7", "c-7")
        .await
        .unwrap();
    assert!(second.escalated);
    assert_eq!(second.ticket_id, first.ticket_id);
    assert_eq!(harness.ticketing.created_tickets().len(), 1);

    // Cumulative sentiment kept updating across both exchanges.
    let snapshot = harness.engine.session_snapshot("s-7").await.unwrap();
    assert_eq!(snapshot.message_count, 2);
    assert!(snapshot.cumulative_sentiment < 0.0);
}

#[tokio::test]
async fn ticketing_outage_degrades_to_local_escalation() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.ticketing.set_unavailable(true);

    let envelope = harness
        .engine
        .process_query("I am very frustrated with this unacceptable service", "s-8", "c-8")
        .await
        .unwrap();

    assert!(envelope.escalated);
    assert_eq!(
        envelope.escalation_reason,
        Some(EscalationReason::NegativeSentiment)
    );
    let ticket_id = envelope.ticket_id.unwrap();
    assert!(ticket_id.0.starts_with("local-"));

    let snapshot = harness.engine.session_snapshot("s-8").await.unwrap();
    assert_eq!(snapshot.ticket_pending_retry, Some(true));
    assert!(harness.ticketing.created_tickets().is_empty());
}

#[tokio::test]
async fn resolved_session_stays_resolved() {
    let harness = TestHarness::builder().build().await.unwrap();

    let envelope = harness
        .engine
        .process_query("I want to speak to a human agent", "s-9", "c-9")
        .await
        .unwrap();
    assert!(envelope.escalated);
    assert_eq!(
        envelope.escalation_reason,
        Some(EscalationReason::ManualRequest)
    );

    let resolved = harness.engine.resolve_session("s-9").await.unwrap();
    assert_eq!(resolved, envelope.ticket_id);
    let snapshot = harness.engine.session_snapshot("s-9").await.unwrap();
    assert_eq!(snapshot.escalation_status, EscalationStatus::Resolved);

    // A later trigger never regresses the session to pending.
    let later = harness
        .engine
        .process_query("I want to speak to a human agent again", "s-9", "c-9")
        .await
        .unwrap();
    assert!(!later.escalated);
    let snapshot = harness.engine.session_snapshot("s-9").await.unwrap();
    assert_eq!(snapshot.escalation_status, EscalationStatus::Resolved);
    assert_eq!(harness.ticketing.created_tickets().len(), 1);
}

#[tokio::test]
async fn validation_rejects_empty_and_oversized_queries() {
    let harness = TestHarness::builder().build().await.unwrap();

    let err = harness
        .engine
        .process_query("   ", "s-10", "c-10")
        .await
        .unwrap_err();
    assert!(matches!(err, TriagoError::Validation(_)));

    let oversized = "x".repeat(5001);
    let err = harness
        .engine
        .process_query(&oversized, "s-10", "c-10")
        .await
        .unwrap_err();
    assert!(matches!(err, TriagoError::Validation(_)));

    // Neither attempt reached the pipeline.
    assert_eq!(harness.provider.call_count(), 0);
    assert!(harness.engine.session_snapshot("s-10").await.is_none());
}

#[tokio::test]
async fn embedder_outage_aborts_the_query() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.embedder.set_unavailable(true);

    let err = harness
        .engine
        .process_query("where is my parcel", "s-11", "c-11")
        .await
        .unwrap_err();
    assert!(matches!(err, TriagoError::EmbeddingUnavailable { .. }));
    assert_eq!(harness.provider.call_count(), 0);
}

#[tokio::test]
async fn cancelled_query_leaves_no_session_mutation() {
    let harness = TestHarness::builder().build().await.unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let err = harness
        .engine
        .process_query_cancellable("what is your refund policy", "s-12", "c-12", &token)
        .await
        .unwrap_err();
    assert!(matches!(err, TriagoError::Internal(_)));

    if let Some(snapshot) = harness.engine.session_snapshot("s-12").await {
        assert_eq!(snapshot.message_count, 0);
        assert_eq!(snapshot.escalation_status, EscalationStatus::None);
    }
}

#[tokio::test]
async fn close_session_archives_state() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .engine
        .process_query("do you ship internationally", "s-13", "c-13")
        .await
        .unwrap();

    let closed = harness.engine.close_session("s-13").await.unwrap();
    assert_eq!(closed.message_count, 1);
    assert!(harness.engine.session_snapshot("s-13").await.is_none());
    assert_eq!(harness.engine.active_sessions(), 0);
}

#[tokio::test]
async fn cache_stats_reflect_inserts() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .embedder
        .set_vector("question one about shipping", vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    harness
        .embedder
        .set_vector("a different question about returns", vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    harness
        .engine
        .process_query("question one about shipping", "s-14", "c-14")
        .await
        .unwrap();
    harness
        .engine
        .process_query("a different question about returns", "s-14", "c-14")
        .await
        .unwrap();

    let stats = harness.engine.cache_stats();
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.active_entries, 2);
    assert_eq!(stats.capacity, 1000);
}

#[tokio::test]
async fn health_reports_adapter_outage() {
    let harness = TestHarness::builder().build().await.unwrap();
    assert!(harness.engine.health().await.all_healthy());

    harness.embedder.set_unavailable(true);
    let health = harness.engine.health().await;
    assert!(!health.all_healthy());
    assert_eq!(health.provider, triago_core::HealthStatus::Healthy);
}
