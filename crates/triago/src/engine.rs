// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The pipeline coordinator: the single entry point the front door calls.
//!
//! `process_query` runs the fixed pipeline: validate, embed, complexity,
//! cache lookup, (on miss) route and dispatch, sentiment, escalation,
//! cache insert, session update. The engine is the sole mutator of
//! session state, under the per-session lock.

use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use triago_cache::{CacheStats, SemanticCache};
use triago_config::model::TriagoConfig;
use triago_core::traits::{EmbeddingAdapter, ProviderAdapter, TicketingAdapter};
use triago_core::types::{
    EscalationReason, EscalationStatus, HealthStatus, MessageId, Query, SessionId, TicketId,
    TicketStatus,
};
use triago_core::TriagoError;
use triago_escalation::{
    detect_manual_request, summarize_for_agent, EscalationEngine, EscalationSignals, SummaryInput,
};
use triago_router::ModelRouter;
use triago_scoring::{sentiment_label, ComplexityScorer, SentimentScorer};

use crate::envelope::ResponseEnvelope;
use crate::session::{SessionSnapshot, SessionState, SessionStore};

/// Aggregated adapter health for the ops surface.
#[derive(Debug, Clone)]
pub struct EngineHealth {
    pub embedder: HealthStatus,
    pub provider: HealthStatus,
    pub ticketing: HealthStatus,
}

impl EngineHealth {
    pub fn all_healthy(&self) -> bool {
        [&self.embedder, &self.provider, &self.ticketing]
            .iter()
            .all(|status| **status == HealthStatus::Healthy)
    }
}

/// Builder wiring configuration and adapters into a [`TriagoEngine`].
///
/// Anchor phrases from the scoring config are embedded at build time; if
/// the embedder cannot serve them the engine starts with the heuristic
/// complexity signal only.
pub struct TriagoEngineBuilder {
    config: TriagoConfig,
    embedder: Option<Arc<dyn EmbeddingAdapter>>,
    provider: Option<Arc<dyn ProviderAdapter>>,
    ticketing: Option<Arc<dyn TicketingAdapter>>,
}

impl TriagoEngineBuilder {
    pub fn new(config: TriagoConfig) -> Self {
        Self {
            config,
            embedder: None,
            provider: None,
            ticketing: None,
        }
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn ProviderAdapter>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_ticketing(mut self, ticketing: Arc<dyn TicketingAdapter>) -> Self {
        self.ticketing = Some(ticketing);
        self
    }

    pub async fn build(self) -> Result<TriagoEngine, TriagoError> {
        let embedder = self
            .embedder
            .ok_or_else(|| TriagoError::Config("no embedding adapter configured".into()))?;
        let provider = self
            .provider
            .ok_or_else(|| TriagoError::Config("no provider adapter configured".into()))?;
        let ticketing = self
            .ticketing
            .ok_or_else(|| TriagoError::Config("no ticketing adapter configured".into()))?;

        let mut complexity =
            ComplexityScorer::with_embedding_weight(self.config.scoring.embedding_weight);
        let embed_timeout = Duration::from_millis(self.config.pipeline.embed_timeout_ms);
        match embed_anchors(embedder.as_ref(), &self.config, embed_timeout).await {
            Ok((simple, complex)) => complexity.set_anchors(&simple, &complex),
            Err(err) => {
                warn!(error = %err, "anchor embedding failed, using heuristic complexity only");
            }
        }

        Ok(TriagoEngine {
            cache: SemanticCache::new(self.config.cache.clone()),
            router: ModelRouter::new(self.config.routing.clone()),
            escalation: EscalationEngine::new(self.config.escalation.clone()),
            complexity,
            sentiment: SentimentScorer::new(),
            sessions: SessionStore::new(),
            embedder,
            provider,
            ticketing,
            config: self.config,
        })
    }
}

async fn embed_anchors(
    embedder: &dyn EmbeddingAdapter,
    config: &TriagoConfig,
    embed_timeout: Duration,
) -> Result<(Vec<Vec<f32>>, Vec<Vec<f32>>), TriagoError> {
    let embed_all = |phrases: &[String]| {
        let phrases = phrases.to_vec();
        async move {
            let mut vectors = Vec::with_capacity(phrases.len());
            for phrase in &phrases {
                let vector = match timeout(embed_timeout, embedder.embed(phrase)).await {
                    Ok(result) => result?,
                    Err(_) => {
                        return Err(TriagoError::Timeout {
                            duration: embed_timeout,
                        })
                    }
                };
                vectors.push(vector);
            }
            Ok(vectors)
        }
    };
    let simple = embed_all(&config.scoring.simple_anchors).await?;
    let complex = embed_all(&config.scoring.complex_anchors).await?;
    Ok((simple, complex))
}

/// The query routing, semantic caching, and escalation engine.
pub struct TriagoEngine {
    config: TriagoConfig,
    embedder: Arc<dyn EmbeddingAdapter>,
    provider: Arc<dyn ProviderAdapter>,
    ticketing: Arc<dyn TicketingAdapter>,
    cache: SemanticCache,
    router: ModelRouter,
    escalation: EscalationEngine,
    complexity: ComplexityScorer,
    sentiment: SentimentScorer,
    sessions: SessionStore,
}

impl TriagoEngine {
    pub fn builder(config: TriagoConfig) -> TriagoEngineBuilder {
        TriagoEngineBuilder::new(config)
    }

    /// Process one customer query end to end.
    ///
    /// Queries within a session are serialized in arrival order; distinct
    /// sessions run in parallel. Embedding failures abort the query.
    /// Terminal model failures surface as
    /// [`TriagoError::ModelUnavailable`] after the session's failure count
    /// and escalation state have been updated.
    pub async fn process_query(
        &self,
        query_text: &str,
        session_id: &str,
        customer_id: &str,
    ) -> Result<ResponseEnvelope, TriagoError> {
        self.validate(query_text)?;
        let query = Query {
            text: query_text.to_string(),
            session_id: SessionId(session_id.to_string()),
            customer_id: customer_id.to_string(),
            received_at: chrono::Utc::now(),
        };

        let handle = self.sessions.get_or_create(session_id, customer_id);
        // Fair mutex, waiters wake in FIFO order.
        let mut session = handle.lock().await;
        let started = Instant::now();
        let message_id = MessageId(uuid::Uuid::new_v4().to_string());
        debug!(
            session_id = %query.session_id,
            customer_id = %query.customer_id,
            received_at = %query.received_at,
            message_id = %message_id.0,
            "query entered pipeline"
        );

        let embed_timeout = Duration::from_millis(self.config.pipeline.embed_timeout_ms);
        let embedding = match timeout(embed_timeout, self.embedder.embed(&query.text)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(TriagoError::EmbeddingUnavailable {
                    message: format!("embedding call exceeded {}ms", embed_timeout.as_millis()),
                })
            }
        };

        let complexity_score = self.complexity.score(&query.text, &embedding);

        if let Some(hit) = self.cache.lookup(&embedding) {
            debug!(
                session_id,
                similarity = hit.similarity,
                "serving response from semantic cache"
            );
            let sentiment_score = self.sentiment.score(&query.text);
            let (escalated, reason, ticket_id) = self
                .apply_escalation(&mut session, &query.text, sentiment_score, complexity_score)
                .await;
            session.record_sentiment(sentiment_score);

            let envelope = ResponseEnvelope {
                response_text: hit.response_text,
                model_used: hit.model_used,
                sentiment_score,
                complexity_score,
                response_time_ms: started.elapsed().as_millis() as u64,
                cached: true,
                escalated,
                escalation_reason: reason,
                ticket_id,
                message_id,
                session_id: query.session_id,
            };
            self.finish(&envelope);
            return Ok(envelope);
        }

        let decision = self.router.route(complexity_score);
        debug!(
            session_id,
            complexity = complexity_score,
            model = %decision.model,
            reason = %decision.reason,
            "routing decision"
        );

        let model_timeout = Duration::from_millis(self.config.pipeline.model_timeout_ms);
        let outcome = self
            .router
            .dispatch(
                self.provider.as_ref(),
                decision.kind,
                &query.text,
                session_id,
                model_timeout,
            )
            .await;

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                session.consecutive_failures += 1;
                let sentiment_score = self.sentiment.score(&query.text);
                // Escalation still runs so repeated failures reach a human.
                let _ = self
                    .apply_escalation(&mut session, &query.text, sentiment_score, complexity_score)
                    .await;
                warn!(
                    session_id,
                    kind = err.kind(),
                    consecutive_failures = session.consecutive_failures,
                    timestamp = %chrono::Utc::now(),
                    error = %err,
                    "query failed terminally"
                );
                return Err(err);
            }
        };

        session.consecutive_failures = 0;
        let sentiment_score = self.sentiment.score(&query.text);
        debug!(
            session_id,
            sentiment = sentiment_score,
            label = ?sentiment_label(sentiment_score),
            "exchange sentiment scored"
        );
        let (escalated, reason, ticket_id) = self
            .apply_escalation(&mut session, &query.text, sentiment_score, complexity_score)
            .await;

        self.cache.insert(
            embedding,
            query.text.as_str(),
            &outcome.response.text,
            &outcome.response.model,
        );
        session.record_sentiment(sentiment_score);

        let envelope = ResponseEnvelope {
            response_text: outcome.response.text,
            model_used: outcome.response.model,
            sentiment_score,
            complexity_score,
            response_time_ms: started.elapsed().as_millis() as u64,
            cached: false,
            escalated,
            escalation_reason: reason,
            ticket_id,
            message_id,
            session_id: query.session_id,
        };
        self.finish(&envelope);
        Ok(envelope)
    }

    /// [`process_query`](Self::process_query) with caller cancellation.
    ///
    /// Cancellation aborts in-flight external calls best-effort. Committed
    /// cache inserts and session mutations are not rolled back.
    pub async fn process_query_cancellable(
        &self,
        query_text: &str,
        session_id: &str,
        customer_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ResponseEnvelope, TriagoError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                Err(TriagoError::Internal("query cancelled by caller".into()))
            }
            result = self.process_query(query_text, session_id, customer_id) => result,
        }
    }

    fn validate(&self, query_text: &str) -> Result<(), TriagoError> {
        if query_text.trim().is_empty() {
            return Err(TriagoError::Validation("query text is empty".into()));
        }
        let max = self.config.pipeline.max_query_chars;
        let len = query_text.chars().count();
        if len > max {
            return Err(TriagoError::Validation(format!(
                "query text is {len} characters, limit is {max}"
            )));
        }
        Ok(())
    }

    /// Evaluate escalation for the current exchange and create a ticket on
    /// a fresh trigger. Re-entrant triggers on an already-escalated session
    /// reuse the existing ticket. Resolved sessions stay resolved.
    async fn apply_escalation(
        &self,
        session: &mut SessionState,
        query_text: &str,
        sentiment_score: f64,
        complexity_score: f64,
    ) -> (bool, Option<EscalationReason>, Option<TicketId>) {
        let signals = EscalationSignals {
            sentiment_score,
            complexity_score,
            consecutive_failures: session.consecutive_failures,
            manual_request: detect_manual_request(query_text),
            requested_priority: None,
        };

        if let Some(decision) = self.escalation.evaluate(&signals) {
            let fresh = matches!(
                session.escalation_status,
                EscalationStatus::None | EscalationStatus::Pending
            );
            if fresh {
                session.advance_escalation(EscalationStatus::Pending);
                let context = summarize_for_agent(&SummaryInput {
                    reason: decision.reason,
                    priority: decision.priority,
                    message_count: session.message_count + 1,
                    latest_query: query_text,
                    sentiment_score,
                    complexity_score,
                });
                let ticketing_timeout =
                    Duration::from_millis(self.config.pipeline.ticketing_timeout_ms);
                let ticket = self
                    .escalation
                    .open_ticket(
                        self.ticketing.as_ref(),
                        &session.session_id,
                        &session.customer_id,
                        decision,
                        context,
                        ticketing_timeout,
                    )
                    .await;
                let ticket_id = ticket.ticket_id.clone();
                session.ticket = Some(ticket);
                session.advance_escalation(EscalationStatus::Escalated);
                info!(
                    session_id = %session.session_id,
                    reason = %decision.reason,
                    ticket_id = %ticket_id,
                    "session escalated"
                );
                return (true, Some(decision.reason), Some(ticket_id));
            }
        }

        let escalated = session.escalation_status == EscalationStatus::Escalated;
        if escalated {
            let ticket = session.ticket.as_ref();
            (
                true,
                ticket.map(|t| t.reason),
                ticket.map(|t| t.ticket_id.clone()),
            )
        } else {
            (false, None, None)
        }
    }

    fn finish(&self, envelope: &ResponseEnvelope) {
        counter!(
            "triago_queries_total",
            "cached" => if envelope.cached { "true" } else { "false" },
            "escalated" => if envelope.escalated { "true" } else { "false" },
        )
        .increment(1);
        histogram!("triago_query_latency_ms").record(envelope.response_time_ms as f64);
    }

    /// Snapshot a session's state without mutating it.
    pub async fn session_snapshot(&self, session_id: &str) -> Option<SessionSnapshot> {
        let handle = self.sessions.get(session_id)?;
        let session = handle.lock().await;
        Some(session.snapshot())
    }

    /// Close a session and return its final state.
    pub async fn close_session(&self, session_id: &str) -> Option<SessionSnapshot> {
        let handle = self.sessions.remove(session_id)?;
        let session = handle.lock().await;
        info!(session_id, "session closed");
        Some(session.snapshot())
    }

    /// Mark a session's escalation resolved and relay the resolution to
    /// the CRM. Returns the ticket id when the session had one.
    pub async fn resolve_session(
        &self,
        session_id: &str,
    ) -> Result<Option<TicketId>, TriagoError> {
        let Some(handle) = self.sessions.get(session_id) else {
            return Ok(None);
        };
        let mut session = handle.lock().await;
        let Some(ticket) = session.ticket.clone() else {
            return Ok(None);
        };
        let ticketing_timeout = Duration::from_millis(self.config.pipeline.ticketing_timeout_ms);
        self.escalation
            .resolve_ticket(self.ticketing.as_ref(), &ticket, ticketing_timeout)
            .await?;
        session.advance_escalation(EscalationStatus::Resolved);
        if let Some(stored) = session.ticket.as_mut() {
            stored.status = TicketStatus::Resolved;
        }
        info!(session_id, ticket_id = %ticket.ticket_id, "escalation resolved");
        Ok(Some(ticket.ticket_id))
    }

    /// Point-in-time cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Reclaim expired cache entries. Lookup correctness never depends on
    /// this being called.
    pub fn sweep_cache(&self) -> usize {
        self.cache.sweep_expired()
    }

    /// Number of active sessions.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Health-check every adapter.
    pub async fn health(&self) -> EngineHealth {
        EngineHealth {
            embedder: health_of(self.embedder.health_check().await),
            provider: health_of(self.provider.health_check().await),
            ticketing: health_of(self.ticketing.health_check().await),
        }
    }

    /// Shut down all adapters.
    pub async fn shutdown(&self) -> Result<(), TriagoError> {
        self.embedder.shutdown().await?;
        self.provider.shutdown().await?;
        self.ticketing.shutdown().await?;
        Ok(())
    }
}

fn health_of(result: Result<HealthStatus, TriagoError>) -> HealthStatus {
    match result {
        Ok(status) => status,
        Err(err) => HealthStatus::Unhealthy(err.to_string()),
    }
}
