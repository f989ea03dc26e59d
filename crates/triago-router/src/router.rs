// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Complexity banding and the retry/fallback dispatch chain.
//!
//! Routing is pure and deterministic: for a fixed configuration the same
//! score always selects the same profile. Dispatch is where failures are
//! absorbed: one retry on the routed profile, then the fallback profile
//! (with its own retry), then a terminal `ModelUnavailable`.

use std::time::Duration;

use metrics::{counter, histogram};
use strum::{Display, EnumString};
use tokio::time::timeout;
use tracing::{info, warn};
use triago_config::model::{ProfileConfig, RoutingConfig};
use triago_core::traits::ProviderAdapter;
use triago_core::types::{ChatMessage, CompletionRequest, CompletionResponse};
use triago_core::TriagoError;

/// System prompt prepended to every completion request.
const SYSTEM_PROMPT: &str = "You are a helpful customer support agent. Provide clear, \
                             accurate, and helpful responses to customer queries.";

/// Attempts made per profile before moving on (initial call + one retry).
const ATTEMPTS_PER_PROFILE: u32 = 2;

/// The closed set of model profiles the router selects between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ProfileKind {
    /// Cost-effective profile for low-complexity queries.
    Simple,
    /// Capable profile for high-complexity queries and the ambiguous
    /// middle band (capability over cost when uncertain).
    Complex,
    /// Last-resort profile tried after the routed profile fails.
    Fallback,
}

/// Routing decision with the selected profile and a human-readable reason.
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    /// Selected profile kind.
    pub kind: ProfileKind,
    /// Model name of the selected profile.
    pub model: String,
    /// Human-readable reason for the routing decision.
    pub reason: String,
}

/// Result of a dispatched completion, including the fallback bookkeeping.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    /// The provider response.
    pub response: CompletionResponse,
    /// Profile that ultimately served the request.
    pub served_by: ProfileKind,
    /// Total attempts made, including the successful one.
    pub attempts: u32,
    /// True when the fallback profile served the request.
    pub fell_back: bool,
}

/// Maps complexity scores to model profiles and drives the failure chain.
pub struct ModelRouter {
    config: RoutingConfig,
}

impl ModelRouter {
    /// Create a new model router with the given configuration.
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// Route a complexity score to a profile.
    ///
    /// Deterministic banding: below `simple_threshold` routes simple, above
    /// `complex_threshold` routes complex. Scores exactly at either
    /// boundary belong to the middle band, which routes complex unless
    /// `prefer_simple_in_middle_band` is set.
    pub fn route(&self, complexity_score: f64) -> RoutingDecision {
        let (kind, reason) = if complexity_score < self.config.simple_threshold {
            (
                ProfileKind::Simple,
                format!("simple query (complexity {complexity_score:.3})"),
            )
        } else if complexity_score > self.config.complex_threshold {
            (
                ProfileKind::Complex,
                format!("high complexity ({complexity_score:.3})"),
            )
        } else if self.config.prefer_simple_in_middle_band {
            (
                ProfileKind::Simple,
                format!("middle band ({complexity_score:.3}), configured to prefer simple"),
            )
        } else {
            (
                ProfileKind::Complex,
                format!("middle band ({complexity_score:.3}), capability over cost"),
            )
        };

        RoutingDecision {
            kind,
            model: self.profile(kind).name.clone(),
            reason,
        }
    }

    /// The static profile configuration for a profile kind.
    pub fn profile(&self, kind: ProfileKind) -> &ProfileConfig {
        match kind {
            ProfileKind::Simple => &self.config.simple,
            ProfileKind::Complex => &self.config.complex,
            ProfileKind::Fallback => &self.config.fallback,
        }
    }

    /// Execute a completion against the routed profile with the bounded
    /// failure chain: retry once on the same profile, then the fallback
    /// profile (with its own retry), then terminal
    /// [`TriagoError::ModelUnavailable`].
    ///
    /// Each attempt carries `attempt_timeout` and records latency and
    /// outcome.
    pub async fn dispatch(
        &self,
        provider: &dyn ProviderAdapter,
        routed: ProfileKind,
        query_text: &str,
        session_id: &str,
        attempt_timeout: Duration,
    ) -> Result<CompletionOutcome, TriagoError> {
        let chain: &[ProfileKind] = if routed == ProfileKind::Fallback {
            &[ProfileKind::Fallback]
        } else {
            &[routed, ProfileKind::Fallback]
        };

        let mut attempts = 0u32;
        for kind in chain.iter().copied() {
            let profile = self.profile(kind);
            for _ in 0..ATTEMPTS_PER_PROFILE {
                attempts += 1;
                match self
                    .attempt(provider, profile, query_text, attempt_timeout)
                    .await
                {
                    Ok(response) => {
                        let fell_back = kind == ProfileKind::Fallback && routed != kind;
                        if fell_back {
                            info!(
                                session_id,
                                model = %profile.name,
                                attempts,
                                "completion served by fallback profile"
                            );
                        }
                        return Ok(CompletionOutcome {
                            response,
                            served_by: kind,
                            attempts,
                            fell_back,
                        });
                    }
                    Err(err) if err.is_model_attempt_failure() => {
                        warn!(
                            session_id,
                            model = %profile.name,
                            attempt = attempts,
                            error = %err,
                            "model attempt failed"
                        );
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        counter!("triago_model_unavailable_total").increment(1);
        Err(TriagoError::ModelUnavailable {
            session_id: session_id.to_string(),
            attempts,
        })
    }

    async fn attempt(
        &self,
        provider: &dyn ProviderAdapter,
        profile: &ProfileConfig,
        query_text: &str,
        attempt_timeout: Duration,
    ) -> Result<CompletionResponse, TriagoError> {
        let request = CompletionRequest {
            model: profile.name.clone(),
            endpoint_ref: profile.endpoint_ref.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(query_text),
            ],
            max_tokens: profile.max_tokens,
        };

        let started = std::time::Instant::now();
        let result = match timeout(attempt_timeout, provider.complete(request)).await {
            Ok(inner) => inner,
            Err(_) => Err(TriagoError::Timeout {
                duration: attempt_timeout,
            }),
        };
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        histogram!(
            "triago_model_attempt_latency_ms",
            "model" => profile.name.clone(),
            "outcome" => outcome,
        )
        .record(elapsed_ms);

        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use proptest::prelude::*;
    use triago_core::traits::PluginAdapter;
    use triago_core::types::{AdapterType, HealthStatus};

    use super::*;

    /// Provider that fails a configurable number of leading attempts.
    struct FlakyProvider {
        failures_before_success: u32,
        calls: AtomicU32,
        hang: bool,
    }

    impl FlakyProvider {
        fn failing_first(n: u32) -> Self {
            Self {
                failures_before_success: n,
                calls: AtomicU32::new(0),
                hang: false,
            }
        }

        fn hanging() -> Self {
            Self {
                failures_before_success: 0,
                calls: AtomicU32::new(0),
                hang: true,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PluginAdapter for FlakyProvider {
        fn name(&self) -> &str {
            "flaky-provider"
        }

        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }

        fn adapter_type(&self) -> AdapterType {
            AdapterType::Provider
        }

        async fn health_check(&self) -> Result<HealthStatus, TriagoError> {
            Ok(HealthStatus::Healthy)
        }

        async fn shutdown(&self) -> Result<(), TriagoError> {
            Ok(())
        }
    }

    #[async_trait]
    impl ProviderAdapter for FlakyProvider {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, TriagoError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                std::future::pending::<()>().await;
            }
            if call < self.failures_before_success {
                return Err(TriagoError::Model {
                    status: Some(503),
                    message: "upstream overloaded".into(),
                });
            }
            Ok(CompletionResponse {
                text: format!("answer from {}", request.model),
                model: request.model,
                tokens_used: Some(42),
            })
        }
    }

    fn router() -> ModelRouter {
        ModelRouter::new(RoutingConfig::default())
    }

    #[test]
    fn banding_is_deterministic() {
        let r = router();
        assert_eq!(r.route(0.1).kind, ProfileKind::Simple);
        assert_eq!(r.route(0.29).kind, ProfileKind::Simple);
        assert_eq!(r.route(0.5).kind, ProfileKind::Complex);
        assert_eq!(r.route(0.71).kind, ProfileKind::Complex);
        assert_eq!(r.route(0.95).kind, ProfileKind::Complex);
    }

    #[test]
    fn boundary_scores_belong_to_middle_band() {
        let r = router();
        assert_eq!(r.route(0.3).kind, ProfileKind::Complex);
        assert_eq!(r.route(0.7).kind, ProfileKind::Complex);
    }

    #[test]
    fn middle_band_can_prefer_simple() {
        let mut config = RoutingConfig::default();
        config.prefer_simple_in_middle_band = true;
        let r = ModelRouter::new(config);
        assert_eq!(r.route(0.5).kind, ProfileKind::Simple);
        // Bands outside the middle are unaffected.
        assert_eq!(r.route(0.9).kind, ProfileKind::Complex);
    }

    #[test]
    fn route_reports_profile_model_name() {
        let r = router();
        let decision = r.route(0.1);
        assert_eq!(decision.model, RoutingConfig::default().simple.name);
        assert!(decision.reason.contains("simple"));
    }

    #[tokio::test]
    async fn dispatch_succeeds_first_attempt() {
        let r = router();
        let provider = FlakyProvider::failing_first(0);
        let outcome = r
            .dispatch(&provider, ProfileKind::Simple, "hi", "s-1", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(outcome.attempts, 1);
        assert!(!outcome.fell_back);
        assert_eq!(outcome.served_by, ProfileKind::Simple);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn dispatch_retries_once_on_same_profile() {
        let r = router();
        let provider = FlakyProvider::failing_first(1);
        let outcome = r
            .dispatch(&provider, ProfileKind::Complex, "hi", "s-1", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(outcome.attempts, 2);
        assert!(!outcome.fell_back);
        assert_eq!(outcome.served_by, ProfileKind::Complex);
    }

    #[tokio::test]
    async fn dispatch_falls_back_after_profile_exhausted() {
        let r = router();
        let provider = FlakyProvider::failing_first(2);
        let outcome = r
            .dispatch(&provider, ProfileKind::Simple, "hi", "s-1", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(outcome.attempts, 3);
        assert!(outcome.fell_back);
        assert_eq!(outcome.served_by, ProfileKind::Fallback);
        assert_eq!(
            outcome.response.model,
            RoutingConfig::default().fallback.name
        );
    }

    #[tokio::test]
    async fn dispatch_surfaces_terminal_failure_after_fallback() {
        let r = router();
        let provider = FlakyProvider::failing_first(10);
        let err = r
            .dispatch(&provider, ProfileKind::Simple, "hi", "s-9", Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            TriagoError::ModelUnavailable { session_id, attempts } => {
                assert_eq!(session_id, "s-9");
                assert_eq!(attempts, 4);
            }
            other => panic!("expected ModelUnavailable, got {other:?}"),
        }
        // 2 attempts on the routed profile + 2 on fallback, never more.
        assert_eq!(provider.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_treats_timeout_as_attempt_failure() {
        let r = router();
        let provider = FlakyProvider::hanging();
        let err = r
            .dispatch(&provider, ProfileKind::Simple, "hi", "s-2", Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, TriagoError::ModelUnavailable { attempts: 4, .. }));
        assert_eq!(provider.calls(), 4);
    }

    proptest! {
        #[test]
        fn routing_is_idempotent(score in 0.0f64..=1.0) {
            let r = router();
            prop_assert_eq!(r.route(score).kind, r.route(score).kind);
        }

        #[test]
        fn every_score_routes_to_a_profile(score in 0.0f64..=1.0) {
            let r = router();
            let decision = r.route(score);
            prop_assert!(matches!(
                decision.kind,
                ProfileKind::Simple | ProfileKind::Complex
            ));
        }
    }
}
