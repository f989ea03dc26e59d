// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Triago support engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Triago configuration.
///
/// Loaded from TOML files, with `TRIAGO_` environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TriagoConfig {
    /// Semantic cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Model routing settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Complexity and sentiment scoring settings.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Escalation engine settings.
    #[serde(default)]
    pub escalation: EscalationConfig,

    /// Pipeline coordinator settings (timeouts, query bounds).
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Semantic cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Minimum cosine similarity for a cache hit (0.0-1.0).
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Entry time-to-live in seconds. Expired entries are invisible to lookup.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Maximum number of cache entries before LRU eviction.
    #[serde(default = "default_max_cache_size")]
    pub max_cache_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            ttl_seconds: default_ttl_seconds(),
            max_cache_size: default_max_cache_size(),
        }
    }
}

fn default_similarity_threshold() -> f64 {
    0.85
}

fn default_ttl_seconds() -> u64 {
    3600
}

fn default_max_cache_size() -> usize {
    1000
}

/// A single model profile: a named backend configuration selected by the router.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// Model name passed to the provider.
    pub name: String,

    /// Opaque endpoint reference resolved by the provider adapter.
    #[serde(default)]
    pub endpoint_ref: String,

    /// Cost per 1k tokens in USD, for cost attribution.
    #[serde(default)]
    pub cost_per_token: f64,

    /// Max tokens to generate for responses on this profile.
    #[serde(default = "default_profile_max_tokens")]
    pub max_tokens: u32,
}

fn default_profile_max_tokens() -> u32 {
    1000
}

/// Model routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Complexity below this routes to the simple profile.
    #[serde(default = "default_simple_threshold")]
    pub simple_threshold: f64,

    /// Complexity above this routes to the complex profile.
    #[serde(default = "default_complex_threshold")]
    pub complex_threshold: f64,

    /// When true, the ambiguous middle band routes to the simple profile
    /// instead of the default capability-over-cost bias toward complex.
    #[serde(default)]
    pub prefer_simple_in_middle_band: bool,

    /// Profile for low-complexity queries.
    #[serde(default = "default_simple_profile")]
    pub simple: ProfileConfig,

    /// Profile for high-complexity queries (and the middle band by default).
    #[serde(default = "default_complex_profile")]
    pub complex: ProfileConfig,

    /// Profile tried after the routed profile fails its retry.
    #[serde(default = "default_fallback_profile")]
    pub fallback: ProfileConfig,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            simple_threshold: default_simple_threshold(),
            complex_threshold: default_complex_threshold(),
            prefer_simple_in_middle_band: false,
            simple: default_simple_profile(),
            complex: default_complex_profile(),
            fallback: default_fallback_profile(),
        }
    }
}

fn default_simple_threshold() -> f64 {
    0.3
}

fn default_complex_threshold() -> f64 {
    0.7
}

fn default_simple_profile() -> ProfileConfig {
    ProfileConfig {
        name: "llama-3.3-70b-versatile".to_string(),
        endpoint_ref: "primary".to_string(),
        cost_per_token: 0.00059,
        max_tokens: 1000,
    }
}

fn default_complex_profile() -> ProfileConfig {
    ProfileConfig {
        name: "openai/gpt-oss-120b".to_string(),
        endpoint_ref: "primary".to_string(),
        cost_per_token: 0.0015,
        max_tokens: 1000,
    }
}

fn default_fallback_profile() -> ProfileConfig {
    ProfileConfig {
        name: "llama-3.1-8b-instant".to_string(),
        endpoint_ref: "fallback".to_string(),
        cost_per_token: 0.00005,
        max_tokens: 1000,
    }
}

/// Scoring configuration for the complexity and sentiment scorers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Weight of the embedding anchor signal in the blended complexity
    /// score (0.0-1.0). The heuristic signal carries the remainder.
    /// Ignored when no anchors are configured.
    #[serde(default = "default_embedding_weight")]
    pub embedding_weight: f64,

    /// Anchor phrases embedded at startup as "simple" reference centroids.
    #[serde(default = "default_simple_anchors")]
    pub simple_anchors: Vec<String>,

    /// Anchor phrases embedded at startup as "complex" reference centroids.
    #[serde(default = "default_complex_anchors")]
    pub complex_anchors: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            embedding_weight: default_embedding_weight(),
            simple_anchors: default_simple_anchors(),
            complex_anchors: default_complex_anchors(),
        }
    }
}

fn default_embedding_weight() -> f64 {
    0.3
}

fn default_simple_anchors() -> Vec<String> {
    vec![
        "What are your business hours?".to_string(),
        "How do I reset my password?".to_string(),
        "Where can I find pricing information?".to_string(),
    ]
}

fn default_complex_anchors() -> Vec<String> {
    vec![
        "How do I integrate your API with our OAuth authentication flow?".to_string(),
        "Our webhook deliveries intermittently time out behind the load balancer, \
         how do we debug the retry pipeline?"
            .to_string(),
    ]
}

/// Escalation engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EscalationConfig {
    /// Sentiment below this triggers escalation (-1.0-0.0).
    #[serde(default = "default_sentiment_escalation_threshold")]
    pub sentiment_escalation_threshold: f64,

    /// Complexity above this triggers escalation (0.0-1.0).
    #[serde(default = "default_escalation_complexity_threshold")]
    pub escalation_complexity_threshold: f64,

    /// Consecutive model failures in a session beyond which escalation fires.
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            sentiment_escalation_threshold: default_sentiment_escalation_threshold(),
            escalation_complexity_threshold: default_escalation_complexity_threshold(),
            max_consecutive_failures: default_max_consecutive_failures(),
        }
    }
}

fn default_sentiment_escalation_threshold() -> f64 {
    -0.5
}

fn default_escalation_complexity_threshold() -> f64 {
    0.8
}

fn default_max_consecutive_failures() -> u32 {
    2
}

/// Pipeline coordinator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Timeout for a single embedding call, in milliseconds.
    #[serde(default = "default_embed_timeout_ms")]
    pub embed_timeout_ms: u64,

    /// Timeout for a single model-call attempt, in milliseconds.
    #[serde(default = "default_model_timeout_ms")]
    pub model_timeout_ms: u64,

    /// Timeout for a ticket creation call, in milliseconds.
    #[serde(default = "default_ticketing_timeout_ms")]
    pub ticketing_timeout_ms: u64,

    /// Maximum accepted query length in characters.
    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            embed_timeout_ms: default_embed_timeout_ms(),
            model_timeout_ms: default_model_timeout_ms(),
            ticketing_timeout_ms: default_ticketing_timeout_ms(),
            max_query_chars: default_max_query_chars(),
        }
    }
}

fn default_embed_timeout_ms() -> u64 {
    5_000
}

fn default_model_timeout_ms() -> u64 {
    30_000
}

fn default_ticketing_timeout_ms() -> u64 {
    5_000
}

fn default_max_query_chars() -> usize {
    5_000
}
