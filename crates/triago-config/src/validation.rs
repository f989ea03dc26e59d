// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: thresholds within their closed intervals, band ordering,
//! non-zero capacities and timeouts.

use crate::diagnostic::ConfigError;
use crate::model::TriagoConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TriagoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let mut check = |ok: bool, message: String| {
        if !ok {
            errors.push(ConfigError::Validation { message });
        }
    };

    let cache = &config.cache;
    check(
        (0.0..=1.0).contains(&cache.similarity_threshold),
        format!(
            "cache.similarity_threshold must be within [0.0, 1.0], got {}",
            cache.similarity_threshold
        ),
    );
    check(
        cache.ttl_seconds > 0,
        "cache.ttl_seconds must be greater than zero".to_string(),
    );
    check(
        cache.max_cache_size > 0,
        "cache.max_cache_size must be greater than zero".to_string(),
    );

    let routing = &config.routing;
    check(
        (0.0..=1.0).contains(&routing.simple_threshold),
        format!(
            "routing.simple_threshold must be within [0.0, 1.0], got {}",
            routing.simple_threshold
        ),
    );
    check(
        (0.0..=1.0).contains(&routing.complex_threshold),
        format!(
            "routing.complex_threshold must be within [0.0, 1.0], got {}",
            routing.complex_threshold
        ),
    );
    check(
        routing.simple_threshold < routing.complex_threshold,
        format!(
            "routing.simple_threshold ({}) must be below routing.complex_threshold ({})",
            routing.simple_threshold, routing.complex_threshold
        ),
    );
    for (section, profile) in [
        ("routing.simple", &routing.simple),
        ("routing.complex", &routing.complex),
        ("routing.fallback", &routing.fallback),
    ] {
        check(
            !profile.name.trim().is_empty(),
            format!("{section}.name must not be empty"),
        );
        check(
            profile.cost_per_token >= 0.0,
            format!(
                "{section}.cost_per_token must be non-negative, got {}",
                profile.cost_per_token
            ),
        );
        check(
            profile.max_tokens > 0,
            format!("{section}.max_tokens must be greater than zero"),
        );
    }

    let scoring = &config.scoring;
    check(
        (0.0..=1.0).contains(&scoring.embedding_weight),
        format!(
            "scoring.embedding_weight must be within [0.0, 1.0], got {}",
            scoring.embedding_weight
        ),
    );

    let escalation = &config.escalation;
    check(
        (-1.0..=0.0).contains(&escalation.sentiment_escalation_threshold),
        format!(
            "escalation.sentiment_escalation_threshold must be within [-1.0, 0.0], got {}",
            escalation.sentiment_escalation_threshold
        ),
    );
    check(
        (0.0..=1.0).contains(&escalation.escalation_complexity_threshold),
        format!(
            "escalation.escalation_complexity_threshold must be within [0.0, 1.0], got {}",
            escalation.escalation_complexity_threshold
        ),
    );

    let pipeline = &config.pipeline;
    for (key, value) in [
        ("pipeline.embed_timeout_ms", pipeline.embed_timeout_ms),
        ("pipeline.model_timeout_ms", pipeline.model_timeout_ms),
        ("pipeline.ticketing_timeout_ms", pipeline.ticketing_timeout_ms),
    ] {
        check(value > 0, format!("{key} must be greater than zero"));
    }
    check(
        pipeline.max_query_chars > 0,
        "pipeline.max_query_chars must be greater than zero".to_string(),
    );

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
