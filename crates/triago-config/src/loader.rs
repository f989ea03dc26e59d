// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports `./triago.toml` with environment variable overrides via the
//! `TRIAGO_` prefix, merged over compiled defaults.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TriagoConfig;

/// Load configuration from the local directory with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `./triago.toml` (local directory)
/// 3. `TRIAGO_*` environment variables
pub fn load_config() -> Result<TriagoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TriagoConfig::default()))
        .merge(Toml::file("triago.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<TriagoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TriagoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TriagoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TriagoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// `TRIAGO_` env vars, with `__` as section separator
/// (e.g. `TRIAGO_CACHE__TTL_SECONDS=600`).
fn env_provider() -> Env {
    Env::prefixed("TRIAGO_").split("__")
}
