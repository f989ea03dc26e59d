// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge for configuration diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The configuration file failed to parse or deserialize.
    #[error("configuration parse error: {message}")]
    #[diagnostic(
        code(triago::config::parse),
        help("check `triago.toml` against the documented schema; unknown keys are rejected")
    )]
    Parse {
        /// Figment's rendered error message, including the offending key path.
        message: String,
    },

    /// A configuration value violated a semantic constraint.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(triago::config::validation))]
    Validation {
        /// Description naming the field and the accepted range.
        message: String,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Parse {
            message: err.to_string(),
        }
    }
}

/// Render a list of configuration errors for terminal display.
pub fn render_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("{e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
