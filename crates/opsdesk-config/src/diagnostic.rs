// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration error types and terminal rendering.

use thiserror::Error;

/// A configuration error surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML parsing or deserialization failure (unknown key, wrong type).
    #[error("{0}")]
    Parse(String),

    /// A semantic validation failure for a config value.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Render collected configuration errors to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    eprintln!("error: invalid configuration:");
    for err in errors {
        eprintln!("  - {err}");
    }
    eprintln!("hint: see opsdesk.toml or OPSDESK_* environment variables");
}

/// Convert a `figment::Error` into a list of `ConfigError`s.
///
/// A figment error may contain multiple failures (figment collects them
/// during extraction); report all of them rather than only the first.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse(e.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_displays_message() {
        let err = ConfigError::Validation { message: "server.port must not be 0".to_string() };
        assert_eq!(err.to_string(), "validation error: server.port must not be 0");
    }
}
