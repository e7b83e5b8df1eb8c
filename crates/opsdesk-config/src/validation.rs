// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Collects all failures rather than failing fast.

use crate::diagnostic::ConfigError;
use crate::model::OpsdeskConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with every collected failure.
pub fn validate_config(config: &OpsdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.server.port == 0 {
        errors.push(ConfigError::Validation {
            message: "server.port must not be 0".to_string(),
        });
    }

    let level = config.server.log_level.as_str();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.log_level `{level}` is not one of trace, debug, info, warn, error"
            ),
        });
    }

    if !config.listener.ws_url.starts_with("ws://") && !config.listener.ws_url.starts_with("wss://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "listener.ws_url `{}` must start with ws:// or wss://",
                config.listener.ws_url
            ),
        });
    }

    if config.listener.reconnect_delay_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "listener.reconnect_delay_ms must be positive".to_string(),
        });
    }

    if config.listener.connect_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "listener.connect_timeout_secs must be positive".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OpsdeskConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&OpsdeskConfig::default()).is_ok());
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = OpsdeskConfig::default();
        config.server.host = String::new();
        config.server.port = 0;
        config.listener.ws_url = "http://wrong".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3, "all failures reported, not just the first");
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = OpsdeskConfig::default();
        config.server.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("log_level"));
    }
}
