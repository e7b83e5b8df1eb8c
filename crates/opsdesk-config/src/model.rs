// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Opsdesk helpdesk.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Opsdesk configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpsdeskConfig {
    /// HTTP/WebSocket server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Real-time client listener settings.
    #[serde(default)]
    pub listener: ListenerConfig,

    /// Demo data seeding.
    #[serde(default)]
    pub seed: SeedConfig,
}

/// HTTP/WebSocket server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Real-time client listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ListenerConfig {
    /// WebSocket URL of the server's `/ws` endpoint.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// Base URL for REST fetches made by the notification surface.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Fixed delay between reconnect attempts, in milliseconds.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// Reconnect attempts before giving up silently.
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,

    /// Per-attempt connection timeout, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            api_base_url: default_api_base_url(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_ws_url() -> String {
    "ws://127.0.0.1:5000/ws".to_string()
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    3000
}

fn default_max_reconnect_attempts() -> u32 {
    5
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Demo data seeding configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    /// Populate the store with demo users, tickets, and articles on start.
    #[serde(default)]
    pub demo_data: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let config = OpsdeskConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.listener.reconnect_delay_ms, 3000);
        assert_eq!(config.listener.max_reconnect_attempts, 5);
        assert!(!config.seed.demo_data);
    }
}
