// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./opsdesk.toml` > `~/.config/opsdesk/opsdesk.toml`
//! > `/etc/opsdesk/opsdesk.toml`, with environment variable overrides via
//! the `OPSDESK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::OpsdeskConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/opsdesk/opsdesk.toml` (system-wide)
/// 3. `~/.config/opsdesk/opsdesk.toml` (user XDG config)
/// 4. `./opsdesk.toml` (local directory)
/// 5. `OPSDESK_*` environment variables
pub fn load_config() -> Result<OpsdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OpsdeskConfig::default()))
        .merge(Toml::file("/etc/opsdesk/opsdesk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("opsdesk/opsdesk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("opsdesk.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<OpsdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OpsdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<OpsdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OpsdeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `OPSDESK_SERVER_LOG_LEVEL` must map to
/// `server.log_level`, not `server.log.level`.
fn env_provider() -> Env {
    Env::prefixed("OPSDESK_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("server_", "server.", 1)
            .replacen("listener_", "listener.", 1)
            .replacen("seed_", "seed.", 1);
        mapped.into()
    })
}
