// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Opsdesk configuration system.

use opsdesk_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_opsdesk_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"

[listener]
ws_url = "ws://desk.internal:8080/ws"
api_base_url = "http://desk.internal:8080"
reconnect_delay_ms = 1500
max_reconnect_attempts = 3
connect_timeout_secs = 5

[seed]
demo_data = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.listener.ws_url, "ws://desk.internal:8080/ws");
    assert_eq!(config.listener.reconnect_delay_ms, 1500);
    assert_eq!(config.listener.max_reconnect_attempts, 3);
    assert_eq!(config.listener.connect_timeout_secs, 5);
    assert!(config.seed.demo_data);
}

/// Unknown field in [server] produces an error mentioning the bad key.
#[test]
fn unknown_field_in_server_produces_error() {
    let toml = r#"
[server]
hsot = "127.0.0.1"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("hsot"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing sections fall back to defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.server.log_level, "info");
    assert_eq!(config.listener.ws_url, "ws://127.0.0.1:5000/ws");
    assert_eq!(config.listener.reconnect_delay_ms, 3000);
    assert_eq!(config.listener.max_reconnect_attempts, 5);
    assert!(!config.seed.demo_data);
}

/// load_and_validate_str surfaces semantic validation failures.
#[test]
fn semantic_validation_runs_after_deserialization() {
    let toml = r#"
[server]
port = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("port 0 should be rejected");
    assert!(
        errors.iter().any(|e| e.to_string().contains("server.port")),
        "expected a server.port validation error, got: {errors:?}"
    );
}

/// Validation collects every failure rather than stopping at the first.
#[test]
fn validation_collects_all_failures() {
    let toml = r#"
[server]
host = ""
log_level = "loud"

[listener]
ws_url = "http://not-a-ws-url"
"#;

    let errors = load_and_validate_str(toml).expect_err("should collect errors");
    assert!(errors.len() >= 3, "expected at least 3 errors, got {errors:?}");
}

/// Environment variables override TOML values via the OPSDESK_ prefix.
#[test]
fn env_var_overrides_server_port() {
    use figment::{
        Figment, Jail,
        providers::{Env, Format, Serialized, Toml},
    };
    use opsdesk_config::OpsdeskConfig;

    Jail::expect_with(|jail| {
        jail.set_env("OPSDESK_SERVER_PORT", "9090");
        let config: OpsdeskConfig = Figment::new()
            .merge(Serialized::defaults(OpsdeskConfig::default()))
            .merge(Toml::string("[server]\nport = 5000\n"))
            .merge(Env::prefixed("OPSDESK_").map(|key| {
                key.as_str().replacen("server_", "server.", 1).into()
            }))
            .extract()?;
        assert_eq!(config.server.port, 9090);
        Ok(())
    });
}
