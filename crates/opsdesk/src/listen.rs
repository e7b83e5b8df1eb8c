// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `opsdesk listen` command implementation.
//!
//! Connects the real-time listener to a running server and logs toasts
//! and cache invalidations as they arrive. Useful for tailing mutations
//! during development without a browser attached.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use opsdesk_client::{
    HttpTicketFetcher, ListenerConfig, Location, NotificationRouter, QueryCache, TracingToastSink,
    UpdateBus, UpdateListener,
};
use opsdesk_config::OpsdeskConfig;
use opsdesk_core::OpsdeskError;

/// Cache stand-in for the terminal: invalidations are only logged.
struct LoggingCache;

impl QueryCache for LoggingCache {
    fn invalidate(&self, key: &str) {
        tracing::debug!(key, "cache invalidated");
    }
}

/// The terminal views no ticket page, so no toast is ever suppressed.
struct TerminalLocation;

impl Location for TerminalLocation {
    fn current_path(&self) -> String {
        "/".to_string()
    }
}

/// Runs the `opsdesk listen` command until Ctrl-C.
pub async fn run_listen(config: OpsdeskConfig) -> Result<(), OpsdeskError> {
    crate::serve::init_tracing(&config.server.log_level);

    let listener_config = ListenerConfig {
        url: config.listener.ws_url.clone(),
        reconnect_delay: Duration::from_millis(config.listener.reconnect_delay_ms),
        max_reconnect_attempts: config.listener.max_reconnect_attempts,
        connect_timeout: Duration::from_secs(config.listener.connect_timeout_secs),
    };

    let bus = UpdateBus::new();
    let listener = UpdateListener::new(listener_config, bus.clone());

    let router = NotificationRouter::new(
        Arc::new(TracingToastSink),
        Arc::new(LoggingCache),
        Arc::new(TerminalLocation),
        Arc::new(HttpTicketFetcher::new(config.listener.api_base_url.clone())),
    );

    info!(url = config.listener.ws_url.as_str(), "tailing real-time updates; Ctrl-C to stop");
    listener.connect();

    let rx = bus.subscribe();
    tokio::select! {
        _ = router.run(rx) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
        }
    }

    listener.disconnect();
    Ok(())
}
