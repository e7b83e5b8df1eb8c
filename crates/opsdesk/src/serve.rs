// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `opsdesk serve` command implementation.
//!
//! Wires the in-memory store, optional demo seed data, the broadcast hub,
//! and the axum gateway together, then serves until the process exits.

use std::sync::Arc;

use tracing::info;

use opsdesk_config::OpsdeskConfig;
use opsdesk_core::OpsdeskError;
use opsdesk_core::traits::Storage;
use opsdesk_gateway::{AppState, ServerConfig, start_server};
use opsdesk_store::{MemStorage, seed_demo_data};

/// Runs the `opsdesk serve` command.
pub async fn run_serve(config: OpsdeskConfig) -> Result<(), OpsdeskError> {
    init_tracing(&config.server.log_level);

    info!("starting opsdesk serve");

    let storage = Arc::new(MemStorage::new());
    if config.seed.demo_data {
        seed_demo_data(&storage).await?;
    } else {
        info!("demo data seeding disabled");
    }

    let state = AppState::new(storage as Arc<dyn Storage>);
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    start_server(&server_config, state).await
}

/// Initializes the tracing subscriber with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("opsdesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
