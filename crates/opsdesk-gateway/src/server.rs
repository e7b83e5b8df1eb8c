// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the REST API under
//! `/api` and the real-time channel at `/ws`.

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::get,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use opsdesk_core::OpsdeskError;
use opsdesk_core::traits::Storage;

use crate::handlers::{dashboard, kb, tickets, users};
use crate::hub::BroadcastHub;
use crate::ws;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Entity store; injected explicitly so tests can run isolated
    /// instances instead of sharing process-wide state.
    pub storage: Arc<dyn Storage>,
    /// Fan-out registry for connected real-time clients.
    pub hub: Arc<BroadcastHub>,
}

impl AppState {
    /// Bundle a store and a fresh hub into handler state.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage, hub: Arc::new(BroadcastHub::new()) }
    }
}

/// Gateway server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Response body for GET /api/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: &'static str,
}

/// GET /api/health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(get_health))
        .route("/tickets", get(tickets::list).post(tickets::create))
        .route("/tickets/recent", get(tickets::recent))
        .route("/tickets/{id}", get(tickets::get).patch(tickets::update))
        .route(
            "/tickets/{id}/comments",
            get(tickets::comments).post(tickets::create_comment),
        )
        .route("/tickets/{id}/activity", get(tickets::activity))
        .route(
            "/tickets/{id}/attachments",
            get(tickets::attachments).post(tickets::create_attachments),
        )
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", get(users::get).patch(users::update))
        .route("/kb-articles", get(kb::list))
        .route("/kb-articles/{id}", get(kb::get))
        .route("/dashboard/metrics", get(dashboard::metrics))
        .route("/dashboard/team-performance", get(dashboard::team_performance))
        .route("/dashboard/status-breakdown", get(dashboard::status_breakdown))
        .route(
            "/dashboard/priority-distribution",
            get(dashboard::priority_distribution),
        );

    Router::new()
        .nest("/api", api)
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway HTTP/WebSocket server and serve until shutdown.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), OpsdeskError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| OpsdeskError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| OpsdeskError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
