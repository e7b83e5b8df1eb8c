// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway for the Opsdesk helpdesk.
//!
//! Serves the REST API under `/api` and fans mutation events out to
//! real-time clients connected at `/ws`. State is injected explicitly:
//! handlers share an `Arc<dyn Storage>` and an `Arc<BroadcastHub>`, never
//! process-wide globals.

pub mod handlers;
pub mod hub;
pub mod server;
pub mod ws;

pub use hub::BroadcastHub;
pub use server::{AppState, ServerConfig, build_router, start_server};
