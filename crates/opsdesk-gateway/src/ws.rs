// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket endpoint for real-time update delivery.
//!
//! Server -> Client (JSON):
//! ```json
//! {"type": "ticket_update", "action": "create", "data": { ...ticket... }}
//! {"type": "comment_update", "action": "create", "data": { ...comment... }}
//! ```
//!
//! Client -> Server messages are accepted, parsed, and logged; no client
//! command is currently acted on.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::server::AppState;

/// Outbound buffer per connection. When a client falls this far behind,
/// further events are dropped for it rather than stalling the hub.
const OUTBOUND_BUFFER: usize = 64;

/// WebSocket upgrade handler for `GET /ws`.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection.
///
/// Registers an mpsc sender with the broadcast hub, spawns a forward task
/// (hub -> socket), and reads client messages until close. Cleanup always
/// deregisters the connection and aborts the forward task.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let conn_id = uuid::Uuid::new_v4().to_string();

    let (tx, mut rx) = mpsc::channel::<String>(OUTBOUND_BUFFER);
    state.hub.register(conn_id.clone(), tx);
    tracing::debug!(
        conn_id = conn_id.as_str(),
        connections = state.hub.connection_count(),
        "websocket client connected"
    );

    let sender_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            Message::Text(text) => {
                let text: &str = &text;
                match serde_json::from_str::<serde_json::Value>(text) {
                    Ok(value) => {
                        tracing::debug!(conn_id = conn_id.as_str(), message = %value, "client message received");
                    }
                    Err(e) => {
                        tracing::warn!(conn_id = conn_id.as_str(), error = %e, "invalid websocket message");
                    }
                }
            }
            Message::Close(_) => break,
            _ => {} // Ignore binary, ping/pong (handled by the transport layer)
        }
    }

    state.hub.unregister(&conn_id);
    sender_task.abort();
    tracing::debug!(
        conn_id = conn_id.as_str(),
        connections = state.hub.connection_count(),
        "websocket client disconnected"
    );
}
