// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconnecting WebSocket listener for server update events.
//!
//! One listener maintains exactly one active connection. Lifecycle:
//! disconnected -> connecting -> connected -> disconnected, then
//! reconnecting after a fixed delay up to a bounded number of attempts.
//! Exhausting the attempts leaves the listener silently disconnected;
//! callers must treat the channel as a latency optimization over
//! refetching, never as guaranteed delivery. `state()` exposes the
//! terminal state for embedders that want to observe it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use opsdesk_core::events::ServerEvent;

use crate::bus::UpdateBus;

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// WebSocket URL of the server's `/ws` endpoint.
    pub url: String,
    /// Fixed delay between reconnect attempts.
    pub reconnect_delay: Duration,
    /// Reconnect attempts before giving up silently.
    pub max_reconnect_attempts: u32,
    /// Per-attempt connection timeout, so a hung dial cannot leave the
    /// listener in `connecting` forever.
    pub connect_timeout: Duration,
}

impl ListenerConfig {
    /// Reference defaults: 3 s fixed delay, 5 attempts, 10 s dial timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect_delay: Duration::from_millis(3000),
            max_reconnect_attempts: 5,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Connection state of the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

/// Per-client real-time update listener.
///
/// Constructed explicitly and shared by handle; there is no module-level
/// singleton. Events parsed off the wire are published on the
/// [`UpdateBus`] for any number of subscribers.
pub struct UpdateListener {
    config: ListenerConfig,
    bus: UpdateBus,
    state: Arc<Mutex<ListenerState>>,
    attempts: Arc<AtomicU32>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl UpdateListener {
    /// Create a listener publishing to `bus`. No connection is made until
    /// [`connect`](Self::connect).
    pub fn new(config: ListenerConfig, bus: UpdateBus) -> Self {
        Self {
            config,
            bus,
            state: Arc::new(Mutex::new(ListenerState::Disconnected)),
            attempts: Arc::new(AtomicU32::new(0)),
            task: Mutex::new(None),
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ListenerState {
        *self.state.lock()
    }

    /// The bus this listener publishes to.
    pub fn bus(&self) -> &UpdateBus {
        &self.bus
    }

    /// Whether the connection task is running (connected or between
    /// reconnect attempts).
    pub fn is_active(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Open the connection. No-op when a connection task is already
    /// running, so duplicate calls cannot start overlapping reconnect
    /// loops.
    pub fn connect(&self) {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            tracing::debug!("listener already connected; ignoring connect()");
            return;
        }

        self.attempts.store(0, Ordering::Relaxed);
        let config = self.config.clone();
        let bus = self.bus.clone();
        let state = Arc::clone(&self.state);
        let attempts = Arc::clone(&self.attempts);
        *task = Some(tokio::spawn(run_loop(config, bus, state, attempts)));
    }

    /// Close the connection and cancel any pending reconnect timer.
    ///
    /// Idempotent: safe to call repeatedly, and before ever connecting.
    pub fn disconnect(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
        *self.state.lock() = ListenerState::Disconnected;
    }
}

impl Drop for UpdateListener {
    fn drop(&mut self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }
}

/// Connection loop: dial, pump messages, reconnect on failure.
async fn run_loop(
    config: ListenerConfig,
    bus: UpdateBus,
    state: Arc<Mutex<ListenerState>>,
    attempts: Arc<AtomicU32>,
) {
    loop {
        *state.lock() = ListenerState::Connecting;

        match tokio::time::timeout(config.connect_timeout, connect_async(config.url.as_str())).await
        {
            Ok(Ok((mut stream, _response))) => {
                *state.lock() = ListenerState::Connected;
                attempts.store(0, Ordering::Relaxed);
                tracing::info!(url = config.url.as_str(), "real-time channel connected");

                while let Some(message) = stream.next().await {
                    match message {
                        Ok(Message::Text(text)) => dispatch(&bus, text.as_str()),
                        Ok(Message::Close(_)) => break,
                        Ok(_) => {} // Ignore binary, ping/pong
                        Err(e) => {
                            tracing::warn!(error = %e, "real-time channel error");
                            break;
                        }
                    }
                }
                tracing::info!("real-time channel closed");
            }
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "connection attempt failed");
            }
            Err(_) => {
                tracing::debug!(
                    timeout_secs = config.connect_timeout.as_secs(),
                    "connection attempt timed out"
                );
            }
        }

        *state.lock() = ListenerState::Disconnected;

        let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
        if attempt > config.max_reconnect_attempts {
            tracing::debug!(
                max = config.max_reconnect_attempts,
                "max reconnect attempts reached; giving up"
            );
            return;
        }

        tracing::debug!(
            attempt,
            max = config.max_reconnect_attempts,
            delay_ms = config.reconnect_delay.as_millis() as u64,
            "scheduling reconnect"
        );
        *state.lock() = ListenerState::Reconnecting;
        tokio::time::sleep(config.reconnect_delay).await;
    }
}

/// Parse a wire message and publish it on the bus.
///
/// Unknown or malformed messages are logged and skipped; they never tear
/// down the connection.
fn dispatch(bus: &UpdateBus, text: &str) {
    match serde_json::from_str::<ServerEvent>(text) {
        Ok(event) => {
            bus.publish(event);
        }
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unrecognized server message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk_core::events::EventAction;

    fn unroutable_config() -> ListenerConfig {
        ListenerConfig {
            // Nothing listens on the discard port; dials fail immediately.
            url: "ws://127.0.0.1:9/ws".to_string(),
            reconnect_delay: Duration::from_millis(3000),
            max_reconnect_attempts: 5,
            connect_timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn dispatch_publishes_parsed_events() {
        let bus = UpdateBus::new();
        let mut rx = bus.subscribe();

        let payload = r#"{"type":"comment_update","action":"create","data":{
            "id":1,"ticketId":2,"userId":3,"content":"ack","isInternal":false,
            "createdAt":"2026-03-01T12:00:00Z"}}"#;
        dispatch(&bus, payload);

        let event = rx.try_recv().expect("event published");
        match event {
            ServerEvent::CommentUpdate { action, data } => {
                assert_eq!(action, EventAction::Create);
                assert_eq!(data.ticket_id, 2);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn dispatch_skips_malformed_messages() {
        let bus = UpdateBus::new();
        let mut rx = bus.subscribe();
        dispatch(&bus, "{not json");
        dispatch(&bus, r#"{"type":"unknown_kind","action":"create","data":{}}"#);
        assert!(rx.try_recv().is_err(), "nothing published");
    }

    #[tokio::test(start_paused = true)]
    async fn reconnects_are_bounded_then_silent() {
        let listener = UpdateListener::new(unroutable_config(), UpdateBus::new());
        listener.connect();

        // Initial dial + 5 reconnects, each separated by the fixed delay.
        // Paused time auto-advances through the sleeps; the loop must end
        // on its own without panicking.
        for _ in 0..200 {
            if !listener.is_active() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }

        assert!(!listener.is_active(), "listener gave up after bounded attempts");
        assert_eq!(listener.state(), ListenerState::Disconnected);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent_even_without_connect() {
        let listener = UpdateListener::new(unroutable_config(), UpdateBus::new());
        listener.disconnect();
        listener.disconnect();
        assert_eq!(listener.state(), ListenerState::Disconnected);
    }

    #[tokio::test]
    async fn connect_twice_keeps_a_single_task() {
        let listener = UpdateListener::new(unroutable_config(), UpdateBus::new());
        listener.connect();
        listener.connect(); // no-op while the first task is live
        assert!(listener.is_active());
        listener.disconnect();
        assert!(!listener.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_cancels_a_pending_reconnect() {
        let listener = UpdateListener::new(unroutable_config(), UpdateBus::new());
        listener.connect();

        // Give the task a moment to fail its first dial and enter the
        // reconnect sleep, then disconnect while the timer is pending.
        tokio::time::sleep(Duration::from_millis(100)).await;
        listener.disconnect();
        assert!(!listener.is_active());
        assert_eq!(listener.state(), ListenerState::Disconnected);

        // Advance well past the reconnect delay; nothing resumes.
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(!listener.is_active());
    }
}
