// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Broadcast hub: fan-out of mutation events to connected clients.
//!
//! Delivery is best-effort and at-most-once per currently-open connection.
//! There is no retry, persistence, or replay; a client that is
//! disconnected at broadcast time never receives the event and must rely
//! on refetching after reconnect. Per-connection sends are non-blocking,
//! so one stalled client cannot stall the fan-out to the others.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use opsdesk_core::events::ServerEvent;

/// Registry of currently-connected real-time clients.
///
/// Keys are per-connection ids; values are the mpsc senders feeding each
/// connection's socket forward task. The map is safe to mutate while a
/// broadcast iterates it.
#[derive(Default)]
pub struct BroadcastHub {
    senders: DashMap<String, mpsc::Sender<String>>,
}

impl BroadcastHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection's outbound sender.
    pub fn register(&self, conn_id: String, tx: mpsc::Sender<String>) {
        self.senders.insert(conn_id, tx);
    }

    /// Remove a connection from the registry.
    pub fn unregister(&self, conn_id: &str) {
        self.senders.remove(conn_id);
    }

    /// Number of currently-registered connections.
    pub fn connection_count(&self) -> usize {
        self.senders.len()
    }

    /// Serialize `event` once and push it to every registered connection.
    ///
    /// Returns the number of connections the event was handed to. A full
    /// per-connection buffer drops the event for that client only.
    pub fn broadcast(&self, event: &ServerEvent) -> usize {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize broadcast event");
                return 0;
            }
        };

        let mut delivered = 0;
        for entry in self.senders.iter() {
            match entry.value().try_send(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(conn_id = entry.key().as_str(), "dropping event for slow client");
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(conn_id = entry.key().as_str(), "connection already closed");
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk_core::events::EventAction;
    use opsdesk_core::types::{Ticket, TicketPriority, TicketStatus};

    fn sample_ticket() -> Ticket {
        Ticket {
            id: 1,
            ticket_number: "TKT-0001".to_string(),
            title: "Email is down".to_string(),
            description: None,
            status: TicketStatus::Open,
            priority: TicketPriority::High,
            category: "software".to_string(),
            sub_category: None,
            impact: None,
            urgency: None,
            assigned_to_id: None,
            reported_by_id: 4,
            configuration_item: None,
            caller_location: None,
            issue_location: None,
            preferred_contact: None,
            created_at: chrono_now(),
            updated_at: chrono_now(),
            resolved_at: None,
            closed_at: None,
        }
    }

    fn chrono_now() -> chrono::DateTime<chrono::Utc> {
        chrono::Utc::now()
    }

    #[tokio::test]
    async fn every_connected_client_sees_one_event() {
        let hub = BroadcastHub::new();
        let mut receivers = Vec::new();
        for i in 0..3 {
            let (tx, rx) = mpsc::channel(8);
            hub.register(format!("conn-{i}"), tx);
            receivers.push(rx);
        }

        let delivered = hub.broadcast(&ServerEvent::ticket(EventAction::Create, sample_ticket()));
        assert_eq!(delivered, 3);

        for rx in &mut receivers {
            let raw = rx.try_recv().expect("one event per client");
            let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
            assert_eq!(value["type"], "ticket_update");
            assert_eq!(value["action"], "create");
            assert!(rx.try_recv().is_err(), "exactly one event, not more");
        }
    }

    #[tokio::test]
    async fn slow_client_does_not_block_the_others() {
        let hub = BroadcastHub::new();

        // Fill a capacity-1 channel so the next send would block.
        let (stalled_tx, _stalled_rx) = mpsc::channel(1);
        stalled_tx.try_send("backlog".to_string()).unwrap();
        hub.register("stalled".to_string(), stalled_tx);

        let (healthy_tx, mut healthy_rx) = mpsc::channel(8);
        hub.register("healthy".to_string(), healthy_tx);

        let delivered = hub.broadcast(&ServerEvent::ticket(EventAction::Update, sample_ticket()));
        assert_eq!(delivered, 1, "stalled client is skipped, not awaited");
        assert!(healthy_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn unregistered_clients_receive_nothing() {
        let hub = BroadcastHub::new();
        let (tx, mut rx) = mpsc::channel(8);
        hub.register("gone".to_string(), tx);
        hub.unregister("gone");
        assert_eq!(hub.connection_count(), 0);

        let delivered = hub.broadcast(&ServerEvent::ticket(EventAction::Create, sample_ticket()));
        assert_eq!(delivered, 0);
        assert!(rx.try_recv().is_err());
    }
}
