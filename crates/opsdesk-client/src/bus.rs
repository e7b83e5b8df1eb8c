// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process publish/subscribe bus for server events.
//!
//! Decouples the update listener from its consumers: the listener
//! publishes every parsed event, and any number of subscribers (the
//! notification surface, cache layers, tests) receive their own copy.

use tokio::sync::broadcast;

use opsdesk_core::events::ServerEvent;

/// Buffered events per subscriber before the slowest one starts lagging.
const DEFAULT_CAPACITY: usize = 64;

/// Cloneable handle to the event bus.
#[derive(Clone)]
pub struct UpdateBus {
    tx: broadcast::Sender<ServerEvent>,
}

impl UpdateBus {
    /// Create a bus with the given per-subscriber buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Create a bus with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Subscribe to all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns the number of subscribers that received it; zero when
    /// nobody is listening (not an error).
    pub fn publish(&self, event: ServerEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }
}

impl Default for UpdateBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk_core::events::EventAction;
    use opsdesk_core::types::Comment;

    fn comment_event() -> ServerEvent {
        ServerEvent::CommentUpdate {
            action: EventAction::Create,
            data: Comment {
                id: 1,
                ticket_id: 2,
                user_id: 3,
                content: "ack".to_string(),
                is_internal: false,
                created_at: chrono::Utc::now(),
            },
        }
    }

    #[tokio::test]
    async fn every_subscriber_receives_each_event() {
        let bus = UpdateBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        let event = comment_event();
        assert_eq!(bus.publish(event.clone()), 2);
        assert_eq!(a.recv().await.unwrap(), event);
        assert_eq!(b.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let bus = UpdateBus::new();
        assert_eq!(bus.publish(comment_event()), 0);
    }
}
