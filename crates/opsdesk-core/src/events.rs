// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Broadcast event envelopes pushed to real-time clients.
//!
//! Wire shape:
//! ```json
//! {"type": "ticket_update", "action": "create", "data": { ...ticket... }}
//! {"type": "comment_update", "action": "create", "data": { ...comment... }}
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Comment, Ticket};

/// What happened to the entity carried by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Create,
    Update,
}

/// A server-to-client mutation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A ticket was created or updated; payload is the full ticket.
    TicketUpdate { action: EventAction, data: Box<Ticket> },
    /// A comment was created; payload is the full comment.
    CommentUpdate { action: EventAction, data: Comment },
}

impl ServerEvent {
    /// Envelope for a ticket mutation.
    pub fn ticket(action: EventAction, ticket: Ticket) -> Self {
        ServerEvent::TicketUpdate { action, data: Box::new(ticket) }
    }

    /// Envelope for a newly created comment.
    pub fn comment(comment: Comment) -> Self {
        ServerEvent::CommentUpdate { action: EventAction::Create, data: comment }
    }
}
