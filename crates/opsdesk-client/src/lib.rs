// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Real-time client for the Opsdesk helpdesk.
//!
//! [`UpdateListener`] keeps one reconnecting WebSocket connection to the
//! gateway and publishes parsed events on an [`UpdateBus`];
//! [`NotificationRouter`] consumes the bus and applies the toast and
//! cache-invalidation policy.

pub mod bus;
pub mod listener;
pub mod notify;

pub use bus::UpdateBus;
pub use listener::{ListenerConfig, ListenerState, UpdateListener};
pub use notify::{
    HttpTicketFetcher, Location, NotificationRouter, QueryCache, TicketFetcher, Toast, ToastSink,
    TracingToastSink,
};
