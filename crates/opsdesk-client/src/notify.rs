// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification surface: turns bus events into toasts and cache
//! invalidations.
//!
//! Policy (mirroring the reference client):
//! - ticket create: always toast; invalidate ticket list, recent list,
//!   and dashboard metrics.
//! - ticket update: invalidate the same plus the ticket itself; suppress
//!   the toast when the user is already viewing that ticket's page.
//! - comment create: fetch the parent ticket for its display title before
//!   composing the toast; invalidate the ticket's comment cache; suppress
//!   under the same currently-viewing condition.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use opsdesk_core::error::OpsdeskError;
use opsdesk_core::events::{EventAction, ServerEvent};
use opsdesk_core::types::Ticket;

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub body: String,
}

/// Sink for user-facing notifications.
pub trait ToastSink: Send + Sync {
    fn toast(&self, toast: Toast);
}

/// Cache of fetched queries, invalidated by key.
pub trait QueryCache: Send + Sync {
    fn invalidate(&self, key: &str);
}

/// Provides the path the user is currently viewing.
pub trait Location: Send + Sync {
    fn current_path(&self) -> String;
}

/// Fetches a ticket for toast composition.
#[async_trait]
pub trait TicketFetcher: Send + Sync {
    async fn ticket(&self, id: i64) -> Result<Option<Ticket>, OpsdeskError>;
}

/// Toast sink that logs notifications through tracing. Useful for
/// headless embedders and as the default wiring.
#[derive(Default)]
pub struct TracingToastSink;

impl ToastSink for TracingToastSink {
    fn toast(&self, toast: Toast) {
        tracing::info!(title = toast.title.as_str(), body = toast.body.as_str(), "toast");
    }
}

/// Ticket fetcher backed by the REST API.
pub struct HttpTicketFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTicketFetcher {
    /// Fetch tickets from `base_url` (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TicketFetcher for HttpTicketFetcher {
    async fn ticket(&self, id: i64) -> Result<Option<Ticket>, OpsdeskError> {
        let url = format!("{}/api/tickets/{id}", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| OpsdeskError::Channel {
                message: format!("ticket fetch failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let ticket = response
            .error_for_status()
            .map_err(|e| OpsdeskError::Channel {
                message: format!("ticket fetch failed: {e}"),
                source: Some(Box::new(e)),
            })?
            .json::<Ticket>()
            .await
            .map_err(|e| OpsdeskError::Channel {
                message: format!("ticket fetch returned invalid payload: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Some(ticket))
    }
}

/// Routes bus events to the toast sink and query cache.
pub struct NotificationRouter {
    toasts: Arc<dyn ToastSink>,
    cache: Arc<dyn QueryCache>,
    location: Arc<dyn Location>,
    fetcher: Arc<dyn TicketFetcher>,
}

impl NotificationRouter {
    pub fn new(
        toasts: Arc<dyn ToastSink>,
        cache: Arc<dyn QueryCache>,
        location: Arc<dyn Location>,
        fetcher: Arc<dyn TicketFetcher>,
    ) -> Self {
        Self { toasts, cache, location, fetcher }
    }

    /// Apply the notification policy to one event.
    pub async fn handle(&self, event: ServerEvent) {
        match event {
            ServerEvent::TicketUpdate { action: EventAction::Create, data } => {
                self.toasts.toast(Toast {
                    title: "New Ticket Created".to_string(),
                    body: format!("{}: {}", data.ticket_number, data.title),
                });
                self.invalidate_ticket_lists();
            }
            ServerEvent::TicketUpdate { action: EventAction::Update, data } => {
                if !self.viewing_ticket(data.id) {
                    self.toasts.toast(Toast {
                        title: "Ticket Updated".to_string(),
                        body: format!("{}: {}", data.ticket_number, data.title),
                    });
                }
                self.invalidate_ticket_lists();
                self.cache.invalidate(&format!("/api/tickets/{}", data.id));
            }
            ServerEvent::CommentUpdate { data, .. } => {
                let ticket_id = data.ticket_id;
                if !self.viewing_ticket(ticket_id) {
                    match self.fetcher.ticket(ticket_id).await {
                        Ok(Some(ticket)) => self.toasts.toast(Toast {
                            title: "New Comment".to_string(),
                            body: format!("{}: {}", ticket.ticket_number, ticket.title),
                        }),
                        Ok(None) => {
                            tracing::debug!(ticket_id, "comment event for unknown ticket");
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "failed to fetch ticket for comment toast");
                        }
                    }
                }
                self.cache
                    .invalidate(&format!("/api/tickets/{ticket_id}/comments"));
            }
        }
    }

    /// Consume events from a bus subscription until the bus closes.
    pub async fn run(&self, mut rx: broadcast::Receiver<ServerEvent>) {
        loop {
            match rx.recv().await {
                Ok(event) => self.handle(event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notification consumer lagged; events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    fn invalidate_ticket_lists(&self) {
        self.cache.invalidate("/api/tickets");
        self.cache.invalidate("/api/tickets/recent");
        self.cache.invalidate("/api/dashboard/metrics");
    }

    fn viewing_ticket(&self, id: i64) -> bool {
        self.location.current_path() == format!("/tickets/{id}")
    }
}
