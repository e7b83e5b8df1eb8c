// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage trait: the seam between the HTTP layer and the entity store.
//!
//! The store exclusively owns all entity lifetimes. Callers never hold
//! long-lived mutable copies; every read returns an owned snapshot. A
//! conforming implementation must assign each id exactly once and compute
//! update diffs against a consistent snapshot, which in a multi-threaded
//! process means locking around mutation.

use async_trait::async_trait;

use crate::activity::{ActivityDetails, ActivityLog, ChangeSet};
use crate::error::OpsdeskError;
use crate::reports::{DashboardMetrics, PriorityDistribution, StatusBreakdown, TeamPerformance};
use crate::types::{
    Attachment, Comment, KbArticle, KbArticlePatch, NewComment, NewKbArticle, NewTicket, NewUser,
    Ticket, TicketFilter, TicketPatch, User, UserPatch,
};

/// Result of a ticket update: the merged ticket and the field-level diff
/// that feeds the activity log.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatedTicket {
    pub ticket: Ticket,
    pub changes: ChangeSet,
}

/// CRUD and query operations over all helpdesk entities.
#[async_trait]
pub trait Storage: Send + Sync {
    // --- Users ---

    /// Create a user. Fails with `Validation` on missing/invalid fields.
    async fn create_user(&self, new: NewUser) -> Result<User, OpsdeskError>;
    async fn user(&self, id: i64) -> Result<Option<User>, OpsdeskError>;
    async fn user_by_username(&self, username: &str) -> Result<Option<User>, OpsdeskError>;
    async fn users(&self) -> Result<Vec<User>, OpsdeskError>;
    /// Merge `patch` into the user; returns `None` when the id is unknown.
    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>, OpsdeskError>;

    // --- Tickets ---

    /// Create a ticket: validates the payload, assigns the id and ticket
    /// number, and stamps creation timestamps.
    async fn create_ticket(&self, new: NewTicket) -> Result<Ticket, OpsdeskError>;
    async fn ticket(&self, id: i64) -> Result<Option<Ticket>, OpsdeskError>;
    async fn ticket_by_number(&self, number: &str) -> Result<Option<Ticket>, OpsdeskError>;
    /// Apply a partial update through the lifecycle engine; returns the
    /// merged ticket plus its change set, or `None` for an unknown id.
    async fn update_ticket(
        &self,
        id: i64,
        patch: TicketPatch,
    ) -> Result<Option<UpdatedTicket>, OpsdeskError>;
    /// All tickets satisfying every supplied filter, in insertion order.
    async fn tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, OpsdeskError>;
    /// Newest tickets first by `createdAt`, insertion order as tiebreak.
    async fn recent_tickets(&self, limit: usize) -> Result<Vec<Ticket>, OpsdeskError>;

    // --- Comments ---

    /// Append a comment to a ticket thread.
    async fn create_comment(
        &self,
        ticket_id: i64,
        new: NewComment,
    ) -> Result<Comment, OpsdeskError>;
    /// Comments for a ticket, oldest first.
    async fn ticket_comments(&self, ticket_id: i64) -> Result<Vec<Comment>, OpsdeskError>;

    // --- Attachments ---

    /// Record an attachment with a mocked storage path.
    async fn create_attachment(
        &self,
        ticket_id: i64,
        filename: String,
        file_type: String,
        file_size: i64,
        uploaded_by_id: i64,
    ) -> Result<Attachment, OpsdeskError>;
    async fn ticket_attachments(&self, ticket_id: i64) -> Result<Vec<Attachment>, OpsdeskError>;

    // --- Activity log ---

    /// Append an audit record. Fails with `NotFound` when the ticket or
    /// user does not exist; no other validation.
    async fn record_activity(
        &self,
        ticket_id: i64,
        user_id: i64,
        details: ActivityDetails,
    ) -> Result<ActivityLog, OpsdeskError>;
    /// Audit records for a ticket, newest first.
    async fn ticket_activity(&self, ticket_id: i64) -> Result<Vec<ActivityLog>, OpsdeskError>;

    // --- Knowledge base ---

    async fn create_kb_article(&self, new: NewKbArticle) -> Result<KbArticle, OpsdeskError>;
    async fn kb_article(&self, id: i64) -> Result<Option<KbArticle>, OpsdeskError>;
    async fn update_kb_article(
        &self,
        id: i64,
        patch: KbArticlePatch,
    ) -> Result<Option<KbArticle>, OpsdeskError>;
    async fn kb_articles(&self) -> Result<Vec<KbArticle>, OpsdeskError>;
    async fn published_kb_articles(&self) -> Result<Vec<KbArticle>, OpsdeskError>;

    // --- Dashboard ---

    async fn dashboard_metrics(&self) -> Result<DashboardMetrics, OpsdeskError>;
    async fn team_performance(&self) -> Result<Vec<TeamPerformance>, OpsdeskError>;
    async fn status_breakdown(&self) -> Result<Vec<StatusBreakdown>, OpsdeskError>;
    async fn priority_distribution(&self) -> Result<Vec<PriorityDistribution>, OpsdeskError>;
}
