// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `Storage` implementation.
//!
//! Entities live in `BTreeMap`s keyed by id behind a single `RwLock`, so
//! every mutation sees a consistent snapshot and each id is assigned
//! exactly once. Instances are constructed explicitly and injected as
//! `Arc<MemStorage>`; there is no process-wide store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use opsdesk_core::activity::{ActivityDetails, ActivityLog};
use opsdesk_core::error::{FieldError, OpsdeskError};
use opsdesk_core::reports::{
    DashboardMetrics, PriorityDistribution, StatusBreakdown, TeamPerformance,
};
use opsdesk_core::traits::{Storage, UpdatedTicket};
use opsdesk_core::types::{
    Attachment, Comment, KbArticle, KbArticlePatch, NewComment, NewKbArticle, NewTicket, NewUser,
    Ticket, TicketFilter, TicketPatch, User, UserPatch,
};

use crate::{lifecycle, metrics};

/// Per-entity monotonic id counters. Ids start at 1 and are never reused.
struct IdCounters {
    user: i64,
    ticket: i64,
    comment: i64,
    attachment: i64,
    activity: i64,
    kb_article: i64,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self { user: 1, ticket: 1, comment: 1, attachment: 1, activity: 1, kb_article: 1 }
    }
}

fn alloc(counter: &mut i64) -> i64 {
    let id = *counter;
    *counter += 1;
    id
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    tickets: BTreeMap<i64, Ticket>,
    comments: BTreeMap<i64, Comment>,
    attachments: BTreeMap<i64, Attachment>,
    activity: BTreeMap<i64, ActivityLog>,
    kb_articles: BTreeMap<i64, KbArticle>,
    ids: IdCounters,
}

/// In-memory entity store standing in for a database.
#[derive(Default)]
pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl MemStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite a ticket's creation timestamps. Seed-data helper only;
    /// `updatedAt` follows `createdAt` so demo tickets look aged.
    pub(crate) fn backdate_ticket(&self, id: i64, created_at: chrono::DateTime<Utc>) {
        let mut tables = self.tables.write();
        if let Some(ticket) = tables.tickets.get_mut(&id) {
            ticket.created_at = created_at;
            ticket.updated_at = created_at;
        }
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn create_user(&self, new: NewUser) -> Result<User, OpsdeskError> {
        let mut tables = self.tables.write();

        let mut errors = Vec::new();
        for (field, value) in [
            ("username", &new.username),
            ("password", &new.password),
            ("fullName", &new.full_name),
            ("email", &new.email),
        ] {
            if value.as_deref().map(str::trim).unwrap_or("").is_empty() {
                errors.push(FieldError::new(field, "is required"));
            }
        }
        if let Some(username) = new.username.as_deref() {
            if tables.users.values().any(|u| u.username == username) {
                errors.push(FieldError::new("username", "is already taken"));
            }
        }
        if !errors.is_empty() {
            return Err(OpsdeskError::Validation(errors));
        }

        let id = alloc(&mut tables.ids.user);
        let user = User {
            id,
            username: new.username.unwrap_or_default(),
            password: new.password.unwrap_or_default(),
            full_name: new.full_name.unwrap_or_default(),
            email: new.email.unwrap_or_default(),
            role: new.role.unwrap_or_default(),
            avatar_url: new.avatar_url,
            department: new.department,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn user(&self, id: i64) -> Result<Option<User>, OpsdeskError> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, OpsdeskError> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn users(&self) -> Result<Vec<User>, OpsdeskError> {
        Ok(self.tables.read().users.values().cloned().collect())
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>, OpsdeskError> {
        let mut tables = self.tables.write();
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(password) = patch.password {
            user.password = password;
        }
        if let Some(full_name) = patch.full_name {
            user.full_name = full_name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(avatar_url) = patch.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        if let Some(department) = patch.department {
            user.department = Some(department);
        }

        Ok(Some(user.clone()))
    }

    async fn create_ticket(&self, new: NewTicket) -> Result<Ticket, OpsdeskError> {
        let mut tables = self.tables.write();

        let users = &tables.users;
        lifecycle::validate_new_ticket(&new, |id| users.contains_key(&id))?;

        let id = alloc(&mut tables.ids.ticket);
        let ticket = lifecycle::build_ticket(id, new, Utc::now());
        tables.tickets.insert(id, ticket.clone());
        tracing::debug!(ticket_id = id, number = ticket.ticket_number.as_str(), "ticket created");
        Ok(ticket)
    }

    async fn ticket(&self, id: i64) -> Result<Option<Ticket>, OpsdeskError> {
        Ok(self.tables.read().tickets.get(&id).cloned())
    }

    async fn ticket_by_number(&self, number: &str) -> Result<Option<Ticket>, OpsdeskError> {
        Ok(self
            .tables
            .read()
            .tickets
            .values()
            .find(|t| t.ticket_number == number)
            .cloned())
    }

    async fn update_ticket(
        &self,
        id: i64,
        patch: TicketPatch,
    ) -> Result<Option<UpdatedTicket>, OpsdeskError> {
        let mut tables = self.tables.write();
        let Some(current) = tables.tickets.get(&id).cloned() else {
            return Ok(None);
        };

        let (ticket, changes) = lifecycle::apply_update(&current, &patch, Utc::now());
        tables.tickets.insert(id, ticket.clone());
        tracing::debug!(ticket_id = id, changed = changes.len(), "ticket updated");
        Ok(Some(UpdatedTicket { ticket, changes }))
    }

    async fn tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, OpsdeskError> {
        Ok(self
            .tables
            .read()
            .tickets
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn recent_tickets(&self, limit: usize) -> Result<Vec<Ticket>, OpsdeskError> {
        let mut tickets: Vec<Ticket> = self.tables.read().tickets.values().cloned().collect();
        // Stable sort keeps insertion order as the tiebreak for equal timestamps.
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tickets.truncate(limit);
        Ok(tickets)
    }

    async fn create_comment(
        &self,
        ticket_id: i64,
        new: NewComment,
    ) -> Result<Comment, OpsdeskError> {
        let mut tables = self.tables.write();
        if !tables.tickets.contains_key(&ticket_id) {
            return Err(OpsdeskError::not_found("ticket", ticket_id));
        }

        let mut errors = Vec::new();
        if new.content.as_deref().map(str::trim).unwrap_or("").is_empty() {
            errors.push(FieldError::new("content", "is required"));
        }
        match new.user_id {
            None => errors.push(FieldError::new("userId", "is required")),
            Some(user_id) if !tables.users.contains_key(&user_id) => {
                errors.push(FieldError::new("userId", "must reference an existing user"));
            }
            Some(_) => {}
        }
        if !errors.is_empty() {
            return Err(OpsdeskError::Validation(errors));
        }

        let id = alloc(&mut tables.ids.comment);
        let comment = Comment {
            id,
            ticket_id,
            user_id: new.user_id.unwrap_or_default(),
            content: new.content.unwrap_or_default(),
            is_internal: new.is_internal.unwrap_or(false),
            created_at: Utc::now(),
        };
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn ticket_comments(&self, ticket_id: i64) -> Result<Vec<Comment>, OpsdeskError> {
        let mut comments: Vec<Comment> = self
            .tables
            .read()
            .comments
            .values()
            .filter(|c| c.ticket_id == ticket_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn create_attachment(
        &self,
        ticket_id: i64,
        filename: String,
        file_type: String,
        file_size: i64,
        uploaded_by_id: i64,
    ) -> Result<Attachment, OpsdeskError> {
        let mut tables = self.tables.write();
        if !tables.tickets.contains_key(&ticket_id) {
            return Err(OpsdeskError::not_found("ticket", ticket_id));
        }

        let id = alloc(&mut tables.ids.attachment);
        let attachment = Attachment {
            id,
            ticket_id,
            path: format!("/uploads/{filename}"),
            filename,
            file_type,
            file_size,
            uploaded_by_id,
            created_at: Utc::now(),
        };
        tables.attachments.insert(id, attachment.clone());
        Ok(attachment)
    }

    async fn ticket_attachments(&self, ticket_id: i64) -> Result<Vec<Attachment>, OpsdeskError> {
        Ok(self
            .tables
            .read()
            .attachments
            .values()
            .filter(|a| a.ticket_id == ticket_id)
            .cloned()
            .collect())
    }

    async fn record_activity(
        &self,
        ticket_id: i64,
        user_id: i64,
        details: ActivityDetails,
    ) -> Result<ActivityLog, OpsdeskError> {
        let mut tables = self.tables.write();
        if !tables.tickets.contains_key(&ticket_id) {
            return Err(OpsdeskError::not_found("ticket", ticket_id));
        }
        if !tables.users.contains_key(&user_id) {
            return Err(OpsdeskError::not_found("user", user_id));
        }

        let id = alloc(&mut tables.ids.activity);
        let log = ActivityLog { id, ticket_id, user_id, details, created_at: Utc::now() };
        tables.activity.insert(id, log.clone());
        Ok(log)
    }

    async fn ticket_activity(&self, ticket_id: i64) -> Result<Vec<ActivityLog>, OpsdeskError> {
        let mut logs: Vec<ActivityLog> = self
            .tables
            .read()
            .activity
            .values()
            .filter(|l| l.ticket_id == ticket_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(logs)
    }

    async fn create_kb_article(&self, new: NewKbArticle) -> Result<KbArticle, OpsdeskError> {
        let mut tables = self.tables.write();

        let mut errors = Vec::new();
        if new.title.as_deref().map(str::trim).unwrap_or("").is_empty() {
            errors.push(FieldError::new("title", "is required"));
        }
        if new.content.as_deref().map(str::trim).unwrap_or("").is_empty() {
            errors.push(FieldError::new("content", "is required"));
        }
        match new.author_id {
            None => errors.push(FieldError::new("authorId", "is required")),
            Some(author_id) if !tables.users.contains_key(&author_id) => {
                errors.push(FieldError::new("authorId", "must reference an existing user"));
            }
            Some(_) => {}
        }
        if !errors.is_empty() {
            return Err(OpsdeskError::Validation(errors));
        }

        let id = alloc(&mut tables.ids.kb_article);
        let now = Utc::now();
        let article = KbArticle {
            id,
            title: new.title.unwrap_or_default(),
            content: new.content.unwrap_or_default(),
            category_id: new.category_id,
            author_id: new.author_id.unwrap_or_default(),
            is_published: new.is_published.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };
        tables.kb_articles.insert(id, article.clone());
        Ok(article)
    }

    async fn kb_article(&self, id: i64) -> Result<Option<KbArticle>, OpsdeskError> {
        Ok(self.tables.read().kb_articles.get(&id).cloned())
    }

    async fn update_kb_article(
        &self,
        id: i64,
        patch: KbArticlePatch,
    ) -> Result<Option<KbArticle>, OpsdeskError> {
        let mut tables = self.tables.write();
        let Some(article) = tables.kb_articles.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            article.title = title;
        }
        if let Some(content) = patch.content {
            article.content = content;
        }
        if let Some(category_id) = patch.category_id {
            article.category_id = Some(category_id);
        }
        if let Some(is_published) = patch.is_published {
            article.is_published = is_published;
        }
        article.updated_at = Utc::now();

        Ok(Some(article.clone()))
    }

    async fn kb_articles(&self) -> Result<Vec<KbArticle>, OpsdeskError> {
        Ok(self.tables.read().kb_articles.values().cloned().collect())
    }

    async fn published_kb_articles(&self) -> Result<Vec<KbArticle>, OpsdeskError> {
        Ok(self
            .tables
            .read()
            .kb_articles
            .values()
            .filter(|a| a.is_published)
            .cloned()
            .collect())
    }

    async fn dashboard_metrics(&self) -> Result<DashboardMetrics, OpsdeskError> {
        let tickets: Vec<Ticket> = self.tables.read().tickets.values().cloned().collect();
        Ok(metrics::dashboard_metrics(&tickets, Utc::now()))
    }

    async fn team_performance(&self) -> Result<Vec<TeamPerformance>, OpsdeskError> {
        let (users, tickets) = {
            let tables = self.tables.read();
            (
                tables.users.values().cloned().collect::<Vec<_>>(),
                tables.tickets.values().cloned().collect::<Vec<_>>(),
            )
        };
        Ok(metrics::team_performance(&users, &tickets))
    }

    async fn status_breakdown(&self) -> Result<Vec<StatusBreakdown>, OpsdeskError> {
        let tickets: Vec<Ticket> = self.tables.read().tickets.values().cloned().collect();
        Ok(metrics::status_breakdown(&tickets))
    }

    async fn priority_distribution(&self) -> Result<Vec<PriorityDistribution>, OpsdeskError> {
        let tickets: Vec<Ticket> = self.tables.read().tickets.values().cloned().collect();
        Ok(metrics::priority_distribution(&tickets))
    }
}
