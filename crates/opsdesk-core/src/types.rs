// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for the Opsdesk helpdesk.
//!
//! Wire-format field names are camelCase to match the JSON API. Create
//! payloads (`New*`) keep required fields as `Option` so that missing
//! values surface as per-field validation errors rather than
//! deserialization failures; the lifecycle layer validates and fills them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Ticket lifecycle status. Any status is reachable from any other; the
/// server enforces no transition table.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Pending,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// All statuses, in display order for breakdown reports.
    pub const ALL: [TicketStatus; 5] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Pending,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];
}

/// Ticket priority, most severe first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
}

impl TicketPriority {
    /// All priorities, in display order for distribution reports.
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Urgent,
        TicketPriority::High,
        TicketPriority::Medium,
        TicketPriority::Low,
    ];
}

/// Impact/urgency level on the 1-3 priority matrix scale.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Numeric weight on the priority matrix.
    pub fn weight(self) -> u8 {
        match self {
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }
}

/// Derive a ticket priority from the impact x urgency matrix.
///
/// Score = impact weight x urgency weight; >= 7 is urgent, >= 5 high,
/// >= 3 medium, else low. Used by form-facing clients at creation/edit
/// time; the server stores whatever priority it is given and does not
/// re-derive it on mutation.
pub fn priority_for(impact: Severity, urgency: Severity) -> TicketPriority {
    match u16::from(impact.weight()) * u16::from(urgency.weight()) {
        s if s >= 7 => TicketPriority::Urgent,
        s if s >= 5 => TicketPriority::High,
        s if s >= 3 => TicketPriority::Medium,
        _ => TicketPriority::Low,
    }
}

/// Role of a user account.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Agent,
    #[default]
    User,
}

/// A user account. Authentication is mocked; the password is stored
/// verbatim and returned as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub department: Option<String>,
}

/// Payload for creating a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

/// Partial update for a user. Absent fields are left unchanged; updates
/// never delete fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

/// A helpdesk ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    /// Derived `TKT-%04d` number; assigned exactly once at creation.
    pub ticket_number: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub category: String,
    pub sub_category: Option<String>,
    pub impact: Option<Severity>,
    pub urgency: Option<Severity>,
    pub assigned_to_id: Option<i64>,
    pub reported_by_id: i64,
    pub configuration_item: Option<String>,
    pub caller_location: Option<String>,
    pub issue_location: Option<String>,
    pub preferred_contact: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
    /// Stamped on each transition into `resolved`; never cleared.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Stamped on each transition into `closed`; never cleared.
    pub closed_at: Option<DateTime<Utc>>,
}

/// Payload for creating a ticket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub impact: Option<Severity>,
    #[serde(default)]
    pub urgency: Option<Severity>,
    #[serde(default)]
    pub assigned_to_id: Option<i64>,
    #[serde(default)]
    pub reported_by_id: Option<i64>,
    #[serde(default)]
    pub configuration_item: Option<String>,
    #[serde(default)]
    pub caller_location: Option<String>,
    #[serde(default)]
    pub issue_location: Option<String>,
    #[serde(default)]
    pub preferred_contact: Option<String>,
}

/// Partial update for a ticket. Absent fields are left unchanged; updates
/// never delete fields (there is no way to null out `assignedToId`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub impact: Option<Severity>,
    #[serde(default)]
    pub urgency: Option<Severity>,
    #[serde(default)]
    pub assigned_to_id: Option<i64>,
    #[serde(default)]
    pub configuration_item: Option<String>,
    #[serde(default)]
    pub caller_location: Option<String>,
    #[serde(default)]
    pub issue_location: Option<String>,
    #[serde(default)]
    pub preferred_contact: Option<String>,
    /// Attributes the resulting activity entry; not merged into the ticket.
    #[serde(default)]
    pub updated_by_id: Option<i64>,
}

/// Filter for `GET /tickets`. All supplied filters are ANDed together.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilter {
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    #[serde(default)]
    pub assigned_to: Option<i64>,
    #[serde(default)]
    pub reported_by: Option<i64>,
}

impl TicketFilter {
    /// Whether `ticket` satisfies every supplied filter.
    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.status.is_none_or(|s| ticket.status == s)
            && self.priority.is_none_or(|p| ticket.priority == p)
            && self.assigned_to.is_none_or(|u| ticket.assigned_to_id == Some(u))
            && self.reported_by.is_none_or(|u| ticket.reported_by_id == u)
    }
}

/// A comment on a ticket thread. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub ticket_id: i64,
    pub user_id: i64,
    pub content: String,
    pub is_internal: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for posting a comment. The ticket id comes from the URL path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub is_internal: Option<bool>,
}

/// A file attached to a ticket. The upload itself is mocked; only the
/// derived path is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: i64,
    pub ticket_id: i64,
    pub filename: String,
    pub file_type: String,
    pub file_size: i64,
    pub path: String,
    pub uploaded_by_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Metadata for one file in an attachment upload request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub file_type: String,
}

/// Body of `POST /tickets/:id/attachments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentUpload {
    #[serde(default)]
    pub files: Vec<FileMeta>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// A knowledge base article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KbArticle {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category_id: Option<i64>,
    pub author_id: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a knowledge base article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewKbArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

/// Partial update for a knowledge base article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KbArticlePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        use std::str::FromStr;
        for status in TicketStatus::ALL {
            let s = status.to_string();
            assert_eq!(TicketStatus::from_str(&s).unwrap(), status);
        }
        assert_eq!(TicketStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn priority_matrix_matches_reference_table() {
        use Severity::*;
        // score 9
        assert_eq!(priority_for(High, High), TicketPriority::Urgent);
        // score 6
        assert_eq!(priority_for(High, Medium), TicketPriority::High);
        assert_eq!(priority_for(Medium, High), TicketPriority::High);
        // score 4 and 3
        assert_eq!(priority_for(Medium, Medium), TicketPriority::Medium);
        assert_eq!(priority_for(High, Low), TicketPriority::Medium);
        // score 2 and 1
        assert_eq!(priority_for(Medium, Low), TicketPriority::Low);
        assert_eq!(priority_for(Low, Low), TicketPriority::Low);
    }

    #[test]
    fn ticket_serializes_with_camel_case_fields() {
        let ticket = Ticket {
            id: 1,
            ticket_number: "TKT-0001".to_string(),
            title: "Printer on fire".to_string(),
            description: None,
            status: TicketStatus::Open,
            priority: TicketPriority::High,
            category: "hardware".to_string(),
            sub_category: None,
            impact: Some(Severity::High),
            urgency: Some(Severity::Medium),
            assigned_to_id: None,
            reported_by_id: 4,
            configuration_item: None,
            caller_location: None,
            issue_location: None,
            preferred_contact: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            resolved_at: None,
            closed_at: None,
        };
        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["ticketNumber"], "TKT-0001");
        assert_eq!(json["reportedById"], 4);
        assert_eq!(json["status"], "open");
        assert!(json["resolvedAt"].is_null());
    }

    #[test]
    fn ticket_filter_ands_all_supplied_criteria() {
        let mut ticket = Ticket {
            id: 1,
            ticket_number: "TKT-0001".to_string(),
            title: "VPN drops".to_string(),
            description: None,
            status: TicketStatus::Open,
            priority: TicketPriority::High,
            category: "network".to_string(),
            sub_category: None,
            impact: None,
            urgency: None,
            assigned_to_id: Some(2),
            reported_by_id: 4,
            configuration_item: None,
            caller_location: None,
            issue_location: None,
            preferred_contact: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            resolved_at: None,
            closed_at: None,
        };

        let filter = TicketFilter {
            status: Some(TicketStatus::Open),
            assigned_to: Some(2),
            ..Default::default()
        };
        assert!(filter.matches(&ticket));

        ticket.status = TicketStatus::Closed;
        assert!(!filter.matches(&ticket), "one failing criterion rejects");

        let empty = TicketFilter::default();
        assert!(empty.matches(&ticket), "empty filter matches everything");
    }

    #[test]
    fn new_ticket_deserializes_with_missing_fields() {
        let payload: NewTicket = serde_json::from_str(r#"{"title": "Hi"}"#).unwrap();
        assert_eq!(payload.title.as_deref(), Some("Hi"));
        assert!(payload.category.is_none());
        assert!(payload.reported_by_id.is_none());
    }

    #[test]
    fn file_meta_uses_type_key_on_the_wire() {
        let meta: FileMeta =
            serde_json::from_str(r#"{"name": "log.txt", "size": 120, "type": "text/plain"}"#)
                .unwrap();
        assert_eq!(meta.file_type, "text/plain");
    }
}
