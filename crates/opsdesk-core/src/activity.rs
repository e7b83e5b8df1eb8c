// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only activity log entries for ticket audit trails.
//!
//! `details` payloads are a tagged union with a fixed schema per action
//! kind rather than free-form JSON; the wire shape is the original
//! `action` + `details` pair.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Ticket;

/// Old and new serialized values for one changed ticket field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub from: serde_json::Value,
    pub to: serde_json::Value,
}

/// Field-level change set produced by a ticket update, keyed by wire
/// (camelCase) field name.
pub type ChangeSet = BTreeMap<String, FieldChange>;

/// Action-specific activity payload.
///
/// Serializes as `{"action": "...", "details": ...}`; for `updated` the
/// details are the change mapping itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "details", rename_all = "snake_case")]
pub enum ActivityDetails {
    /// Ticket creation, with a snapshot of the new ticket.
    Created { ticket: Box<Ticket> },
    /// Ticket update; maps each changed field to its old and new value.
    Updated(ChangeSet),
    /// A comment was posted; carries the comment body.
    Commented { comment: String },
    /// A file was attached.
    AttachedFile { filename: String },
}

impl ActivityDetails {
    /// Wire name of the action kind.
    pub fn action(&self) -> &'static str {
        match self {
            ActivityDetails::Created { .. } => "created",
            ActivityDetails::Updated(_) => "updated",
            ActivityDetails::Commented { .. } => "commented",
            ActivityDetails::AttachedFile { .. } => "attached_file",
        }
    }
}

/// One immutable audit record on a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: i64,
    pub ticket_id: i64,
    pub user_id: i64,
    #[serde(flatten)]
    pub details: ActivityDetails,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updated_details_serialize_as_bare_change_mapping() {
        let mut changes = ChangeSet::new();
        changes.insert(
            "priority".to_string(),
            FieldChange {
                from: serde_json::json!("medium"),
                to: serde_json::json!("urgent"),
            },
        );
        let json = serde_json::to_value(ActivityDetails::Updated(changes)).unwrap();
        assert_eq!(json["action"], "updated");
        assert_eq!(json["details"]["priority"]["from"], "medium");
        assert_eq!(json["details"]["priority"]["to"], "urgent");
        assert_eq!(
            json["details"].as_object().unwrap().len(),
            1,
            "only the changed field appears"
        );
    }

    #[test]
    fn commented_details_carry_the_body() {
        let json =
            serde_json::to_value(ActivityDetails::Commented { comment: "on it".to_string() })
                .unwrap();
        assert_eq!(json["action"], "commented");
        assert_eq!(json["details"]["comment"], "on it");
    }

    #[test]
    fn attached_file_round_trips() {
        let details = ActivityDetails::AttachedFile { filename: "log.txt".to_string() };
        let json = serde_json::to_string(&details).unwrap();
        let back: ActivityDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(back, details);
    }

    #[test]
    fn activity_log_flattens_action_and_details() {
        let log = ActivityLog {
            id: 7,
            ticket_id: 3,
            user_id: 1,
            details: ActivityDetails::Commented { comment: "done".to_string() },
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["ticketId"], 3);
        assert_eq!(json["action"], "commented");
        assert_eq!(json["details"]["comment"], "done");
        assert_eq!(log.details.action(), "commented");
    }
}
