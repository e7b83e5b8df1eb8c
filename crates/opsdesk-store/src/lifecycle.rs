// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket lifecycle engine: creation validation, ticket numbering, patch
//! merging, derived status timestamps, and field-level diffing.
//!
//! The status machine is open: any status is reachable from any other.
//! The engine only derives timestamps on the way through:
//! - entering `resolved` from a non-resolved status stamps `resolvedAt`
//! - entering `closed` from a non-closed status stamps `closedAt`
//! Neither field is ever cleared by transitioning away; re-entry stamps a
//! fresh value.

use chrono::{DateTime, Utc};

use opsdesk_core::activity::{ChangeSet, FieldChange};
use opsdesk_core::error::{FieldError, OpsdeskError};
use opsdesk_core::types::{NewTicket, Ticket, TicketStatus, TicketPatch};

/// Minimum accepted ticket title length, in characters.
const MIN_TITLE_LEN: usize = 5;

/// Fields derived by the engine itself; excluded from update diffs so an
/// update touching only `priority` logs exactly one change.
const DERIVED_FIELDS: [&str; 3] = ["updatedAt", "resolvedAt", "closedAt"];

/// Derive the display ticket number from an id: `TKT-%04d`.
pub fn ticket_number(id: i64) -> String {
    format!("TKT-{id:04}")
}

/// Validate a creation payload.
///
/// Collects all failures: `title` at least 5 characters, `category`
/// non-empty, `reportedById` (and `assignedToId` when present) referencing
/// an existing user via the `user_exists` probe.
pub fn validate_new_ticket(
    new: &NewTicket,
    user_exists: impl Fn(i64) -> bool,
) -> Result<(), OpsdeskError> {
    let mut errors = Vec::new();

    match new.title.as_deref().map(str::trim) {
        None | Some("") => errors.push(FieldError::new("title", "is required")),
        Some(title) if title.chars().count() < MIN_TITLE_LEN => errors.push(FieldError::new(
            "title",
            format!("must be at least {MIN_TITLE_LEN} characters"),
        )),
        Some(_) => {}
    }

    if new.category.as_deref().map(str::trim).unwrap_or("").is_empty() {
        errors.push(FieldError::new("category", "is required"));
    }

    match new.reported_by_id {
        None => errors.push(FieldError::new("reportedById", "is required")),
        Some(id) if !user_exists(id) => errors.push(FieldError::new(
            "reportedById",
            "must reference an existing user",
        )),
        Some(_) => {}
    }

    if let Some(id) = new.assigned_to_id {
        if !user_exists(id) {
            errors.push(FieldError::new(
                "assignedToId",
                "must reference an existing user",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(OpsdeskError::Validation(errors))
    }
}

/// Materialize a validated creation payload into a ticket.
///
/// Assigns the derived ticket number, stamps `createdAt` and `updatedAt`,
/// and leaves `resolvedAt`/`closedAt` unset regardless of the initial
/// status.
pub fn build_ticket(id: i64, new: NewTicket, now: DateTime<Utc>) -> Ticket {
    Ticket {
        id,
        ticket_number: ticket_number(id),
        title: new.title.unwrap_or_default(),
        description: new.description,
        status: new.status.unwrap_or_default(),
        priority: new.priority.unwrap_or_default(),
        category: new.category.unwrap_or_default(),
        sub_category: new.sub_category,
        impact: new.impact,
        urgency: new.urgency,
        assigned_to_id: new.assigned_to_id,
        reported_by_id: new.reported_by_id.unwrap_or_default(),
        configuration_item: new.configuration_item,
        caller_location: new.caller_location,
        issue_location: new.issue_location,
        preferred_contact: new.preferred_contact,
        created_at: now,
        updated_at: now,
        resolved_at: None,
        closed_at: None,
    }
}

/// Merge a partial update into `current` and compute the change set.
///
/// Returns the merged ticket (with `updatedAt` refreshed and status
/// timestamps derived) plus the diff that feeds the activity log.
pub fn apply_update(
    current: &Ticket,
    patch: &TicketPatch,
    now: DateTime<Utc>,
) -> (Ticket, ChangeSet) {
    let mut updated = current.clone();

    if let Some(title) = &patch.title {
        updated.title = title.clone();
    }
    if let Some(description) = &patch.description {
        updated.description = Some(description.clone());
    }
    if let Some(status) = patch.status {
        updated.status = status;
    }
    if let Some(priority) = patch.priority {
        updated.priority = priority;
    }
    if let Some(category) = &patch.category {
        updated.category = category.clone();
    }
    if let Some(sub_category) = &patch.sub_category {
        updated.sub_category = Some(sub_category.clone());
    }
    if let Some(impact) = patch.impact {
        updated.impact = Some(impact);
    }
    if let Some(urgency) = patch.urgency {
        updated.urgency = Some(urgency);
    }
    if let Some(assigned_to_id) = patch.assigned_to_id {
        updated.assigned_to_id = Some(assigned_to_id);
    }
    if let Some(configuration_item) = &patch.configuration_item {
        updated.configuration_item = Some(configuration_item.clone());
    }
    if let Some(caller_location) = &patch.caller_location {
        updated.caller_location = Some(caller_location.clone());
    }
    if let Some(issue_location) = &patch.issue_location {
        updated.issue_location = Some(issue_location.clone());
    }
    if let Some(preferred_contact) = &patch.preferred_contact {
        updated.preferred_contact = Some(preferred_contact.clone());
    }

    updated.updated_at = now;

    if updated.status == TicketStatus::Resolved && current.status != TicketStatus::Resolved {
        updated.resolved_at = Some(now);
    }
    if updated.status == TicketStatus::Closed && current.status != TicketStatus::Closed {
        updated.closed_at = Some(now);
    }

    let changes = diff_tickets(current, &updated);
    (updated, changes)
}

/// Compare two tickets field by field on their serialized values.
///
/// Engine-derived timestamp fields are skipped; every other mismatch is
/// recorded as `{field: {from, to}}` keyed by wire name.
pub fn diff_tickets(before: &Ticket, after: &Ticket) -> ChangeSet {
    let mut changes = ChangeSet::new();

    let serialized = serde_json::to_value(before)
        .ok()
        .zip(serde_json::to_value(after).ok());
    let Some((serde_json::Value::Object(before_map), serde_json::Value::Object(after_map))) =
        serialized
    else {
        return changes;
    };

    for (field, to) in &after_map {
        if DERIVED_FIELDS.contains(&field.as_str()) {
            continue;
        }
        let from = before_map.get(field).cloned().unwrap_or(serde_json::Value::Null);
        if from != *to {
            changes.insert(field.clone(), FieldChange { from, to: to.clone() });
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk_core::types::{Severity, TicketPriority};

    fn valid_new_ticket() -> NewTicket {
        NewTicket {
            title: Some("Email is down".to_string()),
            category: Some("software".to_string()),
            reported_by_id: Some(4),
            impact: Some(Severity::High),
            urgency: Some(Severity::High),
            ..Default::default()
        }
    }

    #[test]
    fn ticket_number_zero_pads_to_four_digits() {
        assert_eq!(ticket_number(1), "TKT-0001");
        assert_eq!(ticket_number(42), "TKT-0042");
        assert_eq!(ticket_number(12345), "TKT-12345");
    }

    #[test]
    fn validation_accepts_a_complete_payload() {
        assert!(validate_new_ticket(&valid_new_ticket(), |_| true).is_ok());
    }

    #[test]
    fn validation_collects_every_failure() {
        let new = NewTicket {
            title: Some("Hi".to_string()),
            ..Default::default()
        };
        let err = validate_new_ticket(&new, |_| true).unwrap_err();
        let OpsdeskError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["title", "category", "reportedById"]);
    }

    #[test]
    fn validation_rejects_unknown_reporter() {
        let err = validate_new_ticket(&valid_new_ticket(), |_| false).unwrap_err();
        let OpsdeskError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0].field, "reportedById");
    }

    #[test]
    fn build_ticket_stamps_creation_fields() {
        let now = Utc::now();
        let ticket = build_ticket(7, valid_new_ticket(), now);
        assert_eq!(ticket.id, 7);
        assert_eq!(ticket.ticket_number, "TKT-0007");
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.priority, TicketPriority::Medium);
        assert_eq!(ticket.created_at, now);
        assert_eq!(ticket.updated_at, now);
        assert!(ticket.resolved_at.is_none());
        assert!(ticket.closed_at.is_none());
    }

    #[test]
    fn priority_only_update_diffs_exactly_one_field() {
        let created = Utc::now();
        let ticket = build_ticket(1, valid_new_ticket(), created);
        let patch = TicketPatch {
            priority: Some(TicketPriority::Urgent),
            ..Default::default()
        };
        let (updated, changes) = apply_update(&ticket, &patch, Utc::now());

        assert_eq!(updated.priority, TicketPriority::Urgent);
        assert_eq!(changes.len(), 1, "only priority changed: {changes:?}");
        let change = &changes["priority"];
        assert_eq!(change.from, serde_json::json!("medium"));
        assert_eq!(change.to, serde_json::json!("urgent"));
    }

    #[test]
    fn resolving_stamps_resolved_at_once_per_entry() {
        let ticket = build_ticket(1, valid_new_ticket(), Utc::now());

        let resolve = TicketPatch { status: Some(TicketStatus::Resolved), ..Default::default() };
        let (resolved, _) = apply_update(&ticket, &resolve, Utc::now());
        let first_resolved_at = resolved.resolved_at.expect("resolvedAt set");
        assert!(first_resolved_at >= resolved.created_at);

        // A later unrelated update keeps the stamp.
        let retitle = TicketPatch { title: Some("Email is still down".to_string()), ..Default::default() };
        let (retitled, _) = apply_update(&resolved, &retitle, Utc::now());
        assert_eq!(retitled.resolved_at, Some(first_resolved_at));

        // Transitioning away never clears it.
        let reopen = TicketPatch { status: Some(TicketStatus::Open), ..Default::default() };
        let (reopened, _) = apply_update(&retitled, &reopen, Utc::now());
        assert_eq!(reopened.resolved_at, Some(first_resolved_at));

        // Re-entry stamps a fresh value.
        let (resolved_again, _) = apply_update(&reopened, &resolve, Utc::now());
        assert!(resolved_again.resolved_at.expect("still set") >= first_resolved_at);
    }

    #[test]
    fn closing_stamps_closed_at() {
        let ticket = build_ticket(1, valid_new_ticket(), Utc::now());
        let close = TicketPatch { status: Some(TicketStatus::Closed), ..Default::default() };
        let (closed, changes) = apply_update(&ticket, &close, Utc::now());
        assert!(closed.closed_at.expect("closedAt set") >= closed.created_at);
        assert_eq!(changes.len(), 1);
        assert!(changes.contains_key("status"));
    }

    #[test]
    fn updated_at_is_refreshed_even_by_empty_patches() {
        let ticket = build_ticket(1, valid_new_ticket(), Utc::now());
        let later = ticket.updated_at + chrono::Duration::seconds(30);
        let (updated, changes) = apply_update(&ticket, &TicketPatch::default(), later);
        assert_eq!(updated.updated_at, later);
        assert!(changes.is_empty(), "derived timestamps never appear in diffs");
    }

    #[test]
    fn ticket_number_never_changes_across_updates() {
        let ticket = build_ticket(3, valid_new_ticket(), Utc::now());
        let patch = TicketPatch {
            status: Some(TicketStatus::InProgress),
            priority: Some(TicketPriority::High),
            ..Default::default()
        };
        let (updated, _) = apply_update(&ticket, &patch, Utc::now());
        assert_eq!(updated.ticket_number, "TKT-0003");
    }
}
