// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket, comment, activity, and attachment handlers.
//!
//! Every mutation records an activity entry and broadcasts an event
//! through the hub before the HTTP response is returned.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use opsdesk_core::activity::{ActivityDetails, ActivityLog};
use opsdesk_core::events::{EventAction, ServerEvent};
use opsdesk_core::types::{
    Attachment, AttachmentUpload, Comment, NewComment, NewTicket, Ticket, TicketFilter,
    TicketPatch,
};

use super::{ApiError, ApiJson};
use crate::server::AppState;

/// Fallback attachment uploader when the request carries no user; demo
/// auth always signs in the first seeded user.
const DEFAULT_UPLOADER_ID: i64 = 1;

/// GET /api/tickets
///
/// All supplied filters are ANDed together.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<TicketFilter>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    Ok(Json(state.storage.tickets(&filter).await?))
}

/// Query parameters for GET /api/tickets/recent.
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// GET /api/tickets/recent
pub async fn recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let limit = query.limit.unwrap_or(5);
    Ok(Json(state.storage.recent_tickets(limit).await?))
}

/// GET /api/tickets/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ticket>, ApiError> {
    let ticket = state
        .storage
        .ticket(id)
        .await?
        .ok_or(opsdesk_core::OpsdeskError::not_found("ticket", id))?;
    Ok(Json(ticket))
}

/// POST /api/tickets
pub async fn create(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewTicket>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    let ticket = state.storage.create_ticket(new).await?;

    state
        .storage
        .record_activity(
            ticket.id,
            ticket.reported_by_id,
            ActivityDetails::Created { ticket: Box::new(ticket.clone()) },
        )
        .await?;

    state
        .hub
        .broadcast(&ServerEvent::ticket(EventAction::Create, ticket.clone()));

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// PATCH /api/tickets/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(patch): ApiJson<TicketPatch>,
) -> Result<Json<Ticket>, ApiError> {
    let updated_by = patch.updated_by_id;
    let updated = state
        .storage
        .update_ticket(id, patch)
        .await?
        .ok_or(opsdesk_core::OpsdeskError::not_found("ticket", id))?;

    let actor = updated_by.unwrap_or(updated.ticket.reported_by_id);
    state
        .storage
        .record_activity(id, actor, ActivityDetails::Updated(updated.changes))
        .await?;

    state
        .hub
        .broadcast(&ServerEvent::ticket(EventAction::Update, updated.ticket.clone()));

    Ok(Json(updated.ticket))
}

/// GET /api/tickets/{id}/comments
pub async fn comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    Ok(Json(state.storage.ticket_comments(id).await?))
}

/// POST /api/tickets/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(new): ApiJson<NewComment>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state.storage.create_comment(id, new).await?;

    state
        .storage
        .record_activity(
            id,
            comment.user_id,
            ActivityDetails::Commented { comment: comment.content.clone() },
        )
        .await?;

    state.hub.broadcast(&ServerEvent::comment(comment.clone()));

    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/tickets/{id}/activity
pub async fn activity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ActivityLog>>, ApiError> {
    Ok(Json(state.storage.ticket_activity(id).await?))
}

/// GET /api/tickets/{id}/attachments
pub async fn attachments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Attachment>>, ApiError> {
    Ok(Json(state.storage.ticket_attachments(id).await?))
}

/// POST /api/tickets/{id}/attachments
///
/// The upload itself is mocked: only file metadata is recorded and the
/// stored path is derived from the filename. The parent ticket is
/// re-broadcast so viewers refresh its attachment list.
pub async fn create_attachments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(upload): ApiJson<AttachmentUpload>,
) -> Result<(StatusCode, Json<Vec<Attachment>>), ApiError> {
    if upload.files.is_empty() {
        return Err(ApiError::BadRequest("No files provided".to_string()));
    }

    let user_id = upload.user_id.unwrap_or(DEFAULT_UPLOADER_ID);
    let mut created = Vec::with_capacity(upload.files.len());

    for file in upload.files {
        let attachment = state
            .storage
            .create_attachment(id, file.name, file.file_type, file.size, user_id)
            .await?;

        state
            .storage
            .record_activity(
                id,
                user_id,
                ActivityDetails::AttachedFile { filename: attachment.filename.clone() },
            )
            .await?;

        created.push(attachment);
    }

    if let Some(ticket) = state.storage.ticket(id).await? {
        state
            .hub
            .broadcast(&ServerEvent::ticket(EventAction::Update, ticket));
    }

    Ok((StatusCode::CREATED, Json(created)))
}
