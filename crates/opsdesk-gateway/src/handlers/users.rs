// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User account handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use opsdesk_core::OpsdeskError;
use opsdesk_core::types::{NewUser, User, UserPatch};

use super::{ApiError, ApiJson};
use crate::server::AppState;

/// GET /api/users
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.storage.users().await?))
}

/// GET /api/users/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .storage
        .user(id)
        .await?
        .ok_or(OpsdeskError::not_found("user", id))?;
    Ok(Json(user))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.storage.create_user(new).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PATCH /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .storage
        .update_user(id, patch)
        .await?
        .ok_or(OpsdeskError::not_found("user", id))?;
    Ok(Json(user))
}
