// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge base article handlers (read-only surface).

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use opsdesk_core::OpsdeskError;
use opsdesk_core::types::KbArticle;

use super::ApiError;
use crate::server::AppState;

/// Query parameters for GET /api/kb-articles.
#[derive(Debug, Deserialize)]
pub struct KbQuery {
    #[serde(default)]
    pub published: Option<bool>,
}

/// GET /api/kb-articles
///
/// `?published=true` restricts the listing to published articles; any
/// other value (or no parameter) returns everything.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<KbQuery>,
) -> Result<Json<Vec<KbArticle>>, ApiError> {
    let articles = if query.published == Some(true) {
        state.storage.published_kb_articles().await?
    } else {
        state.storage.kb_articles().await?
    };
    Ok(Json(articles))
}

/// GET /api/kb-articles/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<KbArticle>, ApiError> {
    let article = state
        .storage
        .kb_article(id)
        .await?
        .ok_or(OpsdeskError::not_found("kb article", id))?;
    Ok(Json(article))
}
