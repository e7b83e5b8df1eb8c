// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard report handlers.

use axum::{Json, extract::State};

use opsdesk_core::reports::{
    DashboardMetrics, PriorityDistribution, StatusBreakdown, TeamPerformance,
};

use super::ApiError;
use crate::server::AppState;

/// GET /api/dashboard/metrics
pub async fn metrics(State(state): State<AppState>) -> Result<Json<DashboardMetrics>, ApiError> {
    Ok(Json(state.storage.dashboard_metrics().await?))
}

/// GET /api/dashboard/team-performance
pub async fn team_performance(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamPerformance>>, ApiError> {
    Ok(Json(state.storage.team_performance().await?))
}

/// GET /api/dashboard/status-breakdown
pub async fn status_breakdown(
    State(state): State<AppState>,
) -> Result<Json<Vec<StatusBreakdown>>, ApiError> {
    Ok(Json(state.storage.status_breakdown().await?))
}

/// GET /api/dashboard/priority-distribution
pub async fn priority_distribution(
    State(state): State<AppState>,
) -> Result<Json<Vec<PriorityDistribution>>, ApiError> {
    Ok(Json(state.storage.priority_distribution().await?))
}
