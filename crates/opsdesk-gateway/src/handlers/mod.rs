// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the `/api` REST surface.
//!
//! Submodules group handlers by resource; this module holds the shared
//! error-to-HTTP mapping and the JSON body extractor.

pub mod dashboard;
pub mod kb;
pub mod tickets;
pub mod users;

use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use opsdesk_core::error::OpsdeskError;

/// Error response body for non-validation failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Handler-facing error type mapping domain errors onto HTTP statuses.
///
/// - `Validation` -> 400 with the per-field error list
/// - `NotFound` -> 404
/// - everything else -> 500 with a generic message (details are logged,
///   never leaked)
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request body or parameters.
    BadRequest(String),
    /// A domain error from the store or lifecycle engine.
    Domain(OpsdeskError),
}

impl From<OpsdeskError> for ApiError {
    fn from(err: OpsdeskError) -> Self {
        ApiError::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse { error: message }),
            )
                .into_response(),
            ApiError::Domain(OpsdeskError::Validation(errors)) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": errors })),
            )
                .into_response(),
            ApiError::Domain(OpsdeskError::NotFound { entity, .. }) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse { error: format!("{entity} not found") }),
            )
                .into_response(),
            ApiError::Domain(err) => {
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { error: "internal server error".to_string() }),
                )
                    .into_response()
            }
        }
    }
}

/// JSON body extractor that reports malformed bodies as 400 rather than
/// axum's default 422.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}
