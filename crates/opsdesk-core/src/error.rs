// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Opsdesk helpdesk service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field, in wire (camelCase) form.
    pub field: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl FieldError {
    /// Create a field error for `field` with the given message.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The primary error type used across all Opsdesk crates.
#[derive(Debug, Error)]
pub enum OpsdeskError {
    /// Schema rejection on create/update. Carries per-field messages and
    /// surfaces as HTTP 400.
    #[error("validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// A referenced entity does not exist. Surfaces as HTTP 404.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Real-time channel errors (bind failure, transport failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid TOML, failed validation).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors. Surfaces as a generic HTTP 500.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OpsdeskError {
    /// Shorthand for a single-field validation error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Shorthand for a not-found error.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_all_fields() {
        let err = OpsdeskError::Validation(vec![
            FieldError::new("title", "must be at least 5 characters"),
            FieldError::new("category", "is required"),
        ]);
        let rendered = err.to_string();
        assert!(rendered.contains("title: must be at least 5 characters"));
        assert!(rendered.contains("category: is required"));
    }

    #[test]
    fn not_found_names_entity_and_id() {
        let err = OpsdeskError::not_found("ticket", 42);
        assert_eq!(err.to_string(), "ticket 42 not found");
    }

    #[test]
    fn field_error_serializes_to_wire_shape() {
        let err = FieldError::new("reportedById", "must reference an existing user");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["field"], "reportedById");
        assert_eq!(json["message"], "must reference an existing user");
    }
}
