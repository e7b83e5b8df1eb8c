// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Opsdesk helpdesk service.
//!
//! Provides the error taxonomy, domain model types, activity log union,
//! broadcast event envelopes, dashboard report types, and the `Storage`
//! trait implemented by backing stores.

pub mod activity;
pub mod error;
pub mod events;
pub mod reports;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use activity::{ActivityDetails, ActivityLog, ChangeSet, FieldChange};
pub use error::{FieldError, OpsdeskError};
pub use events::{EventAction, ServerEvent};
pub use traits::{Storage, UpdatedTicket};
pub use types::{
    Severity, Ticket, TicketPriority, TicketStatus, UserRole, priority_for,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct() {
        let _validation = OpsdeskError::invalid("title", "too short");
        let _not_found = OpsdeskError::not_found("ticket", 1);
        let _channel = OpsdeskError::Channel {
            message: "bind failed".into(),
            source: None,
        };
        let _config = OpsdeskError::Config("bad toml".into());
        let _internal = OpsdeskError::Internal("unexpected".into());
    }

    #[test]
    fn storage_trait_is_object_safe() {
        fn _assert(_: &dyn Storage) {}
    }
}
