// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions implemented by backing stores.

pub mod storage;

pub use storage::{Storage, UpdatedTicket};
