// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage backend for the Opsdesk helpdesk.
//!
//! Implements the `opsdesk-core` `Storage` trait over locked maps, the
//! ticket lifecycle engine, the append-only activity logger, dashboard
//! metric queries, and the demo seed dataset.

pub mod lifecycle;
pub mod memory;
pub mod metrics;
pub mod seed;

pub use memory::MemStorage;
pub use seed::seed_demo_data;
