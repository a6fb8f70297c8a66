// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sdlc-storage: the durable substrate for the orchestrator — an
//! append-only event log, a SQL-backed current-state projection, a
//! file-based breaker-state store, and the pending-sync reconciliation
//! marker directory.

mod breaker_store;
mod event_store;
mod pending_sync;
mod schema;
mod state_store;

pub use breaker_store::{BreakerStore, BreakerStoreError};
pub use event_store::{EventStore, EventStoreError, Projection, QueryFilter};
pub use pending_sync::{PendingSync, PendingSyncError, PendingSyncStore};
pub use state_store::{StateStore, StateStoreError};
