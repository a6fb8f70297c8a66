// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine crate.

use sdlc_adapters::{BackendError, PathGuardError};
use sdlc_storage::{BreakerStoreError, EventStoreError, StateStoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("state store: {0}")]
    State(#[from] StateStoreError),
    #[error("event store: {0}")]
    Event(#[from] EventStoreError),
    #[error("breaker store: {0}")]
    Breaker(#[from] BreakerStoreError),
    #[error("backend call failed: {0}")]
    Backend(#[from] BackendError),
    #[error("path guard: {0}")]
    PathGuard(#[from] PathGuardError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("all backends in the fallback chain denied or failed for task {task_id}")]
    FallbackExhausted { task_id: String },
    #[error("task {task_id} exceeded its retry budget ({budget})")]
    RetryBudgetExceeded { task_id: String, budget: u32 },
    #[error("config value below hardcoded floor: {field} = {value}, floor = {floor}")]
    ConfigBelowFloor {
        field: &'static str,
        value: f64,
        floor: f64,
    },
    #[error("phase gate failed for task {task_id} phase {phase}: {reasons:?}")]
    GateRefused {
        task_id: String,
        phase: &'static str,
        reasons: Vec<String>,
    },
}
