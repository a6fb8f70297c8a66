// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the daemon binary and supervisor loop.

use sdlc_engine::EngineError;
use sdlc_storage::{EventStoreError, StateStoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("could not determine state directory")]
    NoStateDir,
    #[error("failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("state store: {0}")]
    State(#[from] StateStoreError),
    #[error("event store: {0}")]
    Event(#[from] EventStoreError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
}
