// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The remote-backend contract. Concrete backend families (the three AI
//! model families tasks are routed to) are external collaborators that
//! implement this trait; this crate only owns the seam and the
//! request/response shapes that cross it.

use async_trait::async_trait;
use sdlc_core::BackendFamily;
use serde_json::Value as Json;
use std::time::Duration;
use thiserror::Error;

/// A single call dispatched to a backend family.
#[derive(Debug, Clone)]
pub struct BackendRequest {
    pub task_id: String,
    pub task_type: String,
    pub prompt: String,
    pub timeout: Duration,
}

/// The backend's raw result, before error classification.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub output: String,
    pub metadata: Json,
}

/// Errors a backend call can fail with. Deliberately a flat string-bearing
/// shape — `sdlc-engine`'s error classifier pattern-matches on `detail` to
/// sort these into the retryable/non-retryable taxonomy from spec.md §4.5,
/// the same way a free-form upstream error message would be classified.
#[derive(Debug, Error, Clone)]
#[error("backend call failed: {detail}")]
pub struct BackendError {
    pub detail: String,
}

impl BackendError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }
}

/// The seam every backend family adapter implements.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    fn family(&self) -> BackendFamily;

    async fn call(&self, request: BackendRequest) -> Result<BackendResponse, BackendError>;
}
