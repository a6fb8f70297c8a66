// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake backend adapter for deterministic testing — records every call
//! and lets the test program script responses/failures in advance.

use crate::backend::{BackendAdapter, BackendError, BackendRequest, BackendResponse};
use async_trait::async_trait;
use parking_lot::Mutex;
use sdlc_core::BackendFamily;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Arc;

/// A single recorded call to [`FakeBackendAdapter`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub task_id: String,
    pub prompt: String,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<RecordedCall>,
    scripted: VecDeque<Result<BackendResponse, BackendError>>,
}

/// Scriptable stand-in for a real backend, used by the circuit-breaker and
/// fallback-chain tests.
#[derive(Clone)]
pub struct FakeBackendAdapter {
    family: BackendFamily,
    inner: Arc<Mutex<FakeState>>,
}

impl FakeBackendAdapter {
    pub fn new(family: BackendFamily) -> Self {
        Self {
            family,
            inner: Arc::new(Mutex::new(FakeState::default())),
        }
    }

    /// Queue a response (or error) to return on the next `call`. FIFO —
    /// calls drain the queue in the order they were pushed.
    pub fn push_response(&self, response: Result<BackendResponse, BackendError>) {
        self.inner.lock().scripted.push_back(response);
    }

    pub fn push_success(&self, output: impl Into<String>) {
        self.push_response(Ok(BackendResponse {
            output: output.into(),
            metadata: json!({}),
        }));
    }

    pub fn push_failure(&self, detail: impl Into<String>) {
        self.push_response(Err(BackendError::new(detail)));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().calls.len()
    }
}

#[async_trait]
impl BackendAdapter for FakeBackendAdapter {
    fn family(&self) -> BackendFamily {
        self.family
    }

    async fn call(&self, request: BackendRequest) -> Result<BackendResponse, BackendError> {
        let mut inner = self.inner.lock();
        inner.calls.push(RecordedCall {
            task_id: request.task_id,
            prompt: request.prompt,
        });
        inner
            .scripted
            .pop_front()
            .unwrap_or_else(|| Ok(BackendResponse { output: String::new(), metadata: json!({}) }))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
