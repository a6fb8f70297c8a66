// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

fn request(task_id: &str) -> BackendRequest {
    BackendRequest {
        task_id: task_id.into(),
        task_type: "IMPLEMENT".into(),
        prompt: "do the thing".into(),
        timeout: Duration::from_secs(30),
    }
}

#[tokio::test]
async fn scripted_responses_drain_in_fifo_order() {
    let adapter = FakeBackendAdapter::new(BackendFamily::FamilyA);
    adapter.push_success("first");
    adapter.push_failure("boom");

    let first = adapter.call(request("t1")).await.unwrap();
    assert_eq!(first.output, "first");

    let second = adapter.call(request("t2")).await;
    assert!(second.is_err());
}

#[tokio::test]
async fn calls_are_recorded() {
    let adapter = FakeBackendAdapter::new(BackendFamily::FamilyB);
    adapter.push_success("ok");
    adapter.call(request("t1")).await.unwrap();

    let calls = adapter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].task_id, "t1");
    assert_eq!(adapter.call_count(), 1);
}

#[tokio::test]
async fn empty_queue_returns_empty_success() {
    let adapter = FakeBackendAdapter::new(BackendFamily::FamilyC);
    let response = adapter.call(request("t1")).await.unwrap();
    assert_eq!(response.output, "");
}
