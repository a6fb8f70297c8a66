// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn generate_embeds_specialization_timestamp_and_pid() {
    let now = DateTime::UNIX_EPOCH + chrono::Duration::seconds(42);
    let id = WorkerId::generate(Lane::Review, now, 777);
    assert!(id.as_str().starts_with("worker-review-"));
    assert!(id.as_str().ends_with("-777"));
}

#[test]
fn alive_statuses() {
    assert!(WorkerStatus::Idle.is_alive());
    assert!(WorkerStatus::Busy.is_alive());
    assert!(!WorkerStatus::Dead.is_alive());
    assert!(!WorkerStatus::Crashed.is_alive());
}

#[test]
fn slot_pairs_specialization_with_shard() {
    let worker = Worker {
        id: WorkerId::new("worker-impl-1-1"),
        pid: Some(1),
        status: WorkerStatus::Idle,
        specialization: Lane::Impl,
        shard: ShardId::for_index(0),
        model: "family_c".into(),
        started_at: DateTime::UNIX_EPOCH,
        last_heartbeat: DateTime::UNIX_EPOCH,
        crash_count: 0,
    };
    assert_eq!(worker.slot(), (Lane::Impl, ShardId::for_index(0)));
}
