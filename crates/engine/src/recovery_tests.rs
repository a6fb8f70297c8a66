// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sdlc_core::test_support::TaskBuilder;
use sdlc_core::{Lane, ShardId, TaskState};
use tempfile::tempdir;

async fn harness() -> (Arc<StateStore>, Arc<EventStore>, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let state = Arc::new(StateStore::open_in_memory().await.unwrap());
    let events = Arc::new(EventStore::open(dir.path()).unwrap());
    (state, events, dir)
}

fn worker(id: &str, now: DateTime<Utc>) -> Worker {
    Worker {
        id: sdlc_core::WorkerId::new(id),
        pid: Some(999_999_999), // unlikely to be a live PID in test environments
        status: WorkerStatus::Busy,
        specialization: Lane::Impl,
        shard: ShardId::for_index(0),
        model: "family_c".into(),
        started_at: now,
        last_heartbeat: now,
        crash_count: 0,
    }
}

#[tokio::test]
async fn stale_task_with_dead_worker_is_requeued() {
    let (state, events, _dir) = harness().await;
    let t0 = Utc::now() - chrono::Duration::seconds(2000);

    let w = worker("w1", t0);
    state.upsert_worker(&w).await.unwrap();

    let mut task = TaskBuilder::new("t1").task_type("IMPLEMENT").state(TaskState::Running).build();
    task.worker_id = Some(w.id.clone());
    task.started_at = Some(t0);
    task.heartbeat_at = Some(t0);
    task.last_activity_at = Some(t0);
    state.insert_task(&task).await.unwrap();

    let now = Utc::now();
    let loop_ = RecoveryLoop::new(state.clone(), events, EngineConfig::default());
    let report = loop_.run_once(now).await.unwrap();

    assert_eq!(report.stale_recovered, 1);
    let reloaded = state.get_task(&task.id).await.unwrap().unwrap();
    assert_eq!(reloaded.state, TaskState::Queued);
    assert_eq!(reloaded.retry_count, 1);
}

#[tokio::test]
async fn fresh_task_is_left_alone() {
    let (state, events, _dir) = harness().await;
    let now = Utc::now();

    let w = worker("w1", now);
    state.upsert_worker(&w).await.unwrap();

    let mut task = TaskBuilder::new("t1").task_type("IMPLEMENT").state(TaskState::Running).build();
    task.worker_id = Some(w.id.clone());
    task.started_at = Some(now);
    task.heartbeat_at = Some(now);
    task.last_activity_at = Some(now);
    state.insert_task(&task).await.unwrap();

    let loop_ = RecoveryLoop::new(state.clone(), events, EngineConfig::default());
    let report = loop_.run_once(now).await.unwrap();

    assert_eq!(report.stale_recovered, 0);
    let reloaded = state.get_task(&task.id).await.unwrap().unwrap();
    assert_eq!(reloaded.state, TaskState::Running);
}

#[tokio::test]
async fn zombie_task_requeued_when_worker_heartbeat_far_stale() {
    let (state, events, _dir) = harness().await;
    let now = Utc::now();
    let stale_heartbeat = now - chrono::Duration::minutes(31);

    let w = worker("w1", stale_heartbeat);
    state.upsert_worker(&w).await.unwrap();

    let mut task = TaskBuilder::new("t1").task_type("IMPLEMENT").state(TaskState::Running).build();
    task.worker_id = Some(w.id.clone());
    task.started_at = Some(now);
    task.heartbeat_at = Some(now);
    task.last_activity_at = Some(now);
    state.insert_task(&task).await.unwrap();

    let mut cfg = EngineConfig::default();
    cfg.worker_stale_heartbeat_minutes = 30;
    let loop_ = RecoveryLoop::new(state.clone(), events, cfg);
    let report = loop_.run_once(now).await.unwrap();

    assert_eq!(report.zombies_recovered, 1);
}

#[tokio::test]
async fn crashed_worker_past_grace_is_marked_dead() {
    let (state, events, _dir) = harness().await;
    let now = Utc::now();
    // Default expected timeout for IMPLEMENT is 900s; grace 1.5x = 1350s.
    let ancient_heartbeat = now - chrono::Duration::seconds(1400);

    let w = worker("w1", ancient_heartbeat);
    state.upsert_worker(&w).await.unwrap();

    let mut task = TaskBuilder::new("t1").task_type("IMPLEMENT").state(TaskState::Running).build();
    task.worker_id = Some(w.id.clone());
    task.started_at = Some(ancient_heartbeat);
    task.heartbeat_at = Some(now);
    task.last_activity_at = Some(now);
    state.insert_task(&task).await.unwrap();

    let loop_ = RecoveryLoop::new(state.clone(), events, EngineConfig::default());
    let report = loop_.run_once(now).await.unwrap();

    assert_eq!(report.workers_marked_dead, 1);
    let reloaded_worker = state.get_worker(&w.id).await.unwrap().unwrap();
    assert_eq!(reloaded_worker.status, WorkerStatus::Dead);
}
