// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sdlc_core::test_support::TaskBuilder;
use sdlc_core::{Lane, WorkerId, WorkerStatus};
use tempfile::tempdir;

async fn harness() -> (Arc<StateStore>, Arc<EventStore>, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let state = Arc::new(StateStore::open_in_memory().await.unwrap());
    let events = Arc::new(EventStore::open(dir.path()).unwrap());
    (state, events, dir)
}

fn worker(id: &str, shard: ShardId, now: DateTime<Utc>) -> Worker {
    Worker {
        id: WorkerId::new(id),
        pid: Some(1),
        status: WorkerStatus::Busy,
        specialization: Lane::Impl,
        shard,
        model: "family_c".into(),
        started_at: now,
        last_heartbeat: now,
        crash_count: 0,
    }
}

#[tokio::test]
async fn orphaned_shard_has_queued_tasks_and_no_live_workers() {
    let (state, events, _dir) = harness().await;
    let now = Utc::now();

    state.insert_task(&TaskBuilder::new("t1").build()).await.unwrap(); // shard-0 by default builder
    let mut t2 = TaskBuilder::new("t2").build();
    t2.shard = ShardId::for_index(1);
    state.insert_task(&t2).await.unwrap();
    state.upsert_worker(&worker("w1", ShardId::for_index(1), now)).await.unwrap();

    let monitor = ShardHealthMonitor::new(state, events, EngineConfig::default());
    let orphaned = monitor.orphaned_shards().await.unwrap();
    assert_eq!(orphaned, vec![ShardId::for_index(0)]);
}

#[tokio::test]
async fn rebalance_evacuates_orphaned_shard_to_healthy_ones() {
    let (state, events, _dir) = harness().await;
    let now = Utc::now();

    for i in 0..7 {
        let mut t = TaskBuilder::new(format!("orphan-{i}")).build();
        t.shard = ShardId::for_index(1);
        state.insert_task(&t).await.unwrap();
    }
    state.upsert_worker(&worker("w0", ShardId::for_index(0), now)).await.unwrap();
    state.upsert_worker(&worker("w2", ShardId::for_index(2), now)).await.unwrap();

    let monitor = ShardHealthMonitor::new(state.clone(), events, EngineConfig::default());
    let report = monitor.rebalance(now).await.unwrap();

    assert_eq!(report.shards_redistributed.len(), 1);
    let (shard, moved) = &report.shards_redistributed[0];
    assert_eq!(*shard, ShardId::for_index(1));
    assert_eq!(*moved, 7);

    let remaining = state.queued_counts_by_shard().await.unwrap();
    assert!(remaining.iter().all(|(s, _)| *s != ShardId::for_index(1)));
}

#[tokio::test]
async fn rebalance_spreads_an_overloaded_healthy_shard_toward_total_over_shard_count() {
    let (state, events, _dir) = harness().await;
    let now = Utc::now();

    for i in 0..10 {
        let mut t = TaskBuilder::new(format!("busy-{i}")).build();
        t.shard = ShardId::for_index(0);
        state.insert_task(&t).await.unwrap();
    }
    state.upsert_worker(&worker("w0", ShardId::for_index(0), now)).await.unwrap();
    state.upsert_worker(&worker("w1", ShardId::for_index(1), now)).await.unwrap();
    state.upsert_worker(&worker("w2", ShardId::for_index(2), now)).await.unwrap();

    let monitor = ShardHealthMonitor::new(state.clone(), events, EngineConfig::default());
    let report = monitor.rebalance(now).await.unwrap();

    assert_eq!(report.shards_redistributed.len(), 1);
    let (shard, moved) = &report.shards_redistributed[0];
    assert_eq!(*shard, ShardId::for_index(0));
    // total=10 over shard_count=3 -> target=3, overflow=10-3=7
    assert_eq!(*moved, 7);

    let remaining = state.queued_counts_by_shard().await.unwrap();
    let shard0 = remaining.iter().find(|(s, _)| *s == ShardId::for_index(0)).map(|(_, n)| *n).unwrap_or(0);
    assert_eq!(shard0, 3);
}

#[tokio::test]
async fn record_heartbeat_marks_shards_with_live_workers_healthy() {
    let (state, events, _dir) = harness().await;
    let now = Utc::now();
    state.upsert_worker(&worker("w0", ShardId::for_index(0), now)).await.unwrap();

    let monitor = ShardHealthMonitor::new(state, events, EngineConfig::default());
    monitor.record_heartbeat(now).await.unwrap();
}
