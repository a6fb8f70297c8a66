// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sdlc_core::test_support::TaskBuilder;
use sdlc_core::{FakeClock, Priority, ShardId, TaskState};
use sdlc_storage::StateStore;

async fn store_with_tasks(tasks: &[sdlc_core::Task]) -> Arc<StateStore> {
    let store = Arc::new(StateStore::open_in_memory().await.unwrap());
    for t in tasks {
        store.insert_task(t).await.unwrap();
    }
    store
}

#[tokio::test]
async fn claims_highest_priority_candidate_first() {
    let low = TaskBuilder::new("low").priority(Priority::Low).build();
    let critical = TaskBuilder::new("critical").priority(Priority::Critical).build();
    let store = store_with_tasks(&[low, critical]).await;

    let svc = ClaimService::new(store, EngineConfig::default(), FakeClock::default());
    let claimed = svc
        .try_claim(
            &WorkerId::new("w1"),
            ClaimFilter { shard: None, lane: None, model: None },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(claimed.id.as_str(), "critical");
}

#[tokio::test]
async fn worker_at_concurrency_cap_gets_no_task() {
    let task = TaskBuilder::new("t1").state(TaskState::Running).build();
    let store = Arc::new(StateStore::open_in_memory().await.unwrap());
    let mut running_task = task;
    running_task.worker_id = Some(WorkerId::new("w1"));
    store.insert_task(&running_task).await.unwrap();

    let mut cfg = EngineConfig::default();
    cfg.max_concurrent_tasks_per_worker = 1;
    cfg.anti_starvation_backoff_secs = 0;

    let svc = ClaimService::new(store, cfg, FakeClock::default());
    let result = svc
        .try_claim(
            &WorkerId::new("w1"),
            ClaimFilter { shard: None, lane: None, model: None },
        )
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn submitter_at_user_limit_is_skipped_in_favor_of_another_user() {
    let mut cfg = EngineConfig::default();
    cfg.max_running_tasks_per_user = 1;

    let store = Arc::new(StateStore::open_in_memory().await.unwrap());
    let mut bob_running = TaskBuilder::new("bob-running")
        .state(TaskState::Running)
        .submitter("bob")
        .build();
    bob_running.worker_id = Some(WorkerId::new("w0"));
    store.insert_task(&bob_running).await.unwrap();
    store
        .insert_task(&TaskBuilder::new("bob-queued").submitter("bob").build())
        .await
        .unwrap();
    store
        .insert_task(&TaskBuilder::new("alice-queued").submitter("alice").build())
        .await
        .unwrap();

    let svc = ClaimService::new(store, cfg, FakeClock::default());
    let claimed = svc
        .try_claim(
            &WorkerId::new("w1"),
            ClaimFilter { shard: None, lane: None, model: None },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(claimed.id.as_str(), "alice-queued");
}

#[tokio::test]
async fn shard_filter_excludes_other_shards() {
    let store = store_with_tasks(&[TaskBuilder::new("t1").build()]).await;
    let svc = ClaimService::new(store, EngineConfig::default(), FakeClock::default());
    let other_shard = ShardId::for_index(9);
    let result = svc
        .try_claim(
            &WorkerId::new("w1"),
            ClaimFilter { shard: Some(&other_shard), lane: None, model: None },
        )
        .await
        .unwrap();
    assert!(result.is_none());
}
