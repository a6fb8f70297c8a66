// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sdlc_core::EventType;
use serde_json::json;
use std::io::Write as _;
use tempfile::tempdir;

fn ts(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap()
}

#[test]
fn append_then_query_round_trips() {
    let dir = tempdir().unwrap();
    let store = EventStore::open(dir.path()).unwrap();

    let id = store
        .append(
            EventType::TaskClaimed,
            Some("task-1".into()),
            "worker-impl-1",
            json!({"lane": "impl"}),
            "trace-1",
            ts(100),
        )
        .unwrap();

    let events = store.query(QueryFilter::default()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, id);
    assert_eq!(events[0].task_id.as_deref(), Some("task-1"));
}

#[test]
fn query_filters_by_time_range_and_type() {
    let dir = tempdir().unwrap();
    let store = EventStore::open(dir.path()).unwrap();

    store
        .append(EventType::TaskClaimed, None, "a", json!({}), "t1", ts(100))
        .unwrap();
    store
        .append(EventType::TaskFailed, None, "a", json!({}), "t2", ts(200))
        .unwrap();
    store
        .append(EventType::TaskClaimed, None, "a", json!({}), "t3", ts(300))
        .unwrap();

    let events = store
        .query(QueryFilter {
            since: Some(ts(150)),
            type_filter: Some("TASK_CLAIMED".into()),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].trace_id, "t3");
}

#[test]
fn time_travel_excludes_events_after_cutoff() {
    let dir = tempdir().unwrap();
    let store = EventStore::open(dir.path()).unwrap();

    store
        .append(EventType::TaskClaimed, None, "a", json!({}), "t1", ts(100))
        .unwrap();
    store
        .append(EventType::TaskFailed, None, "a", json!({}), "t2", ts(500))
        .unwrap();

    let events = store.time_travel(ts(200), None).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].trace_id, "t1");
}

#[test]
fn malformed_line_is_skipped_not_fatal() {
    let dir = tempdir().unwrap();
    let store = EventStore::open(dir.path()).unwrap();

    store
        .append(EventType::TaskClaimed, None, "a", json!({}), "t1", ts(100))
        .unwrap();

    {
        let mut file = OpenOptions::new()
            .append(true)
            .open(dir.path().join("events.jsonl"))
            .unwrap();
        writeln!(file, "{{not valid json").unwrap();
    }

    store
        .append(EventType::TaskFailed, None, "a", json!({}), "t2", ts(200))
        .unwrap();

    let events = store.query(QueryFilter::default()).unwrap();
    assert_eq!(events.len(), 2);
}

#[test]
fn projection_rebuild_folds_event_counts_and_persists() {
    let dir = tempdir().unwrap();
    let store = EventStore::open(dir.path()).unwrap();

    store
        .append(EventType::TaskClaimed, None, "a", json!({}), "t1", ts(100))
        .unwrap();
    store
        .append(EventType::TaskClaimed, None, "a", json!({}), "t2", ts(200))
        .unwrap();
    store
        .append(EventType::TaskFailed, None, "a", json!({}), "t3", ts(300))
        .unwrap();

    let projection = store
        .projection_rebuild(
            "claims_by_type",
            0u64,
            |count, event| {
                if event.event_type == EventType::TaskClaimed {
                    count + 1
                } else {
                    count
                }
            },
            ts(400),
        )
        .unwrap();

    assert_eq!(projection.state, 2);
    assert_eq!(projection.event_count, 3);

    let persisted = dir.path().join("projections/claims_by_type.json");
    assert!(persisted.exists());
}
