// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn known_event_type_serializes_as_plain_string() {
    let value = serde_json::to_value(EventType::TaskRecovered).unwrap();
    assert_eq!(value, json!("task_recovered"));
}

#[test]
fn custom_event_type_round_trips() {
    let custom = EventType::Custom("worker_custom_thing".into());
    let value = serde_json::to_value(&custom).unwrap();
    let back: EventType = serde_json::from_value(value).unwrap();
    assert_eq!(back, custom);
}

#[test]
fn display_uses_shouting_snake_case() {
    assert_eq!(EventType::ShardRedistribution.to_string(), "SHARD_REDISTRIBUTION");
}

#[test]
fn with_task_sets_task_id() {
    let event = Event::new(
        EventId::new("e1"),
        EventType::TaskClaimed,
        "worker-impl-1",
        json!({}),
        "trace-1",
        DateTime::UNIX_EPOCH,
    )
    .with_task("task-1");
    assert_eq!(event.task_id.as_deref(), Some("task-1"));
}
