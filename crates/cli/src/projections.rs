// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named projections the `events rebuild` command can fold the log into.
//!
//! `EventStore::projection_rebuild` takes an arbitrary fold; this module
//! is the small registry of named folds the CLI exposes, mirroring how
//! the teacher's daemon exposes a handful of named materialized views
//! over its own event log rather than an open-ended query language.

use chrono::{DateTime, Utc};
use sdlc_core::Event;
use sdlc_storage::{EventStore, EventStoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EventTypeCounts {
    pub counts: HashMap<String, u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskActivity {
    /// Most recent event type observed for each task id.
    pub last_event: HashMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("unknown projection name: {0} (expected one of: event_type_counts, task_activity)")]
    UnknownName(String),
    #[error(transparent)]
    Store(#[from] EventStoreError),
}

/// Rebuild the named projection and persist it, returning event_count and
/// rebuilt_at for the caller to report.
pub fn rebuild(events: &EventStore, name: &str, now: DateTime<Utc>) -> Result<String, ProjectionError> {
    match name {
        "event_type_counts" => {
            let projection = events.projection_rebuild(name, EventTypeCounts::default(), fold_event_type_counts, now)?;
            Ok(serde_json::to_string_pretty(&projection).unwrap_or_default())
        }
        "task_activity" => {
            let projection = events.projection_rebuild(name, TaskActivity::default(), fold_task_activity, now)?;
            Ok(serde_json::to_string_pretty(&projection).unwrap_or_default())
        }
        other => Err(ProjectionError::UnknownName(other.to_string())),
    }
}

fn fold_event_type_counts(mut state: EventTypeCounts, event: &Event) -> EventTypeCounts {
    *state.counts.entry(event.event_type.to_string()).or_insert(0) += 1;
    state
}

fn fold_task_activity(mut state: TaskActivity, event: &Event) -> TaskActivity {
    if let Some(task_id) = &event.task_id {
        state.last_event.insert(task_id.clone(), event.event_type.to_string());
    }
    state
}

#[cfg(test)]
#[path = "projections_tests.rs"]
mod tests;
