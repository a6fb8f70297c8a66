// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The task record and its state machine.

use crate::lane::Lane;
use crate::phase::Phase;
use crate::shard::ShardId;
use crate::worker::WorkerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fmt;

crate::define_id! {
    /// Unique identifier for a task.
    pub struct TaskId;
}

/// Task priority. Discriminants double as the sort key for the claim
/// protocol's `(priority ASC, created_at ASC)` ordering — `Critical` sorts
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Priority {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Priority {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        write!(f, "{s}")
    }
}

/// The task's coarse lifecycle state, orthogonal to `Phase` (the
/// fine-grained SDLC step within a `RUNNING` task).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Queued,
    Running,
    Approved,
    Rejected,
    Failed,
    Complete,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Queued => "queued",
            TaskState::Running => "running",
            TaskState::Approved => "approved",
            TaskState::Rejected => "rejected",
            TaskState::Failed => "failed",
            TaskState::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

/// A task's free-form type tag, normalized to uppercase at construction so
/// prefix-matching routing rules (`REVIEW*`, `ANALYSIS*`, ...) are
/// case-insensitive at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskType(pub String);

impl TaskType {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The task record.
///
/// Invariants (enforced by the state store's transition function, not by
/// this struct alone):
/// - `state == Running` implies `worker_id.is_some()` and `started_at.is_some()`.
/// - `state == Queued` implies `worker_id.is_none()`.
/// - `retry_count` is monotonically non-decreasing.
/// - phase transitions advance by exactly one step, or move to a terminal phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub task_type: TaskType,
    pub priority: Priority,
    pub state: TaskState,
    pub phase: Phase,
    pub assigned_model: Option<String>,
    pub lane: Lane,
    pub shard: ShardId,
    pub worker_id: Option<WorkerId>,
    pub retry_count: u32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub heartbeat_at: Option<DateTime<Utc>>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub metadata: Json,
    pub trace_id: String,
}

impl Task {
    /// Submitter recorded in metadata, falling back to the trace-ID prefix
    /// convention (`<submitter>:<rest>`) used when metadata omits it.
    /// Absent submitter information resolves to `"unknown"`.
    pub fn submitter(&self) -> String {
        if let Some(s) = self.metadata.get("submitter").and_then(Json::as_str) {
            return s.to_string();
        }
        if let Some(s) = self.metadata.get("user_id").and_then(Json::as_str) {
            return s.to_string();
        }
        if let Some((prefix, _)) = self.trace_id.split_once(':') {
            if !prefix.is_empty() {
                return prefix.to_string();
            }
        }
        "unknown".to_string()
    }

    /// Whether this task's invariants hold given its current fields.
    pub fn invariants_hold(&self) -> bool {
        match self.state {
            TaskState::Running => self.worker_id.is_some() && self.started_at.is_some(),
            TaskState::Queued => self.worker_id.is_none(),
            _ => true,
        }
    }

    /// `Rejected` is excluded: a rejected task re-enters the queue if it
    /// still has retry budget, so it is not a dead end.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            TaskState::Approved | TaskState::Failed | TaskState::Complete
        )
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
