// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only builders shared across crates (enabled via the `test-support`
//! feature, mirroring the teacher's `oj-core` convention).

use crate::lane::Lane;
use crate::phase::Phase;
use crate::shard::ShardId;
use crate::task::{Priority, Task, TaskId, TaskState, TaskType};
use chrono::{DateTime, Utc};
use serde_json::json;

/// A minimally-valid `Task` for tests, overridable via the builder methods.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        let now = DateTime::UNIX_EPOCH;
        Self {
            task: Task {
                id: TaskId::new(id.into()),
                task_type: TaskType::new("IMPLEMENT"),
                priority: Priority::Medium,
                state: TaskState::Queued,
                phase: Phase::Brainstorm,
                assigned_model: None,
                lane: Lane::Impl,
                shard: ShardId::for_index(0),
                worker_id: None,
                retry_count: 0,
                created_at: now,
                started_at: None,
                heartbeat_at: None,
                last_activity_at: None,
                updated_at: now,
                metadata: json!({}),
                trace_id: "trace-test".into(),
            },
        }
    }

    pub fn task_type(mut self, t: impl AsRef<str>) -> Self {
        self.task.task_type = TaskType::new(t);
        self
    }

    pub fn priority(mut self, p: Priority) -> Self {
        self.task.priority = p;
        self
    }

    pub fn state(mut self, s: TaskState) -> Self {
        self.task.state = s;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.task.created_at = at;
        self
    }

    pub fn submitter(mut self, name: impl Into<String>) -> Self {
        self.task.metadata = json!({ "submitter": name.into() });
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}
