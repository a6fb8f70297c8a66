// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker heartbeats: the "connection alive" signal, distinct from the
//! "work progressing" activity tick.

use crate::task::TaskId;
use crate::worker::{WorkerId, WorkerStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A worker's latest heartbeat row. 1:1 with the current session; upserted
/// on every heartbeat tick and touched separately on activity ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerHeartbeat {
    pub worker_id: WorkerId,
    pub timestamp: DateTime<Utc>,
    pub status: WorkerStatus,
    pub task_id: Option<TaskId>,
    pub task_type: Option<String>,
    pub progress_percent: Option<u8>,
    pub expected_timeout_seconds: Option<u64>,
    pub last_activity_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkerHeartbeat {
    /// A fresh heartbeat row for a worker that just started, not yet
    /// carrying a task.
    pub fn starting(worker_id: WorkerId, now: DateTime<Utc>) -> Self {
        Self {
            worker_id,
            timestamp: now,
            status: WorkerStatus::Starting,
            task_id: None,
            task_type: None,
            progress_percent: None,
            expected_timeout_seconds: None,
            last_activity_at: now,
            updated_at: now,
        }
    }

    /// Record an activity tick without changing the reported progress —
    /// used to distinguish "live but slow" from "hung".
    pub fn touch_activity(&mut self, now: DateTime<Utc>) {
        self.last_activity_at = now;
        self.updated_at = now;
    }
}
