// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker identity and the worker record.

use crate::lane::Lane;
use crate::shard::ShardId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Unique identifier for a worker instance, typically
    /// `worker-<spec>-<ts>-<pid>`.
    pub struct WorkerId;
}

impl WorkerId {
    /// Build the conventional `worker-<spec>-<ts>-<pid>` id.
    pub fn generate(specialization: Lane, now: DateTime<Utc>, pid: u32) -> Self {
        Self(format!(
            "worker-{}-{}-{}",
            specialization,
            now.timestamp_millis(),
            pid
        ))
    }
}

/// Worker lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Starting,
    Idle,
    Busy,
    Paused,
    Stopping,
    Dead,
    Crashed,
    Stale,
}

impl WorkerStatus {
    /// Workers in these statuses are candidates for the supervisor's
    /// "missing slot" respawn check.
    pub fn is_alive(&self) -> bool {
        matches!(
            self,
            WorkerStatus::Starting | WorkerStatus::Idle | WorkerStatus::Busy | WorkerStatus::Paused
        )
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerStatus::Starting => "starting",
            WorkerStatus::Idle => "idle",
            WorkerStatus::Busy => "busy",
            WorkerStatus::Paused => "paused",
            WorkerStatus::Stopping => "stopping",
            WorkerStatus::Dead => "dead",
            WorkerStatus::Crashed => "crashed",
            WorkerStatus::Stale => "stale",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for WorkerStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "starting" => Ok(WorkerStatus::Starting),
            "idle" => Ok(WorkerStatus::Idle),
            "busy" => Ok(WorkerStatus::Busy),
            "paused" => Ok(WorkerStatus::Paused),
            "stopping" => Ok(WorkerStatus::Stopping),
            "dead" => Ok(WorkerStatus::Dead),
            "crashed" => Ok(WorkerStatus::Crashed),
            "stale" => Ok(WorkerStatus::Stale),
            _ => Err(()),
        }
    }
}

/// A worker's materialized record.
///
/// Invariant: `(specialization, shard)` is the key the supervisor uses to
/// detect a missing slot — at most one live worker should hold a given
/// pair at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub pid: Option<u32>,
    pub status: WorkerStatus,
    pub specialization: Lane,
    pub shard: ShardId,
    pub model: String,
    pub started_at: DateTime<Utc>,
    pub last_heartbeat: DateTime<Utc>,
    pub crash_count: u32,
}

impl Worker {
    pub fn slot(&self) -> (Lane, ShardId) {
        (self.specialization, self.shard.clone())
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
