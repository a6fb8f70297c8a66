// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only event records. See `sdlc-storage::event_store` for the
//! durable log this crate's `Event` type is written into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fmt;

crate::define_id! {
    /// Unique identifier for a single event-log entry.
    pub struct EventId;
}

/// The closed set of event kinds emitted by the orchestrator, plus an
/// open-ended `Custom` escape hatch so call sites never need to touch
/// this enum to log something ad hoc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    TaskClaimed,
    TaskRecovered,
    ZombieRecovery,
    WorkerCrashDetected,
    WorkerRespawned,
    ShardRedistribution,
    PhaseTransition,
    GateFailed,
    GatePassed,
    ArtifactRegistered,
    TaskApproved,
    TaskRejected,
    TaskFailed,
    BreakerStateChanged,
    #[serde(untagged)]
    Custom(String),
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::TaskClaimed => write!(f, "TASK_CLAIMED"),
            EventType::TaskRecovered => write!(f, "TASK_RECOVERED"),
            EventType::ZombieRecovery => write!(f, "ZOMBIE_RECOVERY"),
            EventType::WorkerCrashDetected => write!(f, "WORKER_CRASH_DETECTED"),
            EventType::WorkerRespawned => write!(f, "WORKER_RESPAWNED"),
            EventType::ShardRedistribution => write!(f, "SHARD_REDISTRIBUTION"),
            EventType::PhaseTransition => write!(f, "PHASE_TRANSITION"),
            EventType::GateFailed => write!(f, "GATE_FAILED"),
            EventType::GatePassed => write!(f, "GATE_PASSED"),
            EventType::ArtifactRegistered => write!(f, "ARTIFACT_REGISTERED"),
            EventType::TaskApproved => write!(f, "TASK_APPROVED"),
            EventType::TaskRejected => write!(f, "TASK_REJECTED"),
            EventType::TaskFailed => write!(f, "TASK_FAILED"),
            EventType::BreakerStateChanged => write!(f, "BREAKER_STATE_CHANGED"),
            EventType::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// A single append-only event-log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub task_id: Option<String>,
    pub event_type: EventType,
    pub actor: String,
    pub payload: Json,
    pub trace_id: String,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(
        id: EventId,
        event_type: EventType,
        actor: impl Into<String>,
        payload: Json,
        trace_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id: None,
            event_type,
            actor: actor.into(),
            payload,
            trace_id: trace_id.into(),
            timestamp,
        }
    }

    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
