// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The recovery daemon's per-cycle scans: stale tasks, zombie tasks,
//! crashed workers. All three end in the same requeue procedure, and all
//! emit an event so the recovery projection can be audited.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::lifecycle::{heartbeat_timeout_for_task_type, pid_reachable};
use chrono::{DateTime, Utc};
use sdlc_core::{EventType, Task, Worker, WorkerStatus};
use sdlc_storage::{EventStore, StateStore};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default, Clone, Copy)]
pub struct RecoveryReport {
    pub stale_recovered: u32,
    pub zombies_recovered: u32,
    pub workers_marked_dead: u32,
}

pub struct RecoveryLoop {
    state: Arc<StateStore>,
    events: Arc<EventStore>,
    config: EngineConfig,
}

impl RecoveryLoop {
    pub fn new(state: Arc<StateStore>, events: Arc<EventStore>, config: EngineConfig) -> Self {
        Self { state, events, config }
    }

    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<RecoveryReport, EngineError> {
        let mut report = RecoveryReport::default();
        self.stale_task_scan(now, &mut report).await?;
        self.zombie_task_scan(now, &mut report).await?;
        self.crashed_worker_scan(now, &mut report).await?;
        Ok(report)
    }

    /// spec.md §4.6.1: compute `task_age` from the freshest of
    /// last_activity_at/heartbeat_at/started_at; mark stale if it exceeds
    /// the task-type-derived timeout, unless the worker still looks alive.
    async fn stale_task_scan(&self, now: DateTime<Utc>, report: &mut RecoveryReport) -> Result<(), EngineError> {
        for task in self.state.running_tasks().await? {
            let effective_timeout = heartbeat_timeout_for_task_type(task.task_type.as_str());
            let freshest = [task.last_activity_at, task.heartbeat_at, task.started_at]
                .into_iter()
                .flatten()
                .max()
                .unwrap_or(task.created_at);
            let age = now - freshest;
            if age <= effective_timeout {
                continue;
            }

            if let Some(worker_id) = &task.worker_id {
                if let Some(worker) = self.state.get_worker(worker_id).await? {
                    let worker_alive = worker.pid.map(pid_reachable).unwrap_or(false)
                        || now - worker.last_heartbeat < effective_timeout;
                    if worker_alive {
                        continue;
                    }
                    self.requeue(&task, worker_id, now, EventType::TaskRecovered).await?;
                    report.stale_recovered += 1;
                }
            }
        }
        Ok(())
    }

    /// spec.md §4.6.2: requeue any RUNNING task whose worker's last
    /// heartbeat predates `now - timeout_minutes`.
    async fn zombie_task_scan(&self, now: DateTime<Utc>, report: &mut RecoveryReport) -> Result<(), EngineError> {
        let timeout = chrono::Duration::minutes(self.config.worker_stale_heartbeat_minutes.max(30));
        for task in self.state.running_tasks().await? {
            let Some(worker_id) = &task.worker_id else { continue };
            let Some(worker) = self.state.get_worker(worker_id).await? else { continue };
            if now - worker.last_heartbeat >= timeout {
                self.requeue(&task, worker_id, now, EventType::ZombieRecovery).await?;
                report.zombies_recovered += 1;
            }
        }
        Ok(())
    }

    /// spec.md §4.6.3: a non-terminal worker whose heartbeat age exceeds
    /// `expected_timeout * grace_multiplier` is marked dead; any task it
    /// still holds is requeued alongside it.
    async fn crashed_worker_scan(&self, now: DateTime<Utc>, report: &mut RecoveryReport) -> Result<(), EngineError> {
        let running = self.state.running_tasks().await?;

        for worker in self.state.all_workers().await? {
            if matches!(worker.status, WorkerStatus::Dead | WorkerStatus::Stopping) {
                continue;
            }
            let current_task = running.iter().find(|t| t.worker_id.as_ref() == Some(&worker.id));
            let expected = current_task
                .map(|t| heartbeat_timeout_for_task_type(t.task_type.as_str()))
                .unwrap_or_else(|| chrono::Duration::seconds(900));
            let grace = chrono::Duration::milliseconds(
                (expected.num_milliseconds() as f64 * self.config.worker_stale_grace_multiplier) as i64,
            );
            if now - worker.last_heartbeat <= grace {
                continue;
            }

            self.mark_dead(&worker, now).await?;
            report.workers_marked_dead += 1;

            if let Some(task) = current_task {
                self.requeue(task, &worker.id, now, EventType::WorkerCrashDetected).await?;
            }
        }
        Ok(())
    }

    async fn requeue(
        &self,
        task: &Task,
        worker_id: &sdlc_core::WorkerId,
        now: DateTime<Utc>,
        event_type: EventType,
    ) -> Result<(), EngineError> {
        self.state.requeue_task(&task.id, worker_id, now).await?;
        self.events.append(
            event_type,
            Some(task.id.as_str().to_string()),
            "recovery-daemon",
            json!({ "worker_id": worker_id.as_str(), "retry_count": task.retry_count + 1 }),
            task.trace_id.clone(),
            now,
        )?;
        info!(task_id = %task.id, %worker_id, "task recovered");
        Ok(())
    }

    async fn mark_dead(&self, worker: &Worker, now: DateTime<Utc>) -> Result<(), EngineError> {
        let mut updated = worker.clone();
        updated.status = WorkerStatus::Dead;
        updated.last_heartbeat = now;
        updated.crash_count += 1;
        self.state.upsert_worker(&updated).await?;
        self.events.append(
            EventType::WorkerCrashDetected,
            None,
            "recovery-daemon",
            json!({ "worker_id": worker.id.as_str() }),
            "recovery",
            now,
        )?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
