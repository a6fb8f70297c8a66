// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker process's own loop (spec.md §3.3): claim-task →
//! execute-through-phases → heartbeat → emit artifacts → submit for
//! approval → next. One `WorkerRunner` owns exactly one `(lane, shard)`
//! slot for the lifetime of its OS process.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::gates::{GateCommand, GateRunner};
use crate::approval::{ApprovalOutcome, Approver};
use crate::phase_engine::PhaseEngine;
use crate::queue::{ClaimFilter, ClaimService};
use chrono::{DateTime, Utc};
use sdlc_adapters::PathGuard;
use sdlc_core::{Clock, Lane, Phase, ShardId, Task, TaskState, WorkerHeartbeat, WorkerId, WorkerStatus};
use sdlc_storage::{EventStore, StateStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a single `run_cycle` call, driving the caller's sleep decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A task was claimed and driven to its next suspension point; the
    /// caller should poll again immediately rather than sleeping.
    Claimed,
    /// Nothing was eligible to claim; the caller should sleep before
    /// the next attempt.
    Idle,
}

pub struct WorkerRunner<C: Clock> {
    worker_id: WorkerId,
    lane: Lane,
    shard: ShardId,
    state: Arc<StateStore>,
    claim: ClaimService<C>,
    phase_engine: PhaseEngine,
    approver: Approver,
    path_guard: Arc<PathGuard>,
    gate_commands: Vec<GateCommand>,
    workspace_root: PathBuf,
    config: EngineConfig,
    clock: C,
}

impl<C: Clock> WorkerRunner<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        worker_id: WorkerId,
        lane: Lane,
        shard: ShardId,
        state: Arc<StateStore>,
        events: Arc<EventStore>,
        path_guard: Arc<PathGuard>,
        gate_commands: Vec<GateCommand>,
        workspace_root: impl Into<PathBuf>,
        config: EngineConfig,
        clock: C,
    ) -> Self
    where
        C: Clone,
    {
        let phase_engine = PhaseEngine::new(state.clone(), config.clone());
        let claim = ClaimService::new(state.clone(), config.clone(), clock.clone());
        let inbox = workspace_root.into();
        let approver = Approver::new(state.clone(), events, config.clone(), inbox.join("_inbox"));
        Self {
            worker_id,
            lane,
            shard,
            state,
            claim,
            phase_engine,
            approver,
            path_guard,
            gate_commands,
            workspace_root: inbox,
            config,
            clock,
        }
    }

    /// One claim-execute-heartbeat cycle.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, EngineError> {
        let now = self.clock.now();
        let filter = ClaimFilter { shard: Some(&self.shard), lane: Some(self.lane), model: None };
        let Some(task) = self.claim.try_claim(&self.worker_id, filter).await? else {
            return Ok(CycleOutcome::Idle);
        };

        info!(task_id = %task.id, worker_id = %self.worker_id, "claimed task");
        self.heartbeat(&task, now).await?;

        if let Err(e) = self.drive_phases(task.clone()).await {
            warn!(task_id = %task.id, error = %e, "worker failed driving task through phases");
            return Err(e);
        }
        Ok(CycleOutcome::Claimed)
    }

    /// Updates both the fine-grained heartbeat row (consulted by the
    /// three-probe liveness check) and the worker's own record (consulted
    /// by the supervisor's slot-occupancy check and the recovery loop's
    /// crashed-worker scan), so both stay in agreement about this
    /// worker's last-seen time.
    async fn heartbeat(&self, task: &Task, now: DateTime<Utc>) -> Result<(), EngineError> {
        let mut hb = WorkerHeartbeat::starting(self.worker_id.clone(), now);
        hb.status = WorkerStatus::Busy;
        hb.task_id = Some(task.id.clone());
        hb.task_type = Some(task.task_type.as_str().to_string());
        self.state.upsert_heartbeat(&hb).await?;

        if let Some(mut worker) = self.state.get_worker(&self.worker_id).await? {
            worker.status = WorkerStatus::Busy;
            worker.last_heartbeat = now;
            self.state.upsert_worker(&worker).await?;
        }
        Ok(())
    }

    /// Drives a claimed task forward one suspension point at a time: each
    /// non-EXECUTE phase advances as soon as its artifact gate passes;
    /// EXECUTE additionally runs the quality gates and hands the outcome
    /// to the approver. A gate that is not yet satisfied leaves the task
    /// RUNNING at its current phase for the worker's next pass.
    async fn drive_phases(&self, mut task: Task) -> Result<(), EngineError> {
        let workspace = self.workspace_root.join(task.id.as_str());
        std::fs::create_dir_all(&workspace)?;

        loop {
            let now = self.clock.now();
            let reasons = self.phase_engine.validate_phase_gate(&task, &workspace).await?;
            if !reasons.is_empty() {
                info!(task_id = %task.id, phase = %task.phase, ?reasons, "phase gate not yet satisfied");
                return Ok(());
            }

            if task.phase == Phase::Execute {
                let runner = GateRunner::new(&self.path_guard, &workspace, self.config.strict_mode);
                let results = runner.run_all(&self.gate_commands, now).await;
                match self.approver.process(&task, &results, now).await? {
                    ApprovalOutcome::Approved => info!(task_id = %task.id, "task approved"),
                    ApprovalOutcome::Rejected(fb) => {
                        info!(task_id = %task.id, retry_count = fb.retry_count, "task rejected, awaiting resubmit")
                    }
                    ApprovalOutcome::Failed(fb) => {
                        warn!(task_id = %task.id, retry_count = fb.retry_count, "task permanently failed")
                    }
                }
                return Ok(());
            }

            let Some(next) = task.phase.next() else { return Ok(()) };
            self.state.transition(&task.id, TaskState::Running, next, now).await?;
            task.phase = next;
        }
    }
}

#[cfg(test)]
#[path = "worker_runner_tests.rs"]
mod tests;
