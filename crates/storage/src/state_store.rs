// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The authoritative current-state projection: a single embedded SQL
//! database (tasks, workers, heartbeats, artifacts, shard health).
//!
//! Every state-mutating call runs inside a `BEGIN IMMEDIATE` transaction
//! so two processes racing for the same row serialize on SQLite's
//! writer lock rather than interleaving.

use chrono::{DateTime, Utc};
use libsql::{params, Builder, Connection, Database, Row};
use sdlc_core::{
    ArtifactType, Lane, Phase, PhaseArtifact, Priority, ShardId, Task, TaskId, TaskState,
    TaskType, Worker, WorkerHeartbeat, WorkerId, WorkerStatus,
};
use serde_json::Value as Json;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("database error: {0}")]
    Db(#[from] libsql::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
    #[error("unknown enum value {field}={value}")]
    UnknownEnum { field: &'static str, value: String },
    #[error("task {0} not found")]
    TaskNotFound(String),
    #[error("task {task_id} cannot be resubmitted from state {state}")]
    NotResubmittable { task_id: String, state: String },
}

fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>, StateStoreError> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

fn parse_opt_ts(s: Option<String>) -> Result<Option<DateTime<Utc>>, StateStoreError> {
    s.map(|s| parse_ts(&s)).transpose()
}

/// A durable, sharded, SQL-backed projection of current task/worker state.
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (creating if needed) the database at `path`, applying the
    /// schema and session pragmas.
    pub async fn open(path: &str) -> Result<Self, StateStoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        crate::schema::apply(&conn).await?;
        Ok(Self { db: Arc::new(db) })
    }

    /// In-memory database, for tests.
    pub async fn open_in_memory() -> Result<Self, StateStoreError> {
        Self::open(":memory:").await
    }

    /// A fresh connection with the per-connection session pragmas
    /// (`busy_timeout`, `foreign_keys`) applied — SQLite scopes both to
    /// the connection, not the database file, so every connection needs
    /// them, not just the one `open()` used to run the schema DDL.
    async fn connect(&self) -> Result<Connection, StateStoreError> {
        let conn = self.db.connect()?;
        crate::schema::apply_connection_pragmas(&conn).await?;
        Ok(conn)
    }

    pub async fn insert_task(&self, task: &Task) -> Result<(), StateStoreError> {
        let conn = self.connect().await?;
        conn.execute(
            "INSERT INTO tasks (
                id, task_type, priority, state, phase, assigned_model, lane, shard,
                worker_id, retry_count, created_at, started_at, heartbeat_at,
                last_activity_at, updated_at, metadata, trace_id
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17)",
            params![
                task.id.as_str().to_string(),
                task.task_type.as_str().to_string(),
                task.priority.as_u8() as i64,
                task.state.to_string(),
                task.phase.as_str().to_string(),
                task.assigned_model.clone(),
                task.lane.as_str().to_string(),
                task.shard.as_str().to_string(),
                task.worker_id.as_ref().map(|w| w.as_str().to_string()),
                task.retry_count as i64,
                fmt_ts(task.created_at),
                task.started_at.map(fmt_ts),
                task.heartbeat_at.map(fmt_ts),
                task.last_activity_at.map(fmt_ts),
                fmt_ts(task.updated_at),
                task.metadata.to_string(),
                task.trace_id.clone(),
            ],
        )
        .await?;
        Ok(())
    }

    pub async fn get_task(&self, id: &TaskId) -> Result<Option<Task>, StateStoreError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query("SELECT * FROM tasks WHERE id = ?1", params![id.as_str().to_string()])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(task_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Up to `limit` QUEUED tasks matching the given filters, ordered
    /// `(priority ASC, created_at ASC)` per spec.md §4.3's candidate scan.
    pub async fn candidate_tasks(
        &self,
        shard: Option<&ShardId>,
        lane: Option<Lane>,
        model: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Task>, StateStoreError> {
        let conn = self.connect().await?;
        let mut sql = String::from("SELECT * FROM tasks WHERE state = 'queued'");
        if shard.is_some() {
            sql.push_str(" AND shard = ?2");
        }
        if lane.is_some() {
            sql.push_str(" AND lane = ?3");
        }
        if model.is_some() {
            sql.push_str(" AND assigned_model = ?4");
        }
        sql.push_str(" ORDER BY priority ASC, created_at ASC LIMIT ?1");

        let mut rows = conn
            .query(
                &sql,
                params![
                    limit as i64,
                    shard.map(|s| s.as_str().to_string()),
                    lane.map(|l| l.as_str().to_string()),
                    model.map(str::to_string),
                ],
            )
            .await?;

        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(task_from_row(&row)?);
        }
        Ok(tasks)
    }

    /// How many RUNNING tasks are currently assigned to `worker_id`.
    pub async fn count_running_for_worker(&self, worker_id: &WorkerId) -> Result<u64, StateStoreError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM tasks WHERE state = 'running' AND worker_id = ?1",
                params![worker_id.as_str().to_string()],
            )
            .await?;
        let row = rows.next().await?.expect("COUNT(*) always returns a row");
        Ok(row.get::<i64>(0)? as u64)
    }

    /// How many RUNNING tasks have `submitter` (resolved via
    /// [`Task::submitter`]) among their metadata.
    pub async fn count_running_for_submitter(&self, submitter: &str) -> Result<u64, StateStoreError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                "SELECT metadata, trace_id FROM tasks WHERE state = 'running'",
                (),
            )
            .await?;
        let mut count = 0u64;
        while let Some(row) = rows.next().await? {
            let metadata: String = row.get(0)?;
            let trace_id: String = row.get(1)?;
            let metadata: Json = serde_json::from_str(&metadata)?;
            let resolved = metadata
                .get("submitter")
                .and_then(Json::as_str)
                .map(String::from)
                .or_else(|| trace_id.split_once(':').map(|(prefix, _)| prefix.to_string()))
                .unwrap_or_else(|| "unknown".to_string());
            if resolved == submitter {
                count += 1;
            }
        }
        Ok(count)
    }

    /// The atomic claim transaction from spec.md §4.3. Returns `true` iff
    /// this call won the race (`changes() > 0`); `false` means someone
    /// else claimed it first — the caller does not retry within this call.
    pub async fn claim_task(
        &self,
        task_id: &TaskId,
        worker_id: &WorkerId,
        now: DateTime<Utc>,
    ) -> Result<bool, StateStoreError> {
        let conn = self.connect().await?;
        conn.execute("BEGIN IMMEDIATE", ()).await?;
        let result = conn
            .execute(
                "UPDATE tasks
                    SET state='running', worker_id=?1,
                        started_at=?2, heartbeat_at=?2, last_activity_at=?2, updated_at=?2
                  WHERE id=?3 AND state='queued'",
                params![worker_id.as_str().to_string(), fmt_ts(now), task_id.as_str().to_string()],
            )
            .await;
        match result {
            Ok(changes) => {
                conn.execute("COMMIT", ()).await?;
                Ok(changes > 0)
            }
            Err(e) => {
                conn.execute("ROLLBACK", ()).await.ok();
                Err(e.into())
            }
        }
    }

    /// Move a task to `new_state`/`new_phase`, stamping `updated_at`.
    /// Invariant checks (RUNNING needs worker_id+started_at, QUEUED has
    /// none) are the caller's responsibility via `Task::invariants_hold`
    /// before calling this.
    pub async fn transition(
        &self,
        task_id: &TaskId,
        new_state: TaskState,
        new_phase: Phase,
        now: DateTime<Utc>,
    ) -> Result<(), StateStoreError> {
        let conn = self.connect().await?;
        let changes = conn
            .execute(
                "UPDATE tasks SET state=?1, phase=?2, updated_at=?3 WHERE id=?4",
                params![
                    new_state.to_string(),
                    new_phase.as_str().to_string(),
                    fmt_ts(now),
                    task_id.as_str().to_string(),
                ],
            )
            .await?;
        if changes == 0 {
            return Err(StateStoreError::TaskNotFound(task_id.as_str().to_string()));
        }
        Ok(())
    }

    /// Record a quality-gate review outcome (spec.md §4.8): on approval,
    /// the task moves to `new_state` (APPROVED) unchanged otherwise; on
    /// rejection, `retry_count` is bumped and the task either moves to
    /// REJECTED (retryable) or FAILED (`retry_count` has hit the ceiling).
    /// Returns the task's `retry_count` after the update.
    pub async fn record_review_outcome(
        &self,
        task_id: &TaskId,
        new_state: TaskState,
        bump_retry: bool,
        now: DateTime<Utc>,
    ) -> Result<u32, StateStoreError> {
        let conn = self.connect().await?;
        let changes = if bump_retry {
            conn.execute(
                "UPDATE tasks SET state=?1, retry_count=COALESCE(retry_count,0)+1, updated_at=?2 WHERE id=?3",
                params![new_state.to_string(), fmt_ts(now), task_id.as_str().to_string()],
            )
            .await?
        } else {
            conn.execute(
                "UPDATE tasks SET state=?1, updated_at=?2 WHERE id=?3",
                params![new_state.to_string(), fmt_ts(now), task_id.as_str().to_string()],
            )
            .await?
        };
        if changes == 0 {
            return Err(StateStoreError::TaskNotFound(task_id.as_str().to_string()));
        }
        let task = self
            .get_task(task_id)
            .await?
            .ok_or_else(|| StateStoreError::TaskNotFound(task_id.as_str().to_string()))?;
        Ok(task.retry_count)
    }

    /// QUEUED tasks that have not yet been through the supervisor's
    /// route-assignment pass (spec.md §4.2's `assigned_model` is unset).
    pub async fn unrouted_tasks(&self) -> Result<Vec<Task>, StateStoreError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                "SELECT * FROM tasks WHERE state = 'queued' AND assigned_model IS NULL",
                (),
            )
            .await?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(task_from_row(&row)?);
        }
        Ok(tasks)
    }

    /// Apply the shard/lane/model routing decision from `assign_shard` /
    /// `route_lane_and_model` to a task discovered by `unrouted_tasks`.
    pub async fn apply_routing(
        &self,
        task_id: &TaskId,
        shard: &ShardId,
        lane: Lane,
        model: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StateStoreError> {
        let conn = self.connect().await?;
        let changes = conn
            .execute(
                "UPDATE tasks SET shard=?1, lane=?2, assigned_model=?3, updated_at=?4 WHERE id=?5",
                params![
                    shard.as_str().to_string(),
                    lane.as_str().to_string(),
                    model.to_string(),
                    fmt_ts(now),
                    task_id.as_str().to_string(),
                ],
            )
            .await?;
        if changes == 0 {
            return Err(StateStoreError::TaskNotFound(task_id.as_str().to_string()));
        }
        Ok(())
    }

    /// Requeue procedure from spec.md §4.6: release the task back to
    /// QUEUED (bumping `retry_count`), mark the worker dead, in one
    /// transaction.
    pub async fn requeue_task(
        &self,
        task_id: &TaskId,
        worker_id: &WorkerId,
        now: DateTime<Utc>,
    ) -> Result<(), StateStoreError> {
        let conn = self.connect().await?;
        conn.execute("BEGIN IMMEDIATE", ()).await?;
        let outcome: Result<(), libsql::Error> = async {
            conn.execute(
                "UPDATE tasks SET state='queued', worker_id=NULL,
                    retry_count = COALESCE(retry_count,0)+1, updated_at=?1
                 WHERE id=?2",
                params![fmt_ts(now), task_id.as_str().to_string()],
            )
            .await?;
            conn.execute(
                "UPDATE workers SET status='dead', last_heartbeat=?1 WHERE id=?2",
                params![fmt_ts(now), worker_id.as_str().to_string()],
            )
            .await?;
            Ok(())
        }
        .await;

        match outcome {
            Ok(()) => {
                conn.execute("COMMIT", ()).await?;
                Ok(())
            }
            Err(e) => {
                conn.execute("ROLLBACK", ()).await.ok();
                Err(e.into())
            }
        }
    }

    pub async fn upsert_worker(&self, worker: &Worker) -> Result<(), StateStoreError> {
        let conn = self.connect().await?;
        conn.execute(
            "INSERT INTO workers (id, pid, status, specialization, shard, model, started_at, last_heartbeat)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)
             ON CONFLICT(id) DO UPDATE SET
                pid = excluded.pid,
                status = excluded.status,
                shard = excluded.shard,
                model = excluded.model,
                last_heartbeat = excluded.last_heartbeat",
            params![
                worker.id.as_str().to_string(),
                worker.pid.map(|p| p as i64),
                worker.status.to_string(),
                worker.specialization.as_str().to_string(),
                worker.shard.as_str().to_string(),
                worker.model.clone(),
                fmt_ts(worker.started_at),
                fmt_ts(worker.last_heartbeat),
            ],
        )
        .await?;
        Ok(())
    }

    pub async fn upsert_heartbeat(&self, hb: &WorkerHeartbeat) -> Result<(), StateStoreError> {
        let conn = self.connect().await?;
        conn.execute(
            "INSERT INTO worker_heartbeats
                (worker_id, timestamp, status, task_id, task_type, progress_percent,
                 expected_timeout_seconds, last_activity_at, updated_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)
             ON CONFLICT(worker_id) DO UPDATE SET
                timestamp = excluded.timestamp,
                status = excluded.status,
                task_id = excluded.task_id,
                task_type = excluded.task_type,
                progress_percent = excluded.progress_percent,
                expected_timeout_seconds = excluded.expected_timeout_seconds,
                last_activity_at = excluded.last_activity_at,
                updated_at = excluded.updated_at",
            params![
                hb.worker_id.as_str().to_string(),
                fmt_ts(hb.timestamp),
                hb.status.to_string(),
                hb.task_id.as_ref().map(|t| t.as_str().to_string()),
                hb.task_type.clone(),
                hb.progress_percent.map(|p| p as i64),
                hb.expected_timeout_seconds.map(|s| s as i64),
                fmt_ts(hb.last_activity_at),
                fmt_ts(hb.updated_at),
            ],
        )
        .await?;
        Ok(())
    }

    pub async fn register_artifact(&self, artifact: &PhaseArtifact) -> Result<(), StateStoreError> {
        let conn = self.connect().await?;
        conn.execute(
            "INSERT INTO phase_artifacts
                (task_id, phase, path, artifact_type, checksum, size, verified_at, created_at, updated_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)
             ON CONFLICT(task_id, phase, path) DO UPDATE SET
                checksum = excluded.checksum,
                size = excluded.size,
                verified_at = excluded.verified_at,
                updated_at = excluded.updated_at",
            params![
                artifact.task_id.as_str().to_string(),
                artifact.phase.as_str().to_string(),
                artifact.path.to_string_lossy().to_string(),
                artifact.artifact_type.as_str().to_string(),
                artifact.checksum.clone(),
                artifact.size as i64,
                fmt_ts(artifact.verified_at),
                fmt_ts(artifact.created_at),
                fmt_ts(artifact.updated_at),
            ],
        )
        .await?;
        Ok(())
    }

    pub async fn artifacts_for_phase(
        &self,
        task_id: &str,
        phase: Phase,
    ) -> Result<Vec<PhaseArtifact>, StateStoreError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                "SELECT * FROM phase_artifacts WHERE task_id = ?1 AND phase = ?2",
                params![task_id.to_string(), phase.as_str().to_string()],
            )
            .await?;
        let mut artifacts = Vec::new();
        while let Some(row) = rows.next().await? {
            artifacts.push(artifact_from_row(&row)?);
        }
        Ok(artifacts)
    }

    pub async fn upsert_shard_health(
        &self,
        component: &ShardId,
        status: sdlc_core::ShardHealthStatus,
        details: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), StateStoreError> {
        let conn = self.connect().await?;
        conn.execute(
            "INSERT INTO shard_health (component, status, details, updated_at)
             VALUES (?1,?2,?3,?4)
             ON CONFLICT(component) DO UPDATE SET
                status = excluded.status, details = excluded.details, updated_at = excluded.updated_at",
            params![
                component.as_str().to_string(),
                status.to_string(),
                details.map(str::to_string),
                fmt_ts(now),
            ],
        )
        .await?;
        Ok(())
    }

    /// Count of QUEUED tasks per shard, for rebalance threshold checks.
    pub async fn queued_counts_by_shard(&self) -> Result<Vec<(ShardId, u64)>, StateStoreError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                "SELECT shard, COUNT(*) FROM tasks WHERE state = 'queued' GROUP BY shard",
                (),
            )
            .await?;
        let mut counts = Vec::new();
        while let Some(row) = rows.next().await? {
            let shard: String = row.get(0)?;
            let n: i64 = row.get(1)?;
            counts.push((ShardId::new(shard), n as u64));
        }
        Ok(counts)
    }

    /// Move up to `count` QUEUED tasks from `from_shard` to `to_shard`,
    /// priority-then-age ordered, as spec.md §4.7 requires.
    pub async fn redistribute_shard(
        &self,
        from_shard: &ShardId,
        to_shard: &ShardId,
        count: u64,
        now: DateTime<Utc>,
    ) -> Result<u64, StateStoreError> {
        let conn = self.connect().await?;
        let changes = conn
            .execute(
                "UPDATE tasks SET shard = ?1, updated_at = ?2
                 WHERE id IN (
                    SELECT id FROM tasks
                     WHERE shard = ?3 AND state = 'queued'
                     ORDER BY priority ASC, created_at ASC
                     LIMIT ?4
                 )",
                params![
                    to_shard.as_str().to_string(),
                    fmt_ts(now),
                    from_shard.as_str().to_string(),
                    count as i64,
                ],
            )
            .await?;
        Ok(changes)
    }

    /// All RUNNING tasks, for the recovery loop's stale-task scan.
    pub async fn running_tasks(&self) -> Result<Vec<Task>, StateStoreError> {
        let conn = self.connect().await?;
        let mut rows = conn.query("SELECT * FROM tasks WHERE state = 'running'", ()).await?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(task_from_row(&row)?);
        }
        Ok(tasks)
    }

    /// All tasks in a given state, for the operator CLI's `status` view.
    pub async fn tasks_by_state(&self, state: TaskState) -> Result<Vec<Task>, StateStoreError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query("SELECT * FROM tasks WHERE state = ?1", params![state.to_string()])
            .await?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(task_from_row(&row)?);
        }
        Ok(tasks)
    }

    /// Operator resubmit of a REJECTED task (spec.md's `resubmit_command`):
    /// moves it back to QUEUED with no assigned worker so the claim
    /// protocol picks it up again. Refuses any other current state — a
    /// FAILED task is permanent, and resubmitting a task that is already
    /// QUEUED/RUNNING/APPROVED would be a no-op at best and a double-claim
    /// hazard at worst.
    pub async fn resubmit_task(&self, task_id: &TaskId, now: DateTime<Utc>) -> Result<Task, StateStoreError> {
        let task = self
            .get_task(task_id)
            .await?
            .ok_or_else(|| StateStoreError::TaskNotFound(task_id.as_str().to_string()))?;
        if task.state != TaskState::Rejected {
            return Err(StateStoreError::NotResubmittable {
                task_id: task_id.as_str().to_string(),
                state: task.state.to_string(),
            });
        }
        let conn = self.connect().await?;
        conn.execute(
            "UPDATE tasks SET state='queued', worker_id=NULL, updated_at=?1 WHERE id=?2",
            params![fmt_ts(now), task_id.as_str().to_string()],
        )
        .await?;
        self.get_task(task_id)
            .await?
            .ok_or_else(|| StateStoreError::TaskNotFound(task_id.as_str().to_string()))
    }

    pub async fn get_worker(&self, id: &WorkerId) -> Result<Option<Worker>, StateStoreError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query("SELECT * FROM workers WHERE id = ?1", params![id.as_str().to_string()])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(worker_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn all_workers(&self) -> Result<Vec<Worker>, StateStoreError> {
        let conn = self.connect().await?;
        let mut rows = conn.query("SELECT * FROM workers", ()).await?;
        let mut workers = Vec::new();
        while let Some(row) = rows.next().await? {
            workers.push(worker_from_row(&row)?);
        }
        Ok(workers)
    }
}

fn task_from_row(row: &Row) -> Result<Task, StateStoreError> {
    let state_str: String = row.get(3)?;
    let phase_str: String = row.get(4)?;
    let lane_str: String = row.get(6)?;
    let worker_id: Option<String> = row.get(8)?;

    Ok(Task {
        id: TaskId::new(row.get::<String>(0)?),
        task_type: TaskType::new(row.get::<String>(1)?),
        priority: priority_from_u8(row.get::<i64>(2)? as u8)?,
        state: task_state_from_str(&state_str)?,
        phase: phase_from_str(&phase_str)?,
        assigned_model: row.get(5)?,
        lane: lane_from_str(&lane_str)?,
        shard: ShardId::new(row.get::<String>(7)?),
        worker_id: worker_id.map(WorkerId::new),
        retry_count: row.get::<i64>(9)? as u32,
        created_at: parse_ts(&row.get::<String>(10)?)?,
        started_at: parse_opt_ts(row.get(11)?)?,
        heartbeat_at: parse_opt_ts(row.get(12)?)?,
        last_activity_at: parse_opt_ts(row.get(13)?)?,
        updated_at: parse_ts(&row.get::<String>(14)?)?,
        metadata: serde_json::from_str(&row.get::<String>(15)?)?,
        trace_id: row.get(16)?,
    })
}

fn artifact_from_row(row: &Row) -> Result<PhaseArtifact, StateStoreError> {
    let phase_str: String = row.get(1)?;
    let type_str: String = row.get(3)?;
    Ok(PhaseArtifact {
        task_id: TaskId::new(row.get::<String>(0)?),
        phase: phase_from_str(&phase_str)?,
        path: std::path::PathBuf::from(row.get::<String>(2)?),
        artifact_type: artifact_type_from_str(&type_str)?,
        checksum: row.get(4)?,
        size: row.get::<i64>(5)? as u64,
        verified_at: parse_ts(&row.get::<String>(6)?)?,
        created_at: parse_ts(&row.get::<String>(7)?)?,
        updated_at: parse_ts(&row.get::<String>(8)?)?,
    })
}

fn worker_from_row(row: &Row) -> Result<Worker, StateStoreError> {
    let status_str: String = row.get(2)?;
    let spec_str: String = row.get(3)?;
    Ok(Worker {
        id: WorkerId::new(row.get::<String>(0)?),
        pid: row.get::<Option<i64>>(1)?.map(|p| p as u32),
        status: worker_status_from_str(&status_str)?,
        specialization: lane_from_str(&spec_str)?,
        shard: ShardId::new(row.get::<String>(4)?),
        model: row.get(5)?,
        started_at: parse_ts(&row.get::<String>(6)?)?,
        last_heartbeat: parse_ts(&row.get::<String>(7)?)?,
        crash_count: 0,
    })
}

fn priority_from_u8(v: u8) -> Result<Priority, StateStoreError> {
    match v {
        0 => Ok(Priority::Critical),
        1 => Ok(Priority::High),
        2 => Ok(Priority::Medium),
        3 => Ok(Priority::Low),
        other => Err(StateStoreError::UnknownEnum {
            field: "priority",
            value: other.to_string(),
        }),
    }
}

fn task_state_from_str(s: &str) -> Result<TaskState, StateStoreError> {
    match s {
        "queued" => Ok(TaskState::Queued),
        "running" => Ok(TaskState::Running),
        "approved" => Ok(TaskState::Approved),
        "rejected" => Ok(TaskState::Rejected),
        "failed" => Ok(TaskState::Failed),
        "complete" => Ok(TaskState::Complete),
        other => Err(StateStoreError::UnknownEnum {
            field: "state",
            value: other.to_string(),
        }),
    }
}

fn phase_from_str(s: &str) -> Result<Phase, StateStoreError> {
    Phase::from_str(s).map_err(|_| StateStoreError::UnknownEnum {
        field: "phase",
        value: s.to_string(),
    })
}

fn lane_from_str(s: &str) -> Result<Lane, StateStoreError> {
    Lane::from_str(s).map_err(|_| StateStoreError::UnknownEnum {
        field: "lane",
        value: s.to_string(),
    })
}

fn worker_status_from_str(s: &str) -> Result<WorkerStatus, StateStoreError> {
    WorkerStatus::from_str(s).map_err(|_| StateStoreError::UnknownEnum {
        field: "worker_status",
        value: s.to_string(),
    })
}

fn artifact_type_from_str(s: &str) -> Result<ArtifactType, StateStoreError> {
    ArtifactType::from_str(s).map_err(|_| StateStoreError::UnknownEnum {
        field: "artifact_type",
        value: s.to_string(),
    })
}

#[cfg(test)]
#[path = "state_store_tests.rs"]
mod tests;
