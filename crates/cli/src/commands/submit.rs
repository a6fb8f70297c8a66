// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sdlc submit` — enqueue a new task.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Args;
use sdlc_core::{Lane, Phase, Priority, ShardId, Task, TaskId, TaskState, TaskType};
use serde_json::json;

use crate::store;

#[derive(Args)]
pub struct SubmitArgs {
    /// Task type tag, e.g. IMPLEMENT, REVIEW, ANALYSIS (case-normalized).
    #[arg(long = "type")]
    pub task_type: String,

    /// 0=critical, 1=high, 2=medium, 3=low.
    #[arg(long, default_value_t = 2)]
    pub priority: u8,

    /// Explicit task id; a random one is generated if omitted.
    #[arg(long)]
    pub id: Option<String>,

    /// Submitter identity, recorded in metadata for per-user fairness.
    #[arg(long)]
    pub submitter: Option<String>,
}

fn priority_from_u8(n: u8) -> Result<Priority> {
    Ok(match n {
        0 => Priority::Critical,
        1 => Priority::High,
        2 => Priority::Medium,
        3 => Priority::Low,
        other => bail!("invalid --priority {other}: expected 0 (critical) through 3 (low)"),
    })
}

pub async fn run(args: SubmitArgs) -> Result<()> {
    let handles = store::open().await.context("opening daemon state store")?;
    let now = Utc::now();

    let id = args.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let trace_id = match &args.submitter {
        Some(sub) => format!("{sub}:{id}"),
        None => id.clone(),
    };
    let metadata = match &args.submitter {
        Some(sub) => json!({ "submitter": sub }),
        None => json!({}),
    };

    let task = Task {
        id: TaskId::new(id.clone()),
        task_type: TaskType::new(&args.task_type),
        priority: priority_from_u8(args.priority)?,
        state: TaskState::Queued,
        phase: Phase::Brainstorm,
        // Placeholder until the supervisor's next route-assignment pass
        // sets the real shard/lane/assigned_model via `apply_routing`.
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
        metadata,
        trace_id,
    };

    handles.state.insert_task(&task).await.context("inserting task")?;
    println!("submitted {id} (type={}, priority={})", task.task_type, task.priority);
    Ok(())
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
