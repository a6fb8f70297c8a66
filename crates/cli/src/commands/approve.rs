// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sdlc approve <task_id>` — operator override that force-approves a
//! task outside the normal gate-driven `Approver::process` path. Used to
//! unblock a task an operator has manually verified after a gate false
//! positive; the override is recorded as its own event so the ledger
//! shows it was a human decision, not a passing gate run.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Args;
use sdlc_core::{EventType, TaskId, TaskState};
use serde_json::json;

use crate::store;

#[derive(Args)]
pub struct ApproveArgs {
    pub task_id: String,
}

pub async fn run(args: ApproveArgs) -> Result<()> {
    let handles = store::open().await.context("opening daemon state store")?;
    let task_id = TaskId::new(args.task_id.clone());
    let now = Utc::now();

    let Some(task) = handles.state.get_task(&task_id).await.context("querying task")? else {
        bail!("no such task: {}", args.task_id);
    };
    if task.state == TaskState::Approved {
        println!("{} is already approved", task.id);
        return Ok(());
    }
    if task.state == TaskState::Complete {
        bail!("{} is complete, cannot approve", task.id);
    }

    handles.state.record_review_outcome(&task_id, TaskState::Approved, false, now).await.context("approving task")?;
    handles
        .events
        .append(
            EventType::TaskApproved,
            Some(task_id.as_str().to_string()),
            "operator",
            json!({ "manual_override": true, "prior_state": task.state.to_string() }),
            task.trace_id.clone(),
            now,
        )
        .context("recording manual approval event")?;

    println!("approved {} (manual override, prior state: {})", task.id, task.state);
    Ok(())
}

#[cfg(test)]
#[path = "approve_tests.rs"]
mod tests;
