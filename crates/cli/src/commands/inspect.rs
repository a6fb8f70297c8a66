// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sdlc inspect <task_id>` — full task record plus rejection feedback,
//! if any is waiting in the worker's inbox.

use anyhow::{Context, Result};
use clap::Args;
use sdlc_core::{Lane, ShardId, TaskId};

use crate::output::OutputFormat;
use crate::store;

#[derive(Args)]
pub struct InspectArgs {
    pub task_id: String,
}

pub async fn run(args: InspectArgs, format: OutputFormat) -> Result<()> {
    let handles = store::open().await.context("opening daemon state store")?;
    let task_id = TaskId::new(args.task_id.clone());

    let Some(task) = handles.state.get_task(&task_id).await.context("querying task")? else {
        anyhow::bail!("no such task: {}", args.task_id);
    };

    let feedback = find_feedback(&handles.config.workspace_root, &args.task_id);

    match format {
        OutputFormat::Json => {
            let combined = serde_json::json!({ "task": task, "feedback": feedback });
            crate::output::print_json(&combined)?;
        }
        OutputFormat::Text => {
            println!("id:          {}", task.id);
            println!("type:        {}", task.task_type);
            println!("priority:    {}", task.priority);
            println!("state:       {}", task.state);
            println!("phase:       {}", task.phase);
            println!("lane:        {}", task.lane);
            println!("shard:       {}", task.shard);
            println!("assigned:    {}", task.assigned_model.as_deref().unwrap_or("-"));
            println!("worker:      {}", task.worker_id.as_ref().map(|w| w.as_str()).unwrap_or("-"));
            println!("retry_count: {}", task.retry_count);
            println!("submitter:   {}", task.submitter());
            if let Some(fb) = &feedback {
                println!("\nrejection feedback:");
                println!("{}", serde_json::to_string_pretty(fb)?);
            }
        }
    }
    Ok(())
}

/// Rejection feedback is written by the `Approver` into the claiming
/// worker's own `_inbox/<task_id>.json`, one per `(lane, shard)` slot —
/// scan every slot under the configured workspace root rather than
/// assuming which one last held the task.
fn find_feedback(workspace_root: &std::path::Path, task_id: &str) -> Option<serde_json::Value> {
    for lane in Lane::ALL {
        let Ok(shard_dirs) = std::fs::read_dir(workspace_root.join(lane.as_str())) else {
            continue;
        };
        for shard_dir in shard_dirs.flatten() {
            let shard = ShardId::new(shard_dir.file_name().to_string_lossy().into_owned());
            let path =
                workspace_root.join(lane.as_str()).join(shard.as_str()).join("_inbox").join(format!("{task_id}.json"));
            if let Ok(raw) = std::fs::read_to_string(&path) {
                if let Ok(value) = serde_json::from_str(&raw) {
                    return Some(value);
                }
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "inspect_tests.rs"]
mod tests;
