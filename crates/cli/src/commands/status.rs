// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sdlc status` — overview of queue depth, running tasks, and workers.

use anyhow::{Context, Result};
use clap::Args;
use sdlc_core::TaskState;
use serde::Serialize;

use crate::output::{Column, OutputFormat, Table};
use crate::store;

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Serialize)]
struct StatusSummary {
    state_counts: Vec<(String, usize)>,
    shard_queue_depth: Vec<(String, u64)>,
    running: Vec<String>,
    workers_alive: usize,
    workers_total: usize,
}

const STATES: [TaskState; 6] = [
    TaskState::Queued,
    TaskState::Running,
    TaskState::Approved,
    TaskState::Rejected,
    TaskState::Failed,
    TaskState::Complete,
];

pub async fn run(_args: StatusArgs, format: OutputFormat) -> Result<()> {
    let handles = store::open().await.context("opening daemon state store")?;

    let mut state_counts = Vec::new();
    for state in STATES {
        let tasks = handles.state.tasks_by_state(state).await.context("querying tasks by state")?;
        state_counts.push((state.to_string(), tasks.len()));
    }

    let shard_queue_depth: Vec<(String, u64)> = handles
        .state
        .queued_counts_by_shard()
        .await
        .context("querying queued counts by shard")?
        .into_iter()
        .map(|(shard, n)| (shard.as_str().to_string(), n))
        .collect();

    let running = handles.state.running_tasks().await.context("querying running tasks")?;
    let workers = handles.state.all_workers().await.context("querying workers")?;
    let workers_alive = workers.iter().filter(|w| w.status.is_alive()).count();

    match format {
        OutputFormat::Json => {
            let summary = StatusSummary {
                state_counts,
                shard_queue_depth,
                running: running.iter().map(|t| t.id.as_str().to_string()).collect(),
                workers_alive,
                workers_total: workers.len(),
            };
            crate::output::print_json(&summary)?;
        }
        OutputFormat::Text => {
            println!("Task states:");
            let mut table = Table::new(vec![Column::left("state"), Column::right("count")]);
            for (state, count) in &state_counts {
                table.push_row(vec![state.clone(), count.to_string()]);
            }
            table.print();

            println!("\nQueue depth by shard:");
            let mut table = Table::new(vec![Column::left("shard"), Column::right("queued")]);
            for (shard, n) in &shard_queue_depth {
                table.push_row(vec![shard.clone(), n.to_string()]);
            }
            table.print();

            println!("\nWorkers: {workers_alive}/{} alive", workers.len());
            println!("Running tasks: {}", running.len());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
