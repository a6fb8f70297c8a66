// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sdlc resubmit <task_id>` — the command `RejectionFeedback::resubmit_command`
//! points operators at after a rejected task's fix is ready.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use sdlc_core::TaskId;

use crate::store;

#[derive(Args)]
pub struct ResubmitArgs {
    pub task_id: String,
}

pub async fn run(args: ResubmitArgs) -> Result<()> {
    let handles = store::open().await.context("opening daemon state store")?;
    let task_id = TaskId::new(args.task_id.clone());

    let task = handles.state.resubmit_task(&task_id, Utc::now()).await.context("resubmitting task")?;
    println!("resubmitted {} (retry_count={})", task.id, task.retry_count);
    Ok(())
}

#[cfg(test)]
#[path = "resubmit_tests.rs"]
mod tests;
