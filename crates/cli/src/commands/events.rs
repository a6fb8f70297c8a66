// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sdlc events rebuild <name>` — materialize one of the named
//! projections over the full append-only event log.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};

use crate::projections;
use crate::store;

#[derive(Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Subcommand)]
pub enum EventsCommand {
    /// Rebuild and persist a named projection (event_type_counts, task_activity).
    Rebuild { name: String },
}

pub async fn run(args: EventsArgs) -> Result<()> {
    let handles = store::open().await.context("opening daemon state store")?;
    match args.command {
        EventsCommand::Rebuild { name } => {
            let rendered = projections::rebuild(&handles.events, &name, Utc::now())?;
            println!("{rendered}");
        }
    }
    Ok(())
}
