// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sdlc - operator CLI for the autonomous SDLC orchestrator.
//!
//! Thin by design: every command reads or writes the same on-disk state
//! and event store the daemon itself uses (resolved through the
//! daemon's own config loader), rather than speaking a wire protocol to
//! a running daemon process.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod output;
mod projections;
mod store;

use clap::{Parser, Subcommand};
use commands::{approve, events, inspect, resubmit, status, submit};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "sdlc", version, about = "Operator CLI for the autonomous SDLC orchestrator")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a new task to the queue
    Submit(submit::SubmitArgs),
    /// Overview of queue depth, running tasks, and workers
    Status(status::StatusArgs),
    /// Show a task's full record and any rejection feedback
    Inspect(inspect::InspectArgs),
    /// Force-approve a task outside the normal gate pipeline
    Approve(approve::ApproveArgs),
    /// Requeue a rejected task for another attempt
    Resubmit(resubmit::ResubmitArgs),
    /// Event-log projection management
    Events(events::EventsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Submit(args) => submit::run(args).await,
        Commands::Status(args) => status::run(args, cli.output).await,
        Commands::Inspect(args) => inspect::run(args, cli.output).await,
        Commands::Approve(args) => approve::run(args).await,
        Commands::Resubmit(args) => resubmit::run(args).await,
        Commands::Events(args) => events::run(args).await,
    }
}
