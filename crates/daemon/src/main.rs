// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sdlcd — the autonomous SDLC orchestrator's supervisor, recovery, and
//! worker process entry point.
//!
//! One binary, three roles selected by argv: no argument runs the
//! supervisor (route-assignment, shard health, worker restart,
//! rebalance); `recovery` runs the stale/zombie/crashed-worker scan on
//! its own cadence; `worker --lane <lane> --shard <shard>` runs a single
//! `(lane, shard)` slot's claim-execute-heartbeat loop. The supervisor
//! spawns worker processes by re-invoking this same binary.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use fs2::FileExt;
use sdlc_adapters::PathGuard;
use sdlc_core::{Lane, ShardId, SystemClock, WorkerId};
use sdlc_daemon::{DaemonConfig, DaemonError, RecoveryDaemon, Supervisor};
use sdlc_engine::{CycleOutcome, WorkerRunner};
use sdlc_storage::{EventStore, StateStore};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--version") | Some("-V") | Some("-v") => {
            println!("sdlcd {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some("--help") | Some("-h") | Some("help") => {
            print_help();
            Ok(())
        }
        Some("worker") => run_worker(&args[2..]).await,
        Some("recovery") => run_recovery().await,
        None => run_supervisor().await,
        Some(other) => {
            eprintln!("error: unexpected argument '{other}'");
            eprintln!("Usage: sdlcd [worker --lane <lane> --shard <shard> | recovery | --help | --version]");
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!("sdlcd {}", env!("CARGO_PKG_VERSION"));
    println!("Autonomous SDLC orchestrator daemon");
    println!();
    println!("USAGE:");
    println!("    sdlcd                                    Run the supervisor");
    println!("    sdlcd recovery                            Run the recovery daemon");
    println!("    sdlcd worker --lane <lane> --shard <id>   Run a single worker slot");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Print help information");
    println!("    -v, --version    Print version information");
}

async fn run_supervisor() -> Result<(), Box<dyn std::error::Error>> {
    let config = DaemonConfig::load()?;
    rotate_log_if_needed(&config.log_path);
    let _log_guard = setup_logging(&config)?;
    info!("starting supervisor");

    let _lock = acquire_lock(&config.lock_path)?;

    std::fs::create_dir_all(&config.events_dir)?;
    let state = Arc::new(StateStore::open(config.db_path.to_str().ok_or(DaemonError::NoStateDir)?).await?);
    let events = Arc::new(EventStore::open(&config.events_dir)?);
    let worker_bin = std::env::current_exe()?;

    let mut supervisor =
        Supervisor::new(state, events, config.engine.clone(), worker_bin, config.pool_shutdown_timeout_secs);

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut cycle = tokio::time::interval(Duration::from_secs(config.engine.pool_check_interval_secs));

    println!("READY");
    info!("supervisor ready");

    loop {
        tokio::select! {
            _ = cycle.tick() => {
                if let Err(e) = supervisor.run_cycle(Utc::now()).await {
                    error!(error = %e, "supervisor cycle failed");
                }
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                break;
            }
        }
    }

    if let Err(e) = supervisor.graceful_shutdown(Utc::now()).await {
        error!(error = %e, "graceful shutdown encountered errors");
    }
    info!("supervisor stopped");
    Ok(())
}

async fn run_recovery() -> Result<(), Box<dyn std::error::Error>> {
    let config = DaemonConfig::load()?;
    rotate_log_if_needed(&config.log_path);
    let _log_guard = setup_logging(&config)?;
    info!("starting recovery daemon");

    std::fs::create_dir_all(&config.events_dir)?;
    let state = Arc::new(StateStore::open(config.db_path.to_str().ok_or(DaemonError::NoStateDir)?).await?);
    let events = Arc::new(EventStore::open(&config.events_dir)?);
    let recovery = RecoveryDaemon::new(state, events, config.engine.clone());

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    println!("READY");
    tokio::select! {
        _ = recovery.run_forever() => {},
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }
    Ok(())
}

async fn run_worker(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let lane: Lane = flag(args, "--lane")
        .ok_or_else(|| DaemonError::Config("worker requires --lane".into()))?
        .parse()
        .map_err(|_| DaemonError::Config("invalid --lane value".into()))?;
    let shard = ShardId::new(
        flag(args, "--shard").ok_or_else(|| DaemonError::Config("worker requires --shard".into()))?,
    );

    let config = DaemonConfig::load()?;
    rotate_log_if_needed(&config.log_path);
    let _log_guard = setup_logging(&config)?;

    let worker_id = WorkerId::generate(lane, Utc::now(), std::process::id());
    info!(worker_id = %worker_id, %lane, %shard, "starting worker");

    std::fs::create_dir_all(&config.events_dir)?;
    let state = Arc::new(StateStore::open(config.db_path.to_str().ok_or(DaemonError::NoStateDir)?).await?);
    let events = Arc::new(EventStore::open(&config.events_dir)?);

    let raw_path = std::env::var("PATH").unwrap_or_default();
    let whitelist: Vec<PathBuf> =
        ["/usr/local/bin", "/usr/bin", "/bin"].iter().map(PathBuf::from).collect();
    let path_guard = Arc::new(PathGuard::new(&raw_path, &whitelist));

    let workspace_root = config.workspace_root.join(lane.as_str()).join(shard.as_str());
    std::fs::create_dir_all(&workspace_root)?;

    let runner = WorkerRunner::new(
        worker_id.clone(),
        lane,
        shard.clone(),
        state.clone(),
        events,
        path_guard,
        Vec::new(),
        workspace_root,
        config.engine.clone(),
        SystemClock,
    );

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let idle_backoff = Duration::from_secs(2);

    loop {
        tokio::select! {
            outcome = runner.run_cycle() => {
                match outcome {
                    Ok(CycleOutcome::Claimed) => continue,
                    Ok(CycleOutcome::Idle) => tokio::time::sleep(idle_backoff).await,
                    Err(e) => {
                        error!(error = %e, "worker cycle failed");
                        tokio::time::sleep(idle_backoff).await;
                    }
                }
            }
            _ = sigterm.recv() => {
                info!(worker_id = %worker_id, "received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!(worker_id = %worker_id, "received SIGINT, shutting down");
                break;
            }
        }
    }

    if let Some(mut worker) = state.get_worker(&worker_id).await? {
        worker.status = sdlc_core::WorkerStatus::Dead;
        worker.last_heartbeat = Utc::now();
        state.upsert_worker(&worker).await?;
    }
    info!(worker_id = %worker_id, "worker stopped");
    Ok(())
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter().position(|a| a == name).and_then(|i| args.get(i + 1)).map(String::as_str)
}

fn acquire_lock(lock_path: &std::path::Path) -> Result<std::fs::File, DaemonError> {
    if let Some(parent) = lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let lock_file =
        std::fs::OpenOptions::new().write(true).create(true).truncate(false).open(lock_path)?;
    lock_file.try_lock_exclusive().map_err(DaemonError::LockFailed)?;
    lock_file.set_len(0)?;
    use std::io::Write;
    let mut lock_file = lock_file;
    writeln!(lock_file, "{}", std::process::id())?;
    Ok(lock_file)
}

/// Maximum log file size before rotation (10 MB).
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;
const MAX_ROTATED_LOGS: u32 = 3;

fn rotate_log_if_needed(log_path: &std::path::Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

fn setup_logging(config: &DaemonConfig) -> Result<tracing_appender::non_blocking::WorkerGuard, DaemonError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or(DaemonError::NoStateDir)?,
        config.log_path.file_name().ok_or(DaemonError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    Ok(guard)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
