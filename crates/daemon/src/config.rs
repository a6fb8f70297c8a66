// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: on-disk paths plus the engine tunables, loaded
//! from a TOML file with `SDLC_*` environment-variable overrides.

use crate::env;
use crate::error::DaemonError;
use sdlc_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default seconds the supervisor waits for a worker to release its task
/// after a termination signal before force-killing it (spec.md's
/// `POOL_SHUTDOWN_TIMEOUT`).
const DEFAULT_POOL_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Root state directory (e.g. `~/.local/state/sdlc`).
    pub state_dir: PathBuf,
    /// Path to the embedded SQL state database.
    pub db_path: PathBuf,
    /// Path to the append-only event log directory.
    pub events_dir: PathBuf,
    /// Path to the circuit breaker state file.
    pub breaker_path: PathBuf,
    /// Path to per-task workspaces.
    pub workspace_root: PathBuf,
    /// Path to the supervisor's rejection-feedback inbox.
    pub inbox_path: PathBuf,
    /// Path to the daemon's own lock/PID file.
    pub lock_path: PathBuf,
    /// Path to the daemon's log file.
    pub log_path: PathBuf,
    /// Seconds to wait for a stopping worker before force-killing it.
    pub pool_shutdown_timeout_secs: u64,
    /// Engine-wide tunables (shard count, retry budgets, gate floors, …).
    pub engine: EngineConfig,
}

/// On-disk TOML shape: every field optional, falling back to
/// [`EngineConfig::default`] / [`DEFAULT_POOL_SHUTDOWN_TIMEOUT_SECS`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct FileConfig {
    #[serde(default)]
    pool_shutdown_timeout_secs: Option<u64>,
    #[serde(default)]
    engine: Option<EngineConfig>,
}

impl DaemonConfig {
    /// Load configuration for the user-level daemon: fixed paths under
    /// the resolved state directory, a `config.toml` there if present,
    /// then `SDLC_*` environment overrides, then floor validation.
    pub fn load() -> Result<Self, DaemonError> {
        let state_dir = env::state_dir()?;

        let file_config = Self::read_file_config(&state_dir.join("config.toml"))?;
        let mut engine = file_config.engine.unwrap_or_default();
        apply_env_overrides(&mut engine);
        let engine = engine.validate().map_err(DaemonError::Engine)?;

        let pool_shutdown_timeout_secs = env::override_u64("POOL_SHUTDOWN_TIMEOUT")
            .or(file_config.pool_shutdown_timeout_secs)
            .unwrap_or(DEFAULT_POOL_SHUTDOWN_TIMEOUT_SECS);

        Ok(Self {
            db_path: state_dir.join("state.db"),
            events_dir: state_dir.join("events"),
            breaker_path: state_dir.join("breaker.json"),
            workspace_root: state_dir.join("workspaces"),
            inbox_path: state_dir.join("inbox"),
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            pool_shutdown_timeout_secs,
            engine,
            state_dir,
        })
    }

    fn read_file_config(path: &std::path::Path) -> Result<FileConfig, DaemonError> {
        let Ok(raw) = std::fs::read_to_string(path) else {
            return Ok(FileConfig::default());
        };
        toml::from_str(&raw).map_err(|e| DaemonError::Config(e.to_string()))
    }
}

/// Applies `SDLC_SHARD_COUNT`, `SDLC_POOL_SIZE`, … overrides on top of
/// whatever the TOML file (or defaults) supplied. Validation/clamping to
/// the hardcoded floors happens afterward in [`EngineConfig::validate`].
fn apply_env_overrides(engine: &mut EngineConfig) {
    if let Some(v) = env::override_u32("SHARD_COUNT") {
        engine.shard_count = v;
    }
    if let Some(v) = env::override_u32("POOL_SIZE") {
        engine.pool_size = v;
    }
    if let Some(v) = env::override_u64("POOL_CHECK_INTERVAL") {
        engine.pool_check_interval_secs = v;
    }
    if let Some(v) = env::override_u64("RECOVERY_INTERVAL") {
        engine.recovery_interval_secs = v;
    }
    if let Some(v) = env::override_u64("REBALANCE_THRESHOLD") {
        engine.rebalance_threshold = v;
    }
    if let Some(v) = env::override_u32("EH_MAX_RETRIES") {
        engine.eh_max_retries = v;
    }
    if let Some(v) = env::override_f64("COVERAGE_THRESHOLD") {
        engine.coverage_threshold = v;
    }
    if let Some(v) = env::override_f64("MIN_SECURITY_SCORE") {
        engine.min_security_score = v;
    }
    if let Some(v) = env::override_u32("MAX_CRITICAL_VULNS") {
        engine.max_critical_vulns = v;
    }
    if let Some(v) = env::override_bool("STRICT_MODE") {
        engine.strict_mode = v;
    }
    if let Some(v) = env::override_u32("MAX_WORKER_CRASHES") {
        engine.max_worker_crashes = v;
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
