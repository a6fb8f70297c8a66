// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The recovery daemon process: runs [`RecoveryLoop`] on its own cadence,
//! independent of the supervisor's cycle.

use crate::error::DaemonError;
use chrono::Utc;
use sdlc_engine::{EngineConfig, RecoveryLoop, RecoveryReport};
use sdlc_storage::{EventStore, StateStore};
use std::sync::Arc;
use tracing::info;

pub struct RecoveryDaemon {
    loop_: RecoveryLoop,
    interval_secs: u64,
}

impl RecoveryDaemon {
    pub fn new(state: Arc<StateStore>, events: Arc<EventStore>, config: EngineConfig) -> Self {
        let interval_secs = config.recovery_interval_secs;
        Self { loop_: RecoveryLoop::new(state, events, config), interval_secs }
    }

    pub async fn run_once(&self) -> Result<RecoveryReport, DaemonError> {
        let report = self.loop_.run_once(Utc::now()).await?;
        if report.stale_recovered > 0 || report.zombies_recovered > 0 || report.workers_marked_dead > 0 {
            info!(
                stale = report.stale_recovered,
                zombies = report.zombies_recovered,
                dead_workers = report.workers_marked_dead,
                "recovery pass made changes"
            );
        }
        Ok(report)
    }

    /// Runs [`Self::run_once`] forever, sleeping `interval_secs` between
    /// passes. Intended to run as its own OS process per spec.md's
    /// scheduling model.
    pub async fn run_forever(&self) -> ! {
        loop {
            if let Err(e) = self.run_once().await {
                tracing::error!(error = %e, "recovery pass failed");
            }
            tokio::time::sleep(std::time::Duration::from_secs(self.interval_secs)).await;
        }
    }
}
