// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-wide tunables. Defaults mirror the enumerated configuration
//! surface; `validate` refuses to start with a quality-gate floor
//! configured below its hardcoded minimum rather than silently clamping
//! at the call site — the clamp itself happens once, here, and is logged.

use crate::error::EngineError;
use sdlc_core::BackendFamily;
use serde::{Deserialize, Serialize};

pub const MIN_COVERAGE_FLOOR: f64 = 70.0;
pub const MIN_SECURITY_SCORE_FLOOR: f64 = 60.0;
pub const MAX_CRITICAL_VULNS_CEILING: u32 = 0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub shard_count: u32,
    pub pool_size: u32,
    pub pool_check_interval_secs: u64,

    pub max_concurrent_tasks_per_worker: u32,
    pub max_running_tasks_per_user: u32,
    pub max_tasks_per_user: u32,
    pub anti_starvation_enabled: bool,
    pub anti_starvation_backoff_secs: u64,
    pub per_user_limits_enabled: bool,

    pub cb_failure_threshold: u32,
    pub cb_cooldown_seconds: i64,
    pub cb_half_open_max_calls: u32,

    pub recovery_interval_secs: u64,
    pub recovery_timeout_secs: i64,
    pub worker_stale_heartbeat_minutes: i64,
    pub worker_stale_grace_multiplier: f64,

    pub eh_max_retries: u32,
    pub eh_backoff_base_secs: f64,
    pub eh_backoff_max_secs: f64,
    pub eh_backoff_multiplier: f64,
    pub eh_jitter: bool,
    pub eh_retry_budget: u32,
    pub eh_fallback_order: Vec<BackendFamily>,

    pub coverage_threshold: f64,
    pub min_security_score: f64,
    pub max_critical_vulns: u32,
    pub strict_mode: bool,

    pub max_worker_crashes: u32,
    pub respawn_cooldown_secs: u64,

    pub rebalance_threshold: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shard_count: 3,
            pool_size: 3,
            pool_check_interval_secs: 30,

            max_concurrent_tasks_per_worker: 3,
            max_running_tasks_per_user: 10,
            max_tasks_per_user: 25,
            anti_starvation_enabled: true,
            anti_starvation_backoff_secs: 2,
            per_user_limits_enabled: true,

            cb_failure_threshold: 3,
            cb_cooldown_seconds: 60,
            cb_half_open_max_calls: 1,

            recovery_interval_secs: 60,
            recovery_timeout_secs: 900,
            worker_stale_heartbeat_minutes: 5,
            worker_stale_grace_multiplier: 1.5,

            eh_max_retries: 3,
            eh_backoff_base_secs: 5.0,
            eh_backoff_max_secs: 300.0,
            eh_backoff_multiplier: 2.0,
            eh_jitter: true,
            eh_retry_budget: 5,
            eh_fallback_order: vec![
                BackendFamily::FamilyA,
                BackendFamily::FamilyB,
                BackendFamily::FamilyC,
            ],

            coverage_threshold: 80.0,
            min_security_score: 60.0,
            max_critical_vulns: 0,
            strict_mode: true,

            max_worker_crashes: 5,
            respawn_cooldown_secs: 10,

            rebalance_threshold: 5,
        }
    }
}

impl EngineConfig {
    /// Raises any gate threshold configured below its hardcoded floor,
    /// logging the clamp, then refuses to start if the *floor itself*
    /// cannot be met (e.g. `max_critical_vulns` configured above zero
    /// tolerance is a floor violation in the other direction).
    pub fn validate(mut self) -> Result<Self, EngineError> {
        if self.coverage_threshold < MIN_COVERAGE_FLOOR {
            tracing::warn!(
                configured = self.coverage_threshold,
                floor = MIN_COVERAGE_FLOOR,
                "coverage_threshold below floor, raising to floor"
            );
            self.coverage_threshold = MIN_COVERAGE_FLOOR;
        }
        if self.min_security_score < MIN_SECURITY_SCORE_FLOOR {
            tracing::warn!(
                configured = self.min_security_score,
                floor = MIN_SECURITY_SCORE_FLOOR,
                "min_security_score below floor, raising to floor"
            );
            self.min_security_score = MIN_SECURITY_SCORE_FLOOR;
        }
        if self.max_critical_vulns > MAX_CRITICAL_VULNS_CEILING {
            return Err(EngineError::ConfigBelowFloor {
                field: "max_critical_vulns",
                value: self.max_critical_vulns as f64,
                floor: MAX_CRITICAL_VULNS_CEILING as f64,
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
