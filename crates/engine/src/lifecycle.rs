// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker heartbeat timeout mapping and three-probe liveness.

use chrono::{DateTime, Utc};

/// `heartbeat_timeout_for_task_type` from spec.md §4.4: prefix match on
/// the normalized (uppercase) task type, falling back to a default.
pub fn heartbeat_timeout_for_task_type(task_type: &str) -> chrono::Duration {
    const SHORT: &[&str] = &["LINT", "FORMAT", "REVIEW", "DOC", "QUICK"];
    const LONG: &[&str] = &[
        "TEST",
        "COVERAGE",
        "FULL_BUILD",
        "SECURITY",
        "AUDIT",
        "RESEARCH",
        "ANALYSIS",
    ];

    if SHORT.iter().any(|p| task_type.starts_with(p)) {
        chrono::Duration::seconds(300)
    } else if LONG.iter().any(|p| task_type.starts_with(p)) {
        chrono::Duration::seconds(1800)
    } else {
        chrono::Duration::seconds(900)
    }
}

/// The three liveness probes from spec.md §4.4's single-host model. Each
/// probe is independent; the caller (recovery loop) treats any failing
/// probe as "suspect" and confirms via DB state rather than acting on a
/// single probe alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivenessProbes {
    pub pid_reachable: bool,
    pub state_file_fresh: bool,
    pub heartbeat_fresh: bool,
}

impl LivenessProbes {
    pub fn all_pass(&self) -> bool {
        self.pid_reachable && self.state_file_fresh && self.heartbeat_fresh
    }

    pub fn any_fail(&self) -> bool {
        !self.all_pass()
    }
}

/// Whether a PID is reachable. On Linux, `/proc/<pid>` existing is
/// equivalent to `kill(pid, 0)` succeeding without needing `unsafe` FFI.
#[cfg(target_os = "linux")]
pub fn pid_reachable(pid: u32) -> bool {
    std::path::Path::new(&format!("/proc/{pid}")).exists()
}

#[cfg(not(target_os = "linux"))]
pub fn pid_reachable(_pid: u32) -> bool {
    true
}

pub fn state_file_fresh(mtime: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - mtime < chrono::Duration::seconds(60)
}

pub fn heartbeat_fresh(last_heartbeat: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - last_heartbeat < chrono::Duration::seconds(120)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
