// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Quality gates (spec.md §4.8): Tests, Coverage, Lint, Types, Security,
//! Build. Each gate runs a configured tool through [`PathGuard`]-sanitized
//! PATH resolution and [`run_with_timeout`], then classifies the outcome.
//! In strict mode, a gate whose tool is unconfigured or unresolvable fails
//! outright rather than being skipped.

use chrono::{DateTime, Utc};
use sdlc_adapters::{run_with_timeout, PathGuard, GATE_TIMEOUT};
use serde::Serialize;
use std::fmt;
use tokio::process::Command;

/// The six fixed quality gates run at EXECUTE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    Tests,
    Coverage,
    Lint,
    Types,
    Security,
    Build,
}

impl GateKind {
    pub const ALL: [GateKind; 6] = [
        GateKind::Tests,
        GateKind::Coverage,
        GateKind::Lint,
        GateKind::Types,
        GateKind::Security,
        GateKind::Build,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GateKind::Tests => "tests",
            GateKind::Coverage => "coverage",
            GateKind::Lint => "lint",
            GateKind::Types => "types",
            GateKind::Security => "security",
            GateKind::Build => "build",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single gate's tool invocation, resolved via [`PathGuard`].
#[derive(Debug, Clone)]
pub struct GateCommand {
    pub kind: GateKind,
    pub tool: String,
    pub args: Vec<String>,
}

/// Outcome of running one gate.
#[derive(Debug, Clone, Serialize)]
pub struct GateResult {
    pub kind: GateKind,
    pub passed: bool,
    pub detail: String,
    pub ran_at: DateTime<Utc>,
}

pub struct GateRunner<'a> {
    guard: &'a PathGuard,
    workdir: std::path::PathBuf,
    strict_mode: bool,
}

impl<'a> GateRunner<'a> {
    pub fn new(guard: &'a PathGuard, workdir: impl Into<std::path::PathBuf>, strict_mode: bool) -> Self {
        Self { guard, workdir: workdir.into(), strict_mode }
    }

    /// Run every configured gate, stopping at the first failure when
    /// `strict_mode` is on (spec.md: strict mode treats the gate chain as
    /// fail-fast); otherwise runs them all and reports every result.
    pub async fn run_all(&self, commands: &[GateCommand], now: DateTime<Utc>) -> Vec<GateResult> {
        let mut results = Vec::with_capacity(commands.len());
        for command in commands {
            let result = self.run_one(command, now).await;
            let failed = !result.passed;
            results.push(result);
            if failed && self.strict_mode {
                break;
            }
        }
        results
    }

    async fn run_one(&self, command: &GateCommand, now: DateTime<Utc>) -> GateResult {
        let tool_path = match self.guard.resolve(&command.tool) {
            Ok(path) => path,
            Err(e) => {
                return GateResult {
                    kind: command.kind,
                    passed: false,
                    detail: format!("tool resolution failed: {e}"),
                    ran_at: now,
                };
            }
        };

        let mut cmd = Command::new(tool_path);
        cmd.args(&command.args).current_dir(&self.workdir);

        match run_with_timeout(cmd, GATE_TIMEOUT, command.kind.as_str()).await {
            Ok(output) => {
                let passed = output.status.success();
                let detail = if passed {
                    "ok".to_string()
                } else {
                    String::from_utf8_lossy(&output.stderr).trim().chars().take(2000).collect()
                };
                GateResult { kind: command.kind, passed, detail, ran_at: now }
            }
            Err(message) => GateResult { kind: command.kind, passed: false, detail: message, ran_at: now },
        }
    }
}

#[cfg(test)]
#[path = "gates_tests.rs"]
mod tests;
