// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Approval / rejection (spec.md §4.8): on all-gates-pass the task moves
//! to APPROVED; on failure its retry counter is bumped and it moves to
//! REJECTED (retryable) or FAILED once the retry ceiling is hit.
//! Rejections carry structured, per-gate feedback delivered to a
//! supervisor-inbox directory so an operator (or the resubmitting worker)
//! has concrete next steps instead of a bare pass/fail.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::gates::{GateKind, GateResult};
use chrono::{DateTime, Utc};
use sdlc_core::{EventType, Task, TaskState};
use sdlc_storage::{EventStore, StateStore};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Structured feedback for a single failed gate.
#[derive(Debug, Clone, Serialize)]
pub struct GateFeedback {
    pub gate: GateKind,
    pub issue_summary: String,
    pub fix_suggestions: Vec<String>,
    pub common_causes: Vec<String>,
    pub effort_minutes: (u32, u32),
    pub quick_fix_command: String,
}

/// The full rejection/failure report delivered to the inbox.
#[derive(Debug, Clone, Serialize)]
pub struct RejectionFeedback {
    pub task_id: String,
    pub retry_count: u32,
    pub remaining_retries: u32,
    pub permanent: bool,
    pub gates: Vec<GateFeedback>,
    pub resubmit_command: String,
}

/// Outcome of processing a task's gate results.
#[derive(Debug, Clone)]
pub enum ApprovalOutcome {
    Approved,
    Rejected(RejectionFeedback),
    Failed(RejectionFeedback),
}

pub struct Approver {
    state: Arc<StateStore>,
    events: Arc<EventStore>,
    config: EngineConfig,
    inbox_dir: PathBuf,
}

impl Approver {
    pub fn new(state: Arc<StateStore>, events: Arc<EventStore>, config: EngineConfig, inbox_dir: impl Into<PathBuf>) -> Self {
        Self { state, events, config, inbox_dir: inbox_dir.into() }
    }

    pub async fn process(
        &self,
        task: &Task,
        gate_results: &[GateResult],
        now: DateTime<Utc>,
    ) -> Result<ApprovalOutcome, EngineError> {
        let failed: Vec<&GateResult> = gate_results.iter().filter(|g| !g.passed).collect();

        if failed.is_empty() {
            self.state.record_review_outcome(&task.id, TaskState::Approved, false, now).await?;
            self.events.append(
                EventType::TaskApproved,
                Some(task.id.as_str().to_string()),
                "approver",
                json!({ "retry_count": task.retry_count }),
                task.trace_id.clone(),
                now,
            )?;
            info!(task_id = %task.id, "task approved");
            return Ok(ApprovalOutcome::Approved);
        }

        let would_be_retry_count = task.retry_count + 1;
        let permanent = would_be_retry_count >= self.config.eh_max_retries;
        let new_state = if permanent { TaskState::Failed } else { TaskState::Rejected };
        let retry_count =
            self.state.record_review_outcome(&task.id, new_state, true, now).await?;

        let feedback = self.build_feedback(task, &failed, retry_count, permanent);
        self.deliver_to_inbox(&feedback)?;

        let event_type = if permanent { EventType::TaskFailed } else { EventType::TaskRejected };
        self.events.append(
            event_type,
            Some(task.id.as_str().to_string()),
            "approver",
            json!({ "retry_count": retry_count, "failed_gates": failed.iter().map(|g| g.kind.as_str()).collect::<Vec<_>>() }),
            task.trace_id.clone(),
            now,
        )?;
        warn!(task_id = %task.id, retry_count, permanent, "task rejected");

        if permanent {
            Ok(ApprovalOutcome::Failed(feedback))
        } else {
            Ok(ApprovalOutcome::Rejected(feedback))
        }
    }

    fn build_feedback(
        &self,
        task: &Task,
        failed: &[&GateResult],
        retry_count: u32,
        permanent: bool,
    ) -> RejectionFeedback {
        let gates = failed.iter().map(|g| gate_feedback(g)).collect();
        RejectionFeedback {
            task_id: task.id.as_str().to_string(),
            retry_count,
            remaining_retries: self.config.eh_max_retries.saturating_sub(retry_count),
            permanent,
            gates,
            resubmit_command: format!("sdlc resubmit {}", task.id.as_str()),
        }
    }

    fn deliver_to_inbox(&self, feedback: &RejectionFeedback) -> Result<(), EngineError> {
        std::fs::create_dir_all(&self.inbox_dir)?;
        let path = self.inbox_dir.join(format!("{}.json", feedback.task_id));
        let body = serde_json::to_vec_pretty(feedback).map_err(sdlc_storage::StateStoreError::from)?;
        std::fs::write(path, body)?;
        Ok(())
    }
}

/// Per-gate guidance, one entry per `GateKind`. Effort minutes are the
/// spec's 15-180 minute range scaled to how involved a typical fix is.
fn gate_feedback(result: &GateResult) -> GateFeedback {
    let (suggestions, causes, effort, quick_fix): (Vec<&str>, Vec<&str>, (u32, u32), &str) = match result.kind {
        GateKind::Tests => (
            vec!["Re-run the failing test locally with verbose output", "Check for unhandled edge cases introduced by the change"],
            vec!["Off-by-one or boundary condition", "Stale test fixture", "Race in an async test"],
            (20, 90),
            "cargo test -- --nocapture",
        ),
        GateKind::Coverage => (
            vec!["Add tests for the newly introduced branches", "Check for dead code paths inflating the denominator"],
            vec!["New function added without a matching test", "Error-path branches left untested"],
            (30, 120),
            "cargo llvm-cov --summary-only",
        ),
        GateKind::Lint => (
            vec!["Run the linter locally and apply its autofix", "Review suppressed warnings for ones that now apply"],
            vec!["Unused import or variable", "Style drift from the project's lint config"],
            (10, 30),
            "cargo clippy --fix --allow-dirty",
        ),
        GateKind::Types => (
            vec!["Re-run the type checker and address the first reported error", "Check for a signature change not propagated to call sites"],
            vec!["Mismatched generic bound", "Incomplete refactor across module boundaries"],
            (15, 90),
            "cargo check",
        ),
        GateKind::Security => (
            vec!["Review the flagged dependency or code path for the reported CVE", "Pin or upgrade the affected dependency"],
            vec!["Known-vulnerable dependency version", "Unsanitized input reaching a sensitive sink"],
            (30, 180),
            "cargo audit",
        ),
        GateKind::Build => (
            vec!["Inspect the build log for the first error", "Confirm the toolchain/version matches the project's pinned version"],
            vec!["Missing dependency", "Stale lockfile", "Platform-specific conditional compilation gap"],
            (15, 60),
            "cargo build",
        ),
    };

    GateFeedback {
        gate: result.kind,
        issue_summary: format!("{} gate failed: {}", result.kind, truncate(&result.detail, 200)),
        fix_suggestions: suggestions.into_iter().map(String::from).collect(),
        common_causes: causes.into_iter().map(String::from).collect(),
        effort_minutes: effort,
        quick_fix_command: quick_fix.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let cut = s.char_indices().map(|(i, _)| i).take_while(|&i| i <= max).last().unwrap_or(0);
    format!("{}...", &s[..cut])
}

#[cfg(test)]
#[path = "approval_tests.rs"]
mod tests;
