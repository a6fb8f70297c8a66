// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-phase artifact requirements and gate validation (spec.md §4.8).
//! Called at every transition attempt: confirm registered artifacts
//! exist and are non-empty, run the phase-specific content check, then
//! either refuse (collecting reasons for the rejection-feedback
//! generator) or let the transition proceed.

use crate::config::EngineConfig;
use crate::error::EngineError;
use regex::Regex;
use sdlc_core::{Phase, Task, TaskId};
use sdlc_storage::StateStore;
use std::path::Path;
use std::sync::Arc;

/// Minimum non-empty-line counts per phase's primary document.
fn min_lines_for(phase: Phase) -> Option<usize> {
    match phase {
        Phase::Brainstorm => Some(3),
        Phase::Document => Some(5),
        Phase::Plan => Some(10),
        _ => None,
    }
}

fn required_filename(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::Brainstorm => Some("requirements.md"),
        Phase::Document => Some("spec.md"),
        Phase::Plan => Some("tech_design.md"),
        _ => None,
    }
}

/// A task's test-result artifact, read from `<workspace>/test_result.json`
/// during EXECUTE gate validation.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TestResult {
    pub pass: bool,
    pub coverage: f64,
}

/// A task's progress record, read from `<workspace>/progress.json` during
/// TRACK gate validation.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ProgressRecord {
    pub progress_percent: f64,
    #[serde(default)]
    pub metrics: serde_json::Map<String, serde_json::Value>,
}

pub struct PhaseEngine {
    state: Arc<StateStore>,
    config: EngineConfig,
}

impl PhaseEngine {
    pub fn new(state: Arc<StateStore>, config: EngineConfig) -> Self {
        Self { state, config }
    }

    /// Validate the current phase's gate for `task`, within `workspace`
    /// (the task's working directory on disk). Returns the list of
    /// failure reasons; empty means the gate passed.
    pub async fn validate_phase_gate(&self, task: &Task, workspace: &Path) -> Result<Vec<String>, EngineError> {
        let mut reasons = Vec::new();

        if let Some(filename) = required_filename(task.phase) {
            reasons.extend(self.check_document_artifact(&task.id, task.phase, filename, workspace).await?);
        }

        match task.phase {
            Phase::Execute => reasons.extend(self.check_execute_gate(workspace)?),
            Phase::Track => reasons.extend(self.check_track_gate(workspace)?),
            _ => {}
        }

        Ok(reasons)
    }

    async fn check_document_artifact(
        &self,
        task_id: &TaskId,
        phase: Phase,
        filename: &str,
        workspace: &Path,
    ) -> Result<Vec<String>, EngineError> {
        let mut reasons = Vec::new();
        let artifacts = self.state.artifacts_for_phase(task_id.as_str(), phase).await?;
        let Some(artifact) = artifacts.iter().find(|a| a.path.file_name().map(|f| f == filename).unwrap_or(false))
        else {
            reasons.push(format!("missing required artifact {filename} for phase {phase}"));
            return Ok(reasons);
        };

        let full_path = workspace.join(&artifact.path);
        let contents = match std::fs::read_to_string(&full_path) {
            Ok(c) => c,
            Err(e) => {
                reasons.push(format!("artifact {filename} unreadable: {e}"));
                return Ok(reasons);
            }
        };

        if contents.trim().is_empty() {
            reasons.push(format!("artifact {filename} is empty"));
            return Ok(reasons);
        }

        if let Some(min_lines) = min_lines_for(phase) {
            let non_empty = contents.lines().filter(|l| !l.trim().is_empty()).count();
            if non_empty < min_lines {
                reasons.push(format!(
                    "artifact {filename} has {non_empty} non-empty lines, needs at least {min_lines}"
                ));
            }
        }

        if phase == Phase::Document {
            #[allow(clippy::expect_used)]
            let acceptance_re = Regex::new(r"(?im)^#+\s*acceptance criteria")
                .expect("constant regex pattern is valid");
            if !acceptance_re.is_match(&contents) {
                reasons.push("spec.md missing an acceptance-criteria section".to_string());
            }
        }

        if phase == Phase::Plan {
            for section in ["approach", "files", "dependencies"] {
                #[allow(clippy::expect_used)]
                let re = Regex::new(&format!(r"(?im)^#+\s*{section}"))
                    .expect("section name is one of a fixed known-valid set");
                if !re.is_match(&contents) {
                    reasons.push(format!("tech_design.md missing a {section} section"));
                }
            }
        }

        Ok(reasons)
    }

    fn check_execute_gate(&self, workspace: &Path) -> Result<Vec<String>, EngineError> {
        let mut reasons = Vec::new();
        let path = workspace.join("test_result.json");
        let Ok(contents) = std::fs::read_to_string(&path) else {
            reasons.push("no test result recorded for EXECUTE".to_string());
            return Ok(reasons);
        };
        let result: Result<TestResult, _> = serde_json::from_str(&contents);
        match result {
            Ok(result) => {
                if !result.pass {
                    reasons.push("test result reports pass=false".to_string());
                }
                if !(0.0..=100.0).contains(&result.coverage) {
                    reasons.push(format!("coverage {} out of range 0..=100", result.coverage));
                } else if result.coverage < self.config.coverage_threshold {
                    reasons.push(format!(
                        "coverage {} below threshold {}",
                        result.coverage, self.config.coverage_threshold
                    ));
                }
            }
            Err(e) => reasons.push(format!("malformed test_result.json: {e}")),
        }
        Ok(reasons)
    }

    fn check_track_gate(&self, workspace: &Path) -> Result<Vec<String>, EngineError> {
        let mut reasons = Vec::new();
        let path = workspace.join("progress.json");
        let Ok(contents) = std::fs::read_to_string(&path) else {
            reasons.push("no progress recorded for TRACK".to_string());
            return Ok(reasons);
        };
        let result: Result<ProgressRecord, _> = serde_json::from_str(&contents);
        match result {
            Ok(record) => {
                if record.metrics.is_empty() {
                    reasons.push("TRACK progress has no metrics recorded".to_string());
                }
            }
            Err(e) => reasons.push(format!("malformed progress.json: {e}")),
        }
        Ok(reasons)
    }
}

#[cfg(test)]
#[path = "phase_engine_tests.rs"]
mod tests;
