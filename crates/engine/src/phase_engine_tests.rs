// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use sdlc_core::test_support::TaskBuilder;
use std::sync::Arc;
use tempfile::tempdir;

async fn harness() -> (Arc<StateStore>, tempfile::TempDir) {
    let state = Arc::new(StateStore::open_in_memory().await.unwrap());
    let workspace = tempdir().unwrap();
    (state, workspace)
}

async fn register(state: &StateStore, task_id: &sdlc_core::TaskId, phase: Phase, path: &str, now: chrono::DateTime<Utc>) {
    state
        .register_artifact(&PhaseArtifact {
            task_id: task_id.clone(),
            phase,
            path: path.into(),
            artifact_type: sdlc_core::ArtifactType::Document,
            checksum: "deadbeef".into(),
            size: 10,
            verified_at: now,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn brainstorm_missing_artifact_fails_gate() {
    let (state, workspace) = harness().await;
    let task = TaskBuilder::new("t1").build(); // default phase is Brainstorm
    let engine = PhaseEngine::new(state, EngineConfig::default());
    let reasons = engine.validate_phase_gate(&task, workspace.path()).await.unwrap();
    assert!(!reasons.is_empty());
}

#[tokio::test]
async fn brainstorm_with_sufficient_content_passes() {
    let (state, workspace) = harness().await;
    let now = Utc::now();
    let task = TaskBuilder::new("t1").build();
    register(&state, &task.id, Phase::Brainstorm, "requirements.md", now).await;
    std::fs::write(workspace.path().join("requirements.md"), "line one\nline two\nline three\n").unwrap();

    let engine = PhaseEngine::new(state, EngineConfig::default());
    let reasons = engine.validate_phase_gate(&task, workspace.path()).await.unwrap();
    assert!(reasons.is_empty(), "{reasons:?}");
}

#[tokio::test]
async fn document_without_acceptance_criteria_section_fails() {
    let (state, workspace) = harness().await;
    let now = Utc::now();
    let mut task = TaskBuilder::new("t1").build();
    task.phase = Phase::Document;
    register(&state, &task.id, Phase::Document, "spec.md", now).await;
    std::fs::write(
        workspace.path().join("spec.md"),
        "# Overview\nline\nline\nline\nline\n",
    )
    .unwrap();

    let engine = PhaseEngine::new(state, EngineConfig::default());
    let reasons = engine.validate_phase_gate(&task, workspace.path()).await.unwrap();
    assert!(reasons.iter().any(|r| r.contains("acceptance")));
}

#[tokio::test]
async fn document_with_acceptance_criteria_section_passes() {
    let (state, workspace) = harness().await;
    let now = Utc::now();
    let mut task = TaskBuilder::new("t1").build();
    task.phase = Phase::Document;
    register(&state, &task.id, Phase::Document, "spec.md", now).await;
    std::fs::write(
        workspace.path().join("spec.md"),
        "# Overview\nline\nline\n# Acceptance Criteria\n- must work\nline\n",
    )
    .unwrap();

    let engine = PhaseEngine::new(state, EngineConfig::default());
    let reasons = engine.validate_phase_gate(&task, workspace.path()).await.unwrap();
    assert!(reasons.is_empty(), "{reasons:?}");
}

#[tokio::test]
async fn execute_gate_requires_coverage_at_or_above_threshold() {
    let (state, workspace) = harness().await;
    let mut task = TaskBuilder::new("t1").build();
    task.phase = Phase::Execute;
    std::fs::write(
        workspace.path().join("test_result.json"),
        r#"{"pass": true, "coverage": 55.0}"#,
    )
    .unwrap();

    let engine = PhaseEngine::new(state, EngineConfig::default());
    let reasons = engine.validate_phase_gate(&task, workspace.path()).await.unwrap();
    assert!(reasons.iter().any(|r| r.contains("below threshold")));
}

#[tokio::test]
async fn execute_gate_passes_with_passing_tests_and_sufficient_coverage() {
    let (state, workspace) = harness().await;
    let mut task = TaskBuilder::new("t1").build();
    task.phase = Phase::Execute;
    std::fs::write(
        workspace.path().join("test_result.json"),
        r#"{"pass": true, "coverage": 92.5}"#,
    )
    .unwrap();

    let engine = PhaseEngine::new(state, EngineConfig::default());
    let reasons = engine.validate_phase_gate(&task, workspace.path()).await.unwrap();
    assert!(reasons.is_empty(), "{reasons:?}");
}

#[tokio::test]
async fn track_gate_requires_at_least_one_metric() {
    let (state, workspace) = harness().await;
    let mut task = TaskBuilder::new("t1").build();
    task.phase = Phase::Track;
    std::fs::write(
        workspace.path().join("progress.json"),
        r#"{"progress_percent": 40.0, "metrics": {}}"#,
    )
    .unwrap();

    let engine = PhaseEngine::new(state, EngineConfig::default());
    let reasons = engine.validate_phase_gate(&task, workspace.path()).await.unwrap();
    assert!(reasons.iter().any(|r| r.contains("no metrics")));
}
