// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sdlc_adapters::PathGuard;
use tempfile::tempdir;

fn guard_for(bin_dir: &std::path::Path) -> PathGuard {
    let raw = bin_dir.to_string_lossy().to_string();
    PathGuard::new(&raw, &[bin_dir.to_path_buf()])
}

#[cfg(unix)]
fn write_script(dir: &std::path::Path, name: &str, exit_code: i32) {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\nexit {exit_code}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn successful_tool_run_passes_gate() {
    let bin_dir = tempdir().unwrap();
    write_script(bin_dir.path(), "good-tool", 0);
    let guard = guard_for(bin_dir.path());
    let workdir = tempdir().unwrap();
    let runner = GateRunner::new(&guard, workdir.path(), false);

    let cmd = GateCommand { kind: GateKind::Tests, tool: "good-tool".into(), args: vec![] };
    let results = runner.run_all(&[cmd], Utc::now()).await;
    assert_eq!(results.len(), 1);
    assert!(results[0].passed);
}

#[cfg(unix)]
#[tokio::test]
async fn failing_tool_fails_gate() {
    let bin_dir = tempdir().unwrap();
    write_script(bin_dir.path(), "bad-tool", 1);
    let guard = guard_for(bin_dir.path());
    let workdir = tempdir().unwrap();
    let runner = GateRunner::new(&guard, workdir.path(), false);

    let cmd = GateCommand { kind: GateKind::Lint, tool: "bad-tool".into(), args: vec![] };
    let results = runner.run_all(&[cmd], Utc::now()).await;
    assert!(!results[0].passed);
}

#[tokio::test]
async fn unresolvable_tool_fails_gate() {
    let bin_dir = tempdir().unwrap();
    let guard = guard_for(bin_dir.path());
    let workdir = tempdir().unwrap();
    let runner = GateRunner::new(&guard, workdir.path(), false);

    let cmd = GateCommand { kind: GateKind::Security, tool: "nonexistent-tool".into(), args: vec![] };
    let results = runner.run_all(&[cmd], Utc::now()).await;
    assert!(!results[0].passed);
    assert!(results[0].detail.contains("tool resolution failed"));
}

#[cfg(unix)]
#[tokio::test]
async fn strict_mode_stops_at_first_failure() {
    let bin_dir = tempdir().unwrap();
    write_script(bin_dir.path(), "bad-tool", 1);
    write_script(bin_dir.path(), "good-tool", 0);
    let guard = guard_for(bin_dir.path());
    let workdir = tempdir().unwrap();
    let runner = GateRunner::new(&guard, workdir.path(), true);

    let commands = vec![
        GateCommand { kind: GateKind::Lint, tool: "bad-tool".into(), args: vec![] },
        GateCommand { kind: GateKind::Build, tool: "good-tool".into(), args: vec![] },
    ];
    let results = runner.run_all(&commands, Utc::now()).await;
    assert_eq!(results.len(), 1);
    assert!(!results[0].passed);
}

#[cfg(unix)]
#[tokio::test]
async fn non_strict_mode_runs_every_gate() {
    let bin_dir = tempdir().unwrap();
    write_script(bin_dir.path(), "bad-tool", 1);
    write_script(bin_dir.path(), "good-tool", 0);
    let guard = guard_for(bin_dir.path());
    let workdir = tempdir().unwrap();
    let runner = GateRunner::new(&guard, workdir.path(), false);

    let commands = vec![
        GateCommand { kind: GateKind::Lint, tool: "bad-tool".into(), args: vec![] },
        GateCommand { kind: GateKind::Build, tool: "good-tool".into(), args: vec![] },
    ];
    let results = runner.run_all(&commands, Utc::now()).await;
    assert_eq!(results.len(), 2);
    assert!(!results[0].passed);
    assert!(results[1].passed);
}
