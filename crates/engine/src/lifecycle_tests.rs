// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    lint = { "LINT_CHECK", 300 },
    format = { "FORMAT_CODE", 300 },
    review = { "REVIEW_PR", 300 },
    doc = { "DOC_UPDATE", 300 },
    quick = { "QUICK_FIX", 300 },
    test_type = { "TEST_SUITE", 1800 },
    coverage = { "COVERAGE_CHECK", 1800 },
    security = { "SECURITY_SCAN", 1800 },
    default_type = { "IMPLEMENT", 900 },
)]
fn maps_task_type_prefix_to_timeout(task_type: &str, expected_secs: i64) {
    assert_eq!(heartbeat_timeout_for_task_type(task_type), chrono::Duration::seconds(expected_secs));
}

#[test]
fn current_process_pid_is_reachable() {
    assert!(pid_reachable(std::process::id()));
}

#[test]
fn state_file_within_sixty_seconds_is_fresh() {
    let now = Utc::now();
    assert!(state_file_fresh(now - chrono::Duration::seconds(59), now));
    assert!(!state_file_fresh(now - chrono::Duration::seconds(61), now));
}

#[test]
fn heartbeat_within_two_minutes_is_fresh() {
    let now = Utc::now();
    assert!(heartbeat_fresh(now - chrono::Duration::seconds(119), now));
    assert!(!heartbeat_fresh(now - chrono::Duration::seconds(121), now));
}

#[test]
fn any_failing_probe_marks_suspect() {
    let probes = LivenessProbes { pid_reachable: true, state_file_fresh: false, heartbeat_fresh: true };
    assert!(probes.any_fail());
    assert!(!probes.all_pass());
}
