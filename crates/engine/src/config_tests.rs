// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults_pass_validation_unchanged() {
    let cfg = EngineConfig::default().validate().unwrap();
    assert_eq!(cfg.coverage_threshold, 80.0);
}

#[test]
fn coverage_below_floor_is_raised_not_rejected() {
    let mut cfg = EngineConfig::default();
    cfg.coverage_threshold = 50.0;
    let validated = cfg.validate().unwrap();
    assert_eq!(validated.coverage_threshold, MIN_COVERAGE_FLOOR);
}

#[test]
fn security_score_below_floor_is_raised() {
    let mut cfg = EngineConfig::default();
    cfg.min_security_score = 10.0;
    let validated = cfg.validate().unwrap();
    assert_eq!(validated.min_security_score, MIN_SECURITY_SCORE_FLOOR);
}

#[test]
fn critical_vulns_above_ceiling_refuses_to_start() {
    let mut cfg = EngineConfig::default();
    cfg.max_critical_vulns = 1;
    assert!(cfg.validate().is_err());
}
