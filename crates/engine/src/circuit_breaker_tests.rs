// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

fn breaker(dir: &std::path::Path) -> BreakerStore {
    BreakerStore::open(dir).unwrap()
}

#[test]
fn closed_breaker_admits_calls() {
    let dir = tempdir().unwrap();
    let store = breaker(dir.path());
    let cfg = EngineConfig::default();
    let cb = CircuitBreaker::new(&store, &cfg);
    assert_eq!(cb.call_allowed(BackendFamily::FamilyA, Utc::now()).unwrap(), Admission::Allow);
}

#[test]
fn threshold_minus_one_failures_stays_closed_then_trips_open() {
    let dir = tempdir().unwrap();
    let store = breaker(dir.path());
    let cfg = EngineConfig::default(); // threshold 3
    let cb = CircuitBreaker::new(&store, &cfg);
    let now = Utc::now();

    cb.record_failure(BackendFamily::FamilyA, now).unwrap();
    let snap = cb.record_failure(BackendFamily::FamilyA, now).unwrap();
    assert_eq!(snap.state, BreakerStateKind::Closed);

    let snap = cb.record_failure(BackendFamily::FamilyA, now).unwrap();
    assert_eq!(snap.state, BreakerStateKind::Open);
}

#[test]
fn open_breaker_denies_within_cooldown_and_admits_one_probe_after() {
    let dir = tempdir().unwrap();
    let store = breaker(dir.path());
    let cfg = EngineConfig::default(); // cooldown 60s
    let cb = CircuitBreaker::new(&store, &cfg);
    let t0 = Utc::now();

    for _ in 0..3 {
        cb.record_failure(BackendFamily::FamilyA, t0).unwrap();
    }

    let mid_cooldown = t0 + chrono::Duration::seconds(30);
    assert_eq!(cb.call_allowed(BackendFamily::FamilyA, mid_cooldown).unwrap(), Admission::Deny);

    let past_cooldown = t0 + chrono::Duration::seconds(61);
    assert_eq!(cb.call_allowed(BackendFamily::FamilyA, past_cooldown).unwrap(), Admission::Allow);
    // second concurrent probe denied at the default HALF_OPEN_MAX_CALLS=1
    assert_eq!(cb.call_allowed(BackendFamily::FamilyA, past_cooldown).unwrap(), Admission::Deny);
}

#[test]
fn half_open_success_resets_to_closed() {
    let dir = tempdir().unwrap();
    let store = breaker(dir.path());
    let cfg = EngineConfig::default();
    let cb = CircuitBreaker::new(&store, &cfg);
    let t0 = Utc::now();

    for _ in 0..3 {
        cb.record_failure(BackendFamily::FamilyA, t0).unwrap();
    }
    let past_cooldown = t0 + chrono::Duration::seconds(61);
    cb.call_allowed(BackendFamily::FamilyA, past_cooldown).unwrap();

    let snap = cb.record_success(BackendFamily::FamilyA, past_cooldown).unwrap();
    assert_eq!(snap.state, BreakerStateKind::Closed);
    assert_eq!(snap.failure_count, 0);
}

#[test]
fn half_open_failure_reopens_and_resets_cooldown() {
    let dir = tempdir().unwrap();
    let store = breaker(dir.path());
    let cfg = EngineConfig::default();
    let cb = CircuitBreaker::new(&store, &cfg);
    let t0 = Utc::now();

    for _ in 0..3 {
        cb.record_failure(BackendFamily::FamilyA, t0).unwrap();
    }
    let past_cooldown = t0 + chrono::Duration::seconds(61);
    cb.call_allowed(BackendFamily::FamilyA, past_cooldown).unwrap();

    let snap = cb.record_failure(BackendFamily::FamilyA, past_cooldown).unwrap();
    assert_eq!(snap.state, BreakerStateKind::Open);
    assert_eq!(snap.last_failure, Some(past_cooldown));
}
