// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn grows_exponentially_without_jitter() {
    let policy = BackoffPolicy { jitter: false, ..Default::default() };
    assert_eq!(policy.delay_for_attempt(1).as_secs_f64(), 5.0);
    assert_eq!(policy.delay_for_attempt(2).as_secs_f64(), 10.0);
    assert_eq!(policy.delay_for_attempt(3).as_secs_f64(), 20.0);
}

#[test]
fn caps_at_configured_maximum() {
    let policy = BackoffPolicy { jitter: false, ..Default::default() };
    let delay = policy.delay_for_attempt(20).as_secs_f64();
    assert_eq!(delay, policy.cap_secs);
}

#[test]
fn jitter_stays_within_twenty_five_percent() {
    let policy = BackoffPolicy::default();
    for attempt in 1..8 {
        let base = policy.base_secs * policy.multiplier.powi(attempt as i32 - 1);
        let capped = base.min(policy.cap_secs);
        let delay = policy.delay_for_attempt(attempt).as_secs_f64();
        assert!(delay >= capped * 0.75 - 0.001, "attempt {attempt}: {delay} < {}", capped * 0.75);
        assert!(delay <= capped * 1.25 + 0.001, "attempt {attempt}: {delay} > {}", capped * 1.25);
    }
}

#[test]
fn attempt_zero_is_treated_as_attempt_one() {
    let policy = BackoffPolicy { jitter: false, ..Default::default() };
    assert_eq!(policy.delay_for_attempt(0), policy.delay_for_attempt(1));
}
