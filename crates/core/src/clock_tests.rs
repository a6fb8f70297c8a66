// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances_by_duration() {
    let clock = FakeClock::new(DateTime::UNIX_EPOCH);
    clock.advance(chrono::Duration::seconds(30));
    assert_eq!(clock.now(), DateTime::UNIX_EPOCH + chrono::Duration::seconds(30));
}

#[test]
fn fake_clock_set_overrides_time() {
    let clock = FakeClock::default();
    let target = DateTime::UNIX_EPOCH + chrono::Duration::days(1);
    clock.set(target);
    assert_eq!(clock.now(), target);
}

#[test]
fn system_clock_moves_forward() {
    let clock = SystemClock;
    let a = clock.now();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let b = clock.now();
    assert!(b >= a);
}
