// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn unknown_state_string_resets_to_closed() {
    assert_eq!(
        "garbage".parse::<BreakerStateKind>().unwrap(),
        BreakerStateKind::Closed
    );
}

#[test]
fn family_round_trips_through_display_and_parse() {
    for family in BackendFamily::ALL {
        let parsed: BackendFamily = family.to_string().parse().unwrap();
        assert_eq!(parsed, family);
    }
}

#[test]
fn closed_snapshot_has_zeroed_counters() {
    let snap = BreakerSnapshot::closed(BackendFamily::FamilyA);
    assert_eq!(snap.failure_count, 0);
    assert_eq!(snap.half_open_calls, 0);
    assert_eq!(snap.state, BreakerStateKind::Closed);
}
