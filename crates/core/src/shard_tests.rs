// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Duration;

#[test]
fn for_index_matches_naming_convention() {
    assert_eq!(ShardId::for_index(2).as_str(), "shard-2");
}

#[test]
fn index_round_trips() {
    assert_eq!(ShardId::new("shard-7").index(), Some(7));
    assert_eq!(ShardId::new("bogus").index(), None);
}

#[test]
fn classify_boundaries() {
    let timeout = Duration::seconds(100);
    assert_eq!(
        ShardRecord::classify(Duration::seconds(40), timeout),
        ShardHealthStatus::Healthy
    );
    assert_eq!(
        ShardRecord::classify(Duration::seconds(60), timeout),
        ShardHealthStatus::Degraded
    );
    assert_eq!(
        ShardRecord::classify(Duration::seconds(101), timeout),
        ShardHealthStatus::Unhealthy
    );
}
