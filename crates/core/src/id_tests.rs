// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

define_id! {
    pub struct TestId;
}

#[test]
fn short_truncates_long_ids() {
    let id = TestId::new("task-0123456789abcdef");
    assert_eq!(id.short(8), "task-012");
}

#[test]
fn short_leaves_short_ids_alone() {
    let id = TestId::new("t1");
    assert_eq!(id.short(8), "t1");
}

#[test]
fn sequential_id_gen_increments() {
    let gen = SequentialIdGen::new("task");
    assert_eq!(gen.next(), "task-1");
    assert_eq!(gen.next(), "task-2");
}

#[test]
fn uuid_id_gen_produces_unique_values() {
    let gen = UuidIdGen;
    assert_ne!(gen.next(), gen.next());
}
