// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic shard assignment and task-type routing.

use sdlc_core::{BackendFamily, Lane, ShardId, TaskType};
use sha2::{Digest, Sha256};

/// `assign_shard(task_id) = "shard-" + (hash(task_id) mod SHARD_COUNT)`.
/// The hash is a truncated SHA-256 digest rather than cksum/md5 — any
/// deterministic, stable-across-processes checksum satisfies the routing
/// contract; SHA-256 is already a workspace dependency.
pub fn assign_shard(task_id: &str, shard_count: u32) -> ShardId {
    let digest = Sha256::digest(task_id.as_bytes());
    let truncated = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    ShardId::for_index(truncated % shard_count.max(1))
}

/// Prefix-matching routing table: task-type prefix to `(lane, backend family)`.
/// Matching is case-insensitive; `TaskType::new` already normalizes to
/// uppercase, so callers pass the normalized form.
pub fn route_lane_and_model(task_type: &TaskType) -> (Lane, BackendFamily) {
    const REVIEW_PREFIXES: &[&str] = &["REVIEW", "AUDIT", "SECURITY", "GATE", "QUALITY"];
    const ANALYSIS_PREFIXES: &[&str] = &["ANALYSIS", "RESEARCH", "ARCH", "DESIGN"];

    let t = task_type.as_str();
    if REVIEW_PREFIXES.iter().any(|p| t.starts_with(p)) {
        (Lane::Review, BackendFamily::FamilyA)
    } else if ANALYSIS_PREFIXES.iter().any(|p| t.starts_with(p)) {
        (Lane::Analysis, BackendFamily::FamilyB)
    } else {
        (Lane::Impl, BackendFamily::FamilyC)
    }
}

#[cfg(test)]
#[path = "shard_router_tests.rs"]
mod tests;
