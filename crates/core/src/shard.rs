// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shard identity and health records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Identifier of a routing shard, formatted `shard-<n>`.
    pub struct ShardId;
}

impl ShardId {
    /// Deterministic shard id for index `n`, matching the `assign_shard`
    /// naming convention used throughout the routing layer.
    pub fn for_index(n: u32) -> Self {
        Self(format!("shard-{n}"))
    }

    /// Parses the numeric suffix back out, if this id follows the
    /// `shard-<n>` convention.
    pub fn index(&self) -> Option<u32> {
        self.0.strip_prefix("shard-")?.parse().ok()
    }
}

/// Health classification for a shard, derived from heartbeat age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShardHealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
    Unknown,
}

impl fmt::Display for ShardHealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShardHealthStatus::Healthy => "healthy",
            ShardHealthStatus::Degraded => "degraded",
            ShardHealthStatus::Unhealthy => "unhealthy",
            ShardHealthStatus::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// A shard's materialized health row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardRecord {
    pub shard: ShardId,
    pub status: ShardHealthStatus,
    pub details: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ShardRecord {
    /// Classify health from the age of the last heartbeat against the
    /// configured `health_timeout`: `> timeout` unhealthy, `> timeout/2`
    /// degraded, else healthy.
    pub fn classify(age: chrono::Duration, health_timeout: chrono::Duration) -> ShardHealthStatus {
        if age > health_timeout {
            ShardHealthStatus::Unhealthy
        } else if age > health_timeout / 2 {
            ShardHealthStatus::Degraded
        } else {
            ShardHealthStatus::Healthy
        }
    }
}

#[cfg(test)]
#[path = "shard_tests.rs"]
mod tests;
