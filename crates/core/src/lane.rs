// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker specialization lanes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The specialization dimension a worker or task is routed on.
///
/// Each expected `(lane, shard)` slot has at most one live worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    /// Implementation work: writes code, drives EXECUTE.
    Impl,
    /// Review work: audits, gates, security passes.
    Review,
    /// Analysis/research/architecture work.
    Analysis,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Impl, Lane::Review, Lane::Analysis];

    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Impl => "impl",
            Lane::Review => "review",
            Lane::Analysis => "analysis",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Lane {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "impl" => Ok(Lane::Impl),
            "review" => Ok(Lane::Review),
            "analysis" => Ok(Lane::Analysis),
            _ => Err(()),
        }
    }
}
