// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Circuit-breaker state shared across processes for each backend family.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three backend families a task can be routed to. The adapters
/// themselves are external collaborators (see sdlc-adapters); this crate
/// only needs a stable identifier to key breaker/fallback state on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendFamily {
    FamilyA,
    FamilyB,
    FamilyC,
}

impl BackendFamily {
    pub const ALL: [BackendFamily; 3] = [
        BackendFamily::FamilyA,
        BackendFamily::FamilyB,
        BackendFamily::FamilyC,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendFamily::FamilyA => "family_a",
            BackendFamily::FamilyB => "family_b",
            BackendFamily::FamilyC => "family_c",
        }
    }
}

impl fmt::Display for BackendFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BackendFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "family_a" => Ok(BackendFamily::FamilyA),
            "family_b" => Ok(BackendFamily::FamilyB),
            "family_c" => Ok(BackendFamily::FamilyC),
            other => Err(format!("unknown backend family: {other}")),
        }
    }
}

/// The three states a breaker can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerStateKind {
    Closed,
    Open,
    HalfOpen,
}

impl fmt::Display for BreakerStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BreakerStateKind::Closed => "closed",
            BreakerStateKind::Open => "open",
            BreakerStateKind::HalfOpen => "half_open",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for BreakerStateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closed" => Ok(BreakerStateKind::Closed),
            "open" => Ok(BreakerStateKind::Open),
            "half_open" => Ok(BreakerStateKind::HalfOpen),
            // Unknown state resets to CLOSED per the breaker-file parsing rule.
            _ => Ok(BreakerStateKind::Closed),
        }
    }
}

/// A breaker's persisted fields, one record per backend family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakerSnapshot {
    pub family: BackendFamily,
    pub state: BreakerStateKind,
    pub failure_count: u32,
    pub last_failure: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
    pub half_open_calls: u32,
}

impl BreakerSnapshot {
    pub fn closed(family: BackendFamily) -> Self {
        Self {
            family,
            state: BreakerStateKind::Closed,
            failure_count: 0,
            last_failure: None,
            last_success: None,
            half_open_calls: 0,
        }
    }
}

#[cfg(test)]
#[path = "breaker_tests.rs"]
mod tests;
