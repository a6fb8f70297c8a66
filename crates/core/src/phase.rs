// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The five-phase SDLC state machine plus its terminal states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A phase in the ordered SDLC lifecycle, plus the two terminal escape
/// states a task can land in outside the normal progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Brainstorm,
    Document,
    Plan,
    Execute,
    Track,
    Complete,
    Blocked,
    Failed,
}

impl Phase {
    /// The ordered, non-terminal progression. `Complete` is reachable only
    /// by advancing past `Track`.
    const ORDER: [Phase; 6] = [
        Phase::Brainstorm,
        Phase::Document,
        Phase::Plan,
        Phase::Execute,
        Phase::Track,
        Phase::Complete,
    ];

    /// Position in the ordered progression. `None` for `Blocked`/`Failed`,
    /// which sit outside the ranked sequence.
    pub fn rank(&self) -> Option<usize> {
        Self::ORDER.iter().position(|p| p == self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Complete | Phase::Blocked | Phase::Failed)
    }

    /// The phase immediately after this one in the ordered progression, if any.
    pub fn next(&self) -> Option<Phase> {
        let rank = self.rank()?;
        Self::ORDER.get(rank + 1).copied()
    }

    /// Whether advancing from `self` to `to` is a legal SDLC transition:
    /// exactly one rank forward, or a move into a terminal escape state.
    pub fn can_advance_to(&self, to: Phase) -> bool {
        if matches!(to, Phase::Blocked | Phase::Failed) {
            return true;
        }
        match (self.rank(), to.rank()) {
            (Some(from_rank), Some(to_rank)) => to_rank == from_rank + 1,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Brainstorm => "brainstorm",
            Phase::Document => "document",
            Phase::Plan => "plan",
            Phase::Execute => "execute",
            Phase::Track => "track",
            Phase::Complete => "complete",
            Phase::Blocked => "blocked",
            Phase::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brainstorm" => Ok(Phase::Brainstorm),
            "document" => Ok(Phase::Document),
            "plan" => Ok(Phase::Plan),
            "execute" => Ok(Phase::Execute),
            "track" => Ok(Phase::Track),
            "complete" => Ok(Phase::Complete),
            "blocked" => Ok(Phase::Blocked),
            "failed" => Ok(Phase::Failed),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
