// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase artifacts: named files produced and registered for a given phase
//! of a given task.

use crate::phase::Phase;
use crate::task::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The kind of artifact registered against a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    Document,
    Code,
    Test,
    Config,
    Other,
}

impl ArtifactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactType::Document => "document",
            ArtifactType::Code => "code",
            ArtifactType::Test => "test",
            ArtifactType::Config => "config",
            ArtifactType::Other => "other",
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ArtifactType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(ArtifactType::Document),
            "code" => Ok(ArtifactType::Code),
            "test" => Ok(ArtifactType::Test),
            "config" => Ok(ArtifactType::Config),
            "other" => Ok(ArtifactType::Other),
            _ => Err(()),
        }
    }
}

/// A file registered for a specific `(task, phase)`.
///
/// Uniqueness is `(task_id, phase, path)`; registering the same path twice
/// updates `checksum`/`size`/`verified_at` in place rather than duplicating
/// the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseArtifact {
    pub task_id: TaskId,
    pub phase: Phase,
    pub path: PathBuf,
    pub artifact_type: ArtifactType,
    /// Hex-encoded SHA-256 of the file contents at registration time.
    pub checksum: String,
    pub size: u64,
    pub verified_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PhaseArtifact {
    /// The natural uniqueness key for this artifact.
    pub fn key(&self) -> (TaskId, Phase, PathBuf) {
        (self.task_id.clone(), self.phase, self.path.clone())
    }
}
