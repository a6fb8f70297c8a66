// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Split-brain defense: when a filesystem-level state change succeeds but
//! the matching database write fails, a pending-sync marker records the
//! intended target state so the recovery loop can retry the write later.
//!
//! Markers are written atomically (temp file + rename), the same pattern
//! the checkpoint/snapshot layer uses for crash safety.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PendingSyncError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single outstanding filesystem→DB reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSync {
    pub task_id: String,
    pub target_state: String,
    pub reason: String,
    pub trace_id: String,
    pub recorded_at: DateTime<Utc>,
}

/// Directory of pending-sync markers, one JSON file per task ID.
pub struct PendingSyncStore {
    dir: PathBuf,
}

impl PendingSyncStore {
    pub fn open(dir: &Path) -> Result<Self, PendingSyncError> {
        fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_owned() })
    }

    fn path_for(&self, task_id: &str) -> PathBuf {
        self.dir.join(format!("{task_id}.json"))
    }

    /// Record a marker, overwriting any prior marker for the same task.
    /// Written to a `.tmp` file and renamed so a crash mid-write never
    /// leaves a half-written marker behind.
    pub fn record(&self, marker: &PendingSync) -> Result<(), PendingSyncError> {
        let path = self.path_for(&marker.task_id);
        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, marker)?;
            use std::io::Write;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Clear the marker for `task_id` once the reconciler has applied it.
    pub fn clear(&self, task_id: &str) -> Result<(), PendingSyncError> {
        let path = self.path_for(task_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// All outstanding markers, for the recovery loop to retry.
    pub fn pending(&self) -> Result<Vec<PendingSync>, PendingSyncError> {
        let mut markers = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = fs::read(&path)?;
            markers.push(serde_json::from_slice(&bytes)?);
        }
        Ok(markers)
    }
}

#[cfg(test)]
#[path = "pending_sync_tests.rs"]
mod tests;
