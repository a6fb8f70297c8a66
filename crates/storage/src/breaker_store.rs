// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-backend-family circuit-breaker state, persisted as a small
//! key=value text file guarded by an advisory file lock.
//!
//! Parsing never evaluates the file as shell (no `source`-style eval):
//! each line is matched against a fixed key/value regex and every
//! numeric field is validated as a non-negative integer before use. An
//! unparseable field falls back to its safe default rather than
//! panicking, since this file is line-edited by whatever process last
//! held the breaker, not always by this codebase.

use chrono::{DateTime, Utc};
use fs2::FileExt;
use regex::Regex;
use sdlc_core::{BackendFamily, BreakerSnapshot, BreakerStateKind};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

const LOCK_TIMEOUT: Duration = Duration::from_secs(10);
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Error)]
pub enum BreakerStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("timed out acquiring breaker-file lock after {0:?}")]
    LockTimeout(Duration),
}

fn line_re() -> Regex {
    Regex::new(r"^([a-z_]+)=(.*)$").expect("static regex is valid")
}

fn format_ts(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339()).unwrap_or_default()
}

fn parse_ts(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(s).ok().map(|t| t.with_timezone(&Utc))
}

fn parse_non_negative(s: &str) -> u32 {
    s.parse::<u32>().unwrap_or(0)
}

fn serialize(snapshot: &BreakerSnapshot) -> String {
    format!(
        "state={}\nfailure_count={}\nlast_failure={}\nlast_success={}\nhalf_open_calls={}\n",
        snapshot.state,
        snapshot.failure_count,
        format_ts(snapshot.last_failure),
        format_ts(snapshot.last_success),
        snapshot.half_open_calls,
    )
}

/// Parse a breaker file's contents. Any missing or malformed field falls
/// back to the CLOSED/zeroed default for that field rather than erroring.
fn deserialize(family: BackendFamily, contents: &str) -> BreakerSnapshot {
    let re = line_re();
    let mut snapshot = BreakerSnapshot::closed(family);
    for line in contents.lines() {
        let Some(caps) = re.captures(line.trim()) else {
            continue;
        };
        let key = &caps[1];
        let value = &caps[2];
        match key {
            "state" => snapshot.state = value.parse::<BreakerStateKind>().unwrap_or(BreakerStateKind::Closed),
            "failure_count" => snapshot.failure_count = parse_non_negative(value),
            "last_failure" => snapshot.last_failure = parse_ts(value),
            "last_success" => snapshot.last_success = parse_ts(value),
            "half_open_calls" => snapshot.half_open_calls = parse_non_negative(value),
            _ => {}
        }
    }
    snapshot
}

/// A directory of breaker-state files, one per backend family.
pub struct BreakerStore {
    dir: PathBuf,
}

impl BreakerStore {
    pub fn open(dir: &Path) -> Result<Self, BreakerStoreError> {
        fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_owned() })
    }

    fn path_for(&self, family: BackendFamily) -> PathBuf {
        self.dir.join(format!("{family}.breaker"))
    }

    fn lock_file(&self, family: BackendFamily) -> Result<File, BreakerStoreError> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(self.path_for(family))?;
        let deadline = Instant::now() + LOCK_TIMEOUT;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(file),
                Err(_) if Instant::now() < deadline => {
                    std::thread::sleep(LOCK_POLL_INTERVAL);
                }
                Err(_) => return Err(BreakerStoreError::LockTimeout(LOCK_TIMEOUT)),
            }
        }
    }

    /// Read the current snapshot, defaulting to CLOSED if the file is
    /// absent or empty.
    pub fn read(&self, family: BackendFamily) -> Result<BreakerSnapshot, BreakerStoreError> {
        let mut file = self.lock_file(family)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        FileExt::unlock(&file)?;
        Ok(deserialize(family, &contents))
    }

    /// Read-modify-write the snapshot under a single lock hold, so a
    /// concurrent reader never observes a torn update.
    pub fn update(
        &self,
        family: BackendFamily,
        f: impl FnOnce(&mut BreakerSnapshot),
    ) -> Result<BreakerSnapshot, BreakerStoreError> {
        let mut file = self.lock_file(family)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let mut snapshot = deserialize(family, &contents);
        f(&mut snapshot);

        let serialized = serialize(&snapshot);
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(serialized.as_bytes())?;
        file.sync_all()?;
        FileExt::unlock(&file)?;

        Ok(snapshot)
    }
}

#[cfg(test)]
#[path = "breaker_store_tests.rs"]
mod tests;
