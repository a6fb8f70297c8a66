// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only JSONL event log plus a directory of rebuildable
//! projections.
//!
//! Every mutating call acquires an exclusive advisory file lock before
//! touching `events.jsonl`, per the fixed lock order documented in
//! spec.md §5 (advisory file lock → DB transaction → event log write).
//! A malformed line is skipped and logged, never fatal — a corrupt tail
//! must not prevent the rest of the log from being read.

use chrono::{DateTime, Utc};
use fs2::FileExt;
use sdlc_core::{Event, EventId, EventType};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::warn;

/// How long `append`/`query` will retry acquiring the exclusive lock
/// before giving up.
const LOCK_TIMEOUT: Duration = Duration::from_secs(10);
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("timed out acquiring event-log lock after {0:?}")]
    LockTimeout(Duration),
}

/// A materialized projection, rebuilt by folding the entire log through a
/// pure handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projection<S> {
    pub projection: String,
    pub rebuilt_at: DateTime<Utc>,
    pub event_count: u64,
    pub state: S,
}

/// Filter for `EventStore::query`.
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub type_filter: Option<String>,
    pub limit: Option<usize>,
}

pub struct EventStore {
    log_path: PathBuf,
    projections_dir: PathBuf,
}

impl EventStore {
    /// Open (creating if needed) the event log and projections directory
    /// rooted at `dir` (conventionally `state/event-store/`).
    pub fn open(dir: &Path) -> Result<Self, EventStoreError> {
        fs::create_dir_all(dir)?;
        let projections_dir = dir.join("projections");
        fs::create_dir_all(&projections_dir)?;
        let log_path = dir.join("events.jsonl");
        if !log_path.exists() {
            File::create(&log_path)?;
        }
        Ok(Self {
            log_path,
            projections_dir,
        })
    }

    fn lock_for_write(&self) -> Result<File, EventStoreError> {
        let file = OpenOptions::new().append(true).open(&self.log_path)?;
        let deadline = Instant::now() + LOCK_TIMEOUT;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(file),
                Err(_) if Instant::now() < deadline => {
                    std::thread::sleep(LOCK_POLL_INTERVAL);
                }
                Err(_) => return Err(EventStoreError::LockTimeout(LOCK_TIMEOUT)),
            }
        }
    }

    /// Append a new event, stamped with a fresh UUID, the current
    /// timestamp, and the given trace ID. Returns the assigned event ID.
    pub fn append(
        &self,
        event_type: EventType,
        task_id: Option<String>,
        actor: impl Into<String>,
        payload: Json,
        trace_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<EventId, EventStoreError> {
        let event = Event {
            id: EventId::new(uuid::Uuid::new_v4().to_string()),
            task_id,
            event_type,
            actor: actor.into(),
            payload,
            trace_id: trace_id.into(),
            timestamp: now,
        };

        let mut file = self.lock_for_write()?;
        let line = serde_json::to_string(&event)?;
        writeln!(file, "{line}")?;
        file.sync_all()?;
        FileExt::unlock(&file)?;

        Ok(event.id)
    }

    /// Stream all events, skipping malformed lines (logged, not fatal).
    fn read_all(&self) -> Result<Vec<Event>, EventStoreError> {
        let file = File::open(&self.log_path)?;
        let reader = BufReader::new(file);
        let mut events = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Event>(&line) {
                Ok(event) => events.push(event),
                Err(e) => {
                    warn!(line = lineno, error = %e, "skipping malformed event-log line");
                }
            }
        }
        Ok(events)
    }

    /// Filtered, bounded scan over the log.
    pub fn query(&self, filter: QueryFilter) -> Result<Vec<Event>, EventStoreError> {
        let mut events = self.read_all()?;
        events.retain(|e| {
            if let Some(since) = filter.since {
                if e.timestamp < since {
                    return false;
                }
            }
            if let Some(until) = filter.until {
                if e.timestamp > until {
                    return false;
                }
            }
            if let Some(ref type_filter) = filter.type_filter {
                if e.event_type.to_string() != *type_filter {
                    return false;
                }
            }
            true
        });
        if let Some(limit) = filter.limit {
            events.truncate(limit);
        }
        Ok(events)
    }

    /// The log prefix up to (and including) timestamp `at`.
    pub fn time_travel(
        &self,
        at: DateTime<Utc>,
        type_filter: Option<&str>,
    ) -> Result<Vec<Event>, EventStoreError> {
        self.query(QueryFilter {
            until: Some(at),
            type_filter: type_filter.map(String::from),
            ..Default::default()
        })
    }

    /// Fold the entire log through `handler`, starting from `init`, and
    /// persist the resulting projection to `<projections_dir>/<name>.json`.
    pub fn projection_rebuild<S, F>(
        &self,
        name: &str,
        init: S,
        handler: F,
        now: DateTime<Utc>,
    ) -> Result<Projection<S>, EventStoreError>
    where
        S: Serialize + for<'de> Deserialize<'de>,
        F: Fn(S, &Event) -> S,
    {
        let events = self.read_all()?;
        let event_count = events.len() as u64;
        let state = events.iter().fold(init, &handler);
        let projection = Projection {
            projection: name.to_string(),
            rebuilt_at: now,
            event_count,
            state,
        };
        let path = self.projections_dir.join(format!("{name}.json"));
        let json = serde_json::to_string_pretty(&projection)?;
        fs::write(path, json)?;
        Ok(projection)
    }
}

#[cfg(test)]
#[path = "event_store_tests.rs"]
mod tests;
