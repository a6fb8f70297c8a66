// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opens the same on-disk state/event stores the daemon uses, resolved
//! through the daemon's own config loader so the CLI never drifts from
//! the running system's idea of where its data lives.

use anyhow::Context;
use sdlc_daemon::DaemonConfig;
use sdlc_storage::{EventStore, StateStore};

pub struct Handles {
    pub config: DaemonConfig,
    pub state: StateStore,
    pub events: EventStore,
}

pub async fn open() -> anyhow::Result<Handles> {
    let config = DaemonConfig::load().context("loading daemon configuration")?;
    std::fs::create_dir_all(&config.events_dir).context("creating events directory")?;
    let db_path = config.db_path.to_str().context("state db path is not valid UTF-8")?;
    let state = StateStore::open(db_path).await.context("opening state store")?;
    let events = EventStore::open(&config.events_dir).context("opening event store")?;
    Ok(Handles { config, state, events })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
