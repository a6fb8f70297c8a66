// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DDL for the state store's embedded database.

use crate::StateStoreError;
use libsql::Connection;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id                TEXT PRIMARY KEY,
    task_type         TEXT NOT NULL,
    priority          INTEGER NOT NULL,
    state             TEXT NOT NULL,
    phase             TEXT NOT NULL,
    assigned_model    TEXT,
    lane              TEXT NOT NULL,
    shard             TEXT NOT NULL,
    worker_id         TEXT REFERENCES workers(id),
    retry_count       INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL,
    started_at        TEXT,
    heartbeat_at      TEXT,
    last_activity_at  TEXT,
    updated_at        TEXT NOT NULL,
    metadata          TEXT NOT NULL DEFAULT '{}',
    trace_id          TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tasks_claimable
    ON tasks (state, shard, lane, priority, created_at);

CREATE TABLE IF NOT EXISTS workers (
    id              TEXT PRIMARY KEY,
    pid             INTEGER,
    status          TEXT NOT NULL,
    specialization  TEXT NOT NULL,
    shard           TEXT NOT NULL,
    model           TEXT NOT NULL,
    started_at      TEXT NOT NULL,
    last_heartbeat  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS worker_heartbeats (
    worker_id                 TEXT PRIMARY KEY REFERENCES workers(id),
    timestamp                 TEXT NOT NULL,
    status                    TEXT NOT NULL,
    task_id                   TEXT,
    task_type                 TEXT,
    progress_percent          INTEGER,
    expected_timeout_seconds  INTEGER,
    last_activity_at          TEXT,
    updated_at                TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS phase_artifacts (
    task_id      TEXT NOT NULL,
    phase        TEXT NOT NULL,
    path         TEXT NOT NULL,
    artifact_type TEXT NOT NULL,
    checksum     TEXT NOT NULL,
    size         INTEGER NOT NULL,
    verified_at  TEXT,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    PRIMARY KEY (task_id, phase, path)
);

CREATE TABLE IF NOT EXISTS shard_health (
    component   TEXT PRIMARY KEY,
    status      TEXT NOT NULL,
    details     TEXT,
    updated_at  TEXT NOT NULL
);
"#;

/// `busy_timeout` and `foreign_keys` are per-connection in SQLite, unlike
/// `journal_mode` which is stored in the database file itself — every
/// connection the store ever opens needs this, not just the one `apply`
/// runs the schema DDL on.
pub(crate) async fn apply_connection_pragmas(conn: &Connection) -> Result<(), StateStoreError> {
    conn.execute("PRAGMA busy_timeout = 5000", ())
        .await
        .map_err(StateStoreError::Db)?;
    conn.execute("PRAGMA foreign_keys = ON", ())
        .await
        .map_err(StateStoreError::Db)?;
    Ok(())
}

/// Apply the schema and the session pragmas spec.md §4.2 requires:
/// WAL journaling, a 5s busy-timeout, and foreign keys on.
pub(crate) async fn apply(conn: &Connection) -> Result<(), StateStoreError> {
    conn.execute("PRAGMA journal_mode = WAL", ())
        .await
        .map_err(StateStoreError::Db)?;
    apply_connection_pragmas(conn).await?;

    for statement in SCHEMA.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        conn.execute(statement, ()).await.map_err(StateStoreError::Db)?;
    }

    Ok(())
}
