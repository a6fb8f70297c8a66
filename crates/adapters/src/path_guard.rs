// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PATH sanitization and tool resolution for the quality-gate pipeline.
//!
//! Refuses outright (spec.md §7, safety-critical axis) rather than
//! degrading: a directory not on the configured whitelist, or one
//! writable by users other than its owner, is dropped from the search
//! path entirely. Resolved tool paths are cached so a single process
//! only walks the filesystem once per tool name.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathGuardError {
    #[error("tool not found on whitelisted PATH: {0}")]
    ToolNotFound(String),
    #[error("PATH directory not whitelisted: {}", .0.display())]
    DirectoryNotWhitelisted(PathBuf),
}

/// Sanitizes a raw `PATH` value against a fixed whitelist and caches
/// resolved absolute tool paths.
pub struct PathGuard {
    search_dirs: Vec<PathBuf>,
    cache: Mutex<HashMap<String, PathBuf>>,
}

impl PathGuard {
    /// Build a guard from a raw `PATH`-style string and the configured
    /// whitelist of allowed directories. Entries not on the whitelist, or
    /// that fail the writable-by-others check, are dropped silently from
    /// the effective search path (not an error — a narrower PATH is always
    /// safe; the error surfaces only when a *specific tool* can't be found).
    pub fn new(raw_path: &str, whitelist: &[PathBuf]) -> Self {
        let search_dirs = std::env::split_paths(raw_path)
            .filter(|dir| whitelist.iter().any(|allowed| allowed == dir))
            .filter(|dir| !is_writable_by_others(dir))
            .collect();
        Self {
            search_dirs,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve `tool` to an absolute path within the sanitized search
    /// dirs, caching the result for subsequent calls.
    pub fn resolve(&self, tool: &str) -> Result<PathBuf, PathGuardError> {
        if let Some(cached) = self.cache.lock().get(tool) {
            return Ok(cached.clone());
        }

        for dir in &self.search_dirs {
            let candidate = dir.join(tool);
            if candidate.is_file() {
                self.cache.lock().insert(tool.to_string(), candidate.clone());
                return Ok(candidate);
            }
        }

        Err(PathGuardError::ToolNotFound(tool.to_string()))
    }

    /// The sanitized search dirs, for diagnostics.
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }
}

#[cfg(unix)]
fn is_writable_by_others(dir: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(dir) {
        Ok(meta) => meta.permissions().mode() & 0o022 != 0,
        // A directory that doesn't exist yet isn't a writable-by-others hazard,
        // but it also can't resolve any tool, so it's effectively inert.
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_writable_by_others(_dir: &Path) -> bool {
    false
}

#[cfg(test)]
#[path = "path_guard_tests.rs"]
mod tests;
