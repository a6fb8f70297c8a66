// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

use crate::error::DaemonError;

/// Resolve state directory: `SDLC_STATE_DIR` > `XDG_STATE_HOME/sdlc` >
/// `~/.local/state/sdlc`.
pub fn state_dir() -> Result<PathBuf, DaemonError> {
    if let Ok(dir) = std::env::var("SDLC_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("sdlc"));
    }
    let home = std::env::var("HOME").map_err(|_| DaemonError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/sdlc"))
}

/// `SDLC_<FIELD>` env-var override for a `u32`-valued config field.
pub fn override_u32(field: &str) -> Option<u32> {
    std::env::var(format!("SDLC_{field}")).ok().and_then(|s| s.parse().ok())
}

/// `SDLC_<FIELD>` env-var override for a `u64`-valued config field.
pub fn override_u64(field: &str) -> Option<u64> {
    std::env::var(format!("SDLC_{field}")).ok().and_then(|s| s.parse().ok())
}

/// `SDLC_<FIELD>` env-var override for an `f64`-valued config field.
pub fn override_f64(field: &str) -> Option<f64> {
    std::env::var(format!("SDLC_{field}")).ok().and_then(|s| s.parse().ok())
}

/// `SDLC_<FIELD>` env-var override for a `bool`-valued config field.
pub fn override_bool(field: &str) -> Option<bool> {
    std::env::var(format!("SDLC_{field}")).ok().and_then(|s| s.parse().ok())
}

/// Credential env var expected for each backend family, checked at worker
/// spawn time (spec.md's "credential check at spawn").
pub fn credential_var(family: sdlc_core::BackendFamily) -> &'static str {
    match family {
        sdlc_core::BackendFamily::FamilyA => "SDLC_FAMILY_A_API_KEY",
        sdlc_core::BackendFamily::FamilyB => "SDLC_FAMILY_B_API_KEY",
        sdlc_core::BackendFamily::FamilyC => "SDLC_FAMILY_C_API_KEY",
    }
}
