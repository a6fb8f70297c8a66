// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLOSED/OPEN/HALF_OPEN breaker transitions, one per backend family.
//! State is read/written through [`BreakerStore`]; this module only
//! holds the transition table.

use crate::config::EngineConfig;
use crate::error::EngineError;
use chrono::{DateTime, Utc};
use sdlc_core::{BackendFamily, BreakerSnapshot, BreakerStateKind};
use sdlc_storage::BreakerStore;

/// Whether a call attempt against `family` is admitted right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allow,
    Deny,
}

pub struct CircuitBreaker<'a> {
    store: &'a BreakerStore,
    config: &'a EngineConfig,
}

impl<'a> CircuitBreaker<'a> {
    pub fn new(store: &'a BreakerStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// Decide admission and, for an OPEN breaker past cooldown, transition
    /// it to HALF_OPEN and admit exactly one probe — all under the same
    /// lock hold via [`BreakerStore::update`] so two racing callers can't
    /// both be admitted as "the" probe.
    pub fn call_allowed(&self, family: BackendFamily, now: DateTime<Utc>) -> Result<Admission, EngineError> {
        let cooldown = chrono::Duration::seconds(self.config.cb_cooldown_seconds);
        let mut admission = Admission::Deny;

        self.store.update(family, |snapshot| {
            admission = match snapshot.state {
                BreakerStateKind::Closed => Admission::Allow,
                BreakerStateKind::Open => {
                    let past_cooldown = snapshot
                        .last_failure
                        .map(|at| now - at >= cooldown)
                        .unwrap_or(true);
                    if past_cooldown {
                        snapshot.state = BreakerStateKind::HalfOpen;
                        snapshot.half_open_calls = 1;
                        Admission::Allow
                    } else {
                        Admission::Deny
                    }
                }
                BreakerStateKind::HalfOpen => {
                    if snapshot.half_open_calls >= self.config.cb_half_open_max_calls {
                        Admission::Deny
                    } else {
                        snapshot.half_open_calls += 1;
                        Admission::Allow
                    }
                }
            };
        })?;

        Ok(admission)
    }

    pub fn record_success(&self, family: BackendFamily, now: DateTime<Utc>) -> Result<BreakerSnapshot, EngineError> {
        Ok(self.store.update(family, |snapshot| {
            snapshot.state = BreakerStateKind::Closed;
            snapshot.failure_count = 0;
            snapshot.half_open_calls = 0;
            snapshot.last_success = Some(now);
        })?)
    }

    pub fn record_failure(&self, family: BackendFamily, now: DateTime<Utc>) -> Result<BreakerSnapshot, EngineError> {
        Ok(self.store.update(family, |snapshot| {
            snapshot.last_failure = Some(now);
            match snapshot.state {
                BreakerStateKind::Closed => {
                    snapshot.failure_count += 1;
                    if snapshot.failure_count >= self.config.cb_failure_threshold {
                        snapshot.state = BreakerStateKind::Open;
                    }
                }
                BreakerStateKind::HalfOpen => {
                    snapshot.state = BreakerStateKind::Open;
                    snapshot.half_open_calls = 0;
                }
                BreakerStateKind::Open => {}
            }
        })?)
    }
}

#[cfg(test)]
#[path = "circuit_breaker_tests.rs"]
mod tests;
