// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The sharded, fair claim protocol: anti-starvation, candidate scan,
//! per-user fairness, then the atomic claim transaction.

use crate::config::EngineConfig;
use crate::error::EngineError;
use sdlc_core::{Clock, Lane, ShardId, Task, WorkerId};
use sdlc_storage::StateStore;
use std::sync::Arc;
use tracing::debug;

/// Up to this many candidates are scanned per claim attempt (spec.md §4.3).
const CANDIDATE_SCAN_LIMIT: usize = 10;

pub struct ClaimFilter<'a> {
    pub shard: Option<&'a ShardId>,
    pub lane: Option<Lane>,
    pub model: Option<&'a str>,
}

pub struct ClaimService<C: Clock> {
    store: Arc<StateStore>,
    config: EngineConfig,
    clock: C,
}

impl<C: Clock> ClaimService<C> {
    pub fn new(store: Arc<StateStore>, config: EngineConfig, clock: C) -> Self {
        Self { store, config, clock }
    }

    /// Attempt to claim one task for `worker_id`. Returns `Ok(Some(task))`
    /// on a successful claim, `Ok(None)` if no eligible candidate exists or
    /// every candidate is gated out, without retrying internally — the
    /// caller's own loop drives repeated attempts.
    pub async fn try_claim(
        &self,
        worker_id: &WorkerId,
        filter: ClaimFilter<'_>,
    ) -> Result<Option<Task>, EngineError> {
        if self.config.anti_starvation_enabled {
            let running = self.store.count_running_for_worker(worker_id).await?;
            if running >= self.config.max_concurrent_tasks_per_worker as u64 {
                debug!(%worker_id, running, "worker at concurrency cap, backing off");
                tokio::time::sleep(std::time::Duration::from_secs(
                    self.config.anti_starvation_backoff_secs,
                ))
                .await;
                return Ok(None);
            }
        }

        let candidates = self
            .store
            .candidate_tasks(filter.shard, filter.lane, filter.model, CANDIDATE_SCAN_LIMIT)
            .await?;

        for candidate in candidates {
            if self.config.per_user_limits_enabled {
                let submitter = candidate.submitter();
                if submitter != "unknown" {
                    let running = self.store.count_running_for_submitter(&submitter).await?;
                    if running >= self.config.max_running_tasks_per_user as u64 {
                        continue;
                    }
                }
            }

            let now = self.clock.now();
            if self.store.claim_task(&candidate.id, worker_id, now).await? {
                return Ok(Some(candidate));
            }
            // Lost the race on this candidate; try the next one in this scan
            // rather than returning immediately — the outer loop retries on
            // an empty result, but a fresh scan costs a round trip we can
            // avoid while candidates remain.
        }

        Ok(None)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
