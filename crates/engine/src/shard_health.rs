// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shard health classification and queue rebalancing.

use crate::config::EngineConfig;
use crate::error::EngineError;
use chrono::{DateTime, Utc};
use sdlc_core::{EventType, ShardHealthStatus, ShardId};
use sdlc_storage::{EventStore, StateStore};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub struct ShardHealthMonitor {
    state: Arc<StateStore>,
    events: Arc<EventStore>,
    config: EngineConfig,
}

#[derive(Debug, Default, Clone)]
pub struct RebalanceReport {
    pub shards_redistributed: Vec<(ShardId, u64)>,
}

impl ShardHealthMonitor {
    pub fn new(state: Arc<StateStore>, events: Arc<EventStore>, config: EngineConfig) -> Self {
        Self { state, events, config }
    }

    /// spec.md §4.7's per-cycle heartbeat: upsert `healthy` for every
    /// shard with at least one starting/idle/busy/paused worker.
    pub async fn record_heartbeat(&self, now: DateTime<Utc>) -> Result<(), EngineError> {
        let workers = self.state.all_workers().await?;
        let mut seen = std::collections::HashSet::new();
        for worker in &workers {
            if worker.status.is_alive() && seen.insert(worker.shard.clone()) {
                self.state
                    .upsert_shard_health(&worker.shard, ShardHealthStatus::Healthy, None, now)
                    .await?;
            }
        }
        Ok(())
    }

    /// Shards with zero live workers but at least one QUEUED task.
    pub async fn orphaned_shards(&self) -> Result<Vec<ShardId>, EngineError> {
        let workers = self.state.all_workers().await?;
        let live_shards: std::collections::HashSet<_> = workers
            .iter()
            .filter(|w| w.status.is_alive())
            .map(|w| w.shard.clone())
            .collect();

        let counts = self.state.queued_counts_by_shard().await?;
        Ok(counts
            .into_iter()
            .filter(|(shard, n)| *n > 0 && !live_shards.contains(shard))
            .map(|(shard, _)| shard)
            .collect())
    }

    /// Runs both rebalance triggers from spec.md §4.7: an even spread
    /// once the queued-count imbalance crosses `REBALANCE_THRESHOLD`, and
    /// full evacuation of any orphaned shard. Each redistribution batch
    /// emits a `SHARD_REDISTRIBUTION` event with the source shard and
    /// count moved.
    pub async fn rebalance(&self, now: DateTime<Utc>) -> Result<RebalanceReport, EngineError> {
        let mut report = RebalanceReport::default();
        let orphaned = self.orphaned_shards().await?;
        let counts = self.state.queued_counts_by_shard().await?;

        if counts.is_empty() {
            return Ok(report);
        }

        let healthy_targets: Vec<ShardId> = (0..self.config.shard_count)
            .map(ShardId::for_index)
            .filter(|s| !orphaned.contains(s))
            .collect();
        if healthy_targets.is_empty() {
            return Ok(report);
        }

        for shard in &orphaned {
            let Some((_, queued)) = counts.iter().find(|(s, _)| s == shard) else { continue };
            if *queued == 0 {
                continue;
            }
            self.redistribute_evenly(shard, &healthy_targets, *queued, now, &mut report).await?;
        }

        // queued_counts_by_shard only returns rows for shards with at
        // least one queued task; fill in the rest so an idle shard still
        // counts toward the imbalance spread and the even-split target.
        let all_counts: Vec<(ShardId, u64)> = (0..self.config.shard_count)
            .map(ShardId::for_index)
            .map(|s| {
                let n = counts.iter().find(|(cs, _)| *cs == s).map(|(_, n)| *n).unwrap_or(0);
                (s, n)
            })
            .collect();

        let total: u64 = all_counts.iter().map(|(_, n)| *n).sum();
        let target = total / self.config.shard_count as u64;
        let max = all_counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
        let min = all_counts.iter().map(|(_, n)| *n).min().unwrap_or(0);
        if max.saturating_sub(min) > self.config.rebalance_threshold {
            if let Some((busiest, queued)) = all_counts.iter().max_by_key(|(_, n)| *n) {
                if !orphaned.contains(busiest) {
                    let overflow = queued.saturating_sub(target);
                    if overflow > 0 {
                        let others: Vec<ShardId> =
                            healthy_targets.iter().filter(|s| *s != busiest).cloned().collect();
                        self.redistribute_evenly(busiest, &others, overflow, now, &mut report).await?;
                    }
                }
            }
        }

        Ok(report)
    }

    async fn redistribute_evenly(
        &self,
        from: &ShardId,
        targets: &[ShardId],
        total: u64,
        now: DateTime<Utc>,
        report: &mut RebalanceReport,
    ) -> Result<(), EngineError> {
        let candidates: Vec<&ShardId> = targets.iter().filter(|t| *t != from).collect();
        if candidates.is_empty() || total == 0 {
            return Ok(());
        }

        let mut remaining = total;
        let mut targets_left = candidates.len() as u64;
        let mut moved = 0u64;
        for target in candidates {
            if remaining == 0 || targets_left == 0 {
                break;
            }
            // Ceiling split so the source shard is fully evacuated rather
            // than leaving a remainder behind from floor division.
            let batch = remaining.div_ceil(targets_left);
            let changed = self.state.redistribute_shard(from, target, batch, now).await?;
            moved += changed;
            remaining = remaining.saturating_sub(changed);
            targets_left -= 1;
            if changed > 0 {
                self.events.append(
                    EventType::ShardRedistribution,
                    None,
                    "shard-health-monitor",
                    json!({ "from": from.as_str(), "to": target.as_str(), "count": changed }),
                    "rebalance",
                    now,
                )?;
                info!(from = %from, to = %target, count = changed, "shard redistributed");
            }
        }
        report.shards_redistributed.push((from.clone(), moved));
        Ok(())
    }
}

#[cfg(test)]
#[path = "shard_health_tests.rs"]
mod tests;
