// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The fallback chain: walk a per-family backend order, skipping breakers
//! that deny, until one succeeds or the chain and retry budget are both
//! exhausted.

use crate::circuit_breaker::{Admission, CircuitBreaker};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::error_classify::classify;
use sdlc_adapters::{BackendAdapter, BackendRequest, BackendResponse};
use sdlc_core::BackendFamily;
use sdlc_storage::BreakerStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// One adapter per backend family, resolved by [`route_lane_and_model`].
pub type AdapterTable = HashMap<BackendFamily, Arc<dyn BackendAdapter>>;

pub struct FallbackExecutor<'a> {
    adapters: &'a AdapterTable,
    breaker_store: &'a BreakerStore,
    config: &'a EngineConfig,
}

impl<'a> FallbackExecutor<'a> {
    pub fn new(adapters: &'a AdapterTable, breaker_store: &'a BreakerStore, config: &'a EngineConfig) -> Self {
        Self { adapters, breaker_store, config }
    }

    /// Try each family in `EH_FALLBACK_ORDER`, skipping any whose breaker
    /// denies the call, until one responds successfully or the chain (and
    /// retry budget) is exhausted.
    pub async fn execute_with_fallback(
        &self,
        request: BackendRequest,
        task_id: &str,
        task_retry_count: u32,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<BackendResponse, EngineError> {
        if task_retry_count >= self.config.eh_retry_budget {
            return Err(EngineError::RetryBudgetExceeded {
                task_id: task_id.to_string(),
                budget: self.config.eh_retry_budget,
            });
        }

        for family in &self.config.eh_fallback_order {
            let breaker = CircuitBreaker::new(self.breaker_store, self.config);
            if breaker.call_allowed(*family, now)? == Admission::Deny {
                continue;
            }

            let Some(adapter) = self.adapters.get(family) else {
                continue;
            };

            match adapter.call(request.clone()).await {
                Ok(response) => {
                    breaker.record_success(*family, now)?;
                    return Ok(response);
                }
                Err(err) => {
                    let class = classify(&err.to_string());
                    warn!(%family, %class, "backend call failed");
                    breaker.record_failure(*family, now)?;
                    if !class.is_retryable() {
                        return Err(err.into());
                    }
                }
            }
        }

        Err(EngineError::FallbackExhausted { task_id: task_id.to_string() })
    }
}

#[cfg(test)]
#[path = "fallback_tests.rs"]
mod tests;
