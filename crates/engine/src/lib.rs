// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sdlc-engine: the orchestration logic sitting between the durable
//! substrate (`sdlc-storage`) and the outside world (`sdlc-adapters`) —
//! shard routing, fair claiming, circuit breakers and fallback, worker
//! liveness and recovery, shard health/rebalance, the SDLC phase engine
//! and quality gates, and approval/rejection.

mod approval;
mod backoff;
mod circuit_breaker;
mod config;
mod error;
mod error_classify;
mod fallback;
mod gates;
mod lifecycle;
mod phase_engine;
mod queue;
mod recovery;
mod shard_health;
mod shard_router;
mod worker_runner;

pub use approval::{ApprovalOutcome, Approver, GateFeedback, RejectionFeedback};
pub use backoff::BackoffPolicy;
pub use circuit_breaker::{Admission, CircuitBreaker};
pub use config::{EngineConfig, MAX_CRITICAL_VULNS_CEILING, MIN_COVERAGE_FLOOR, MIN_SECURITY_SCORE_FLOOR};
pub use error::EngineError;
pub use error_classify::{classify, ErrorClass};
pub use fallback::{AdapterTable, FallbackExecutor};
pub use gates::{GateCommand, GateKind, GateResult, GateRunner};
pub use lifecycle::{
    heartbeat_fresh, heartbeat_timeout_for_task_type, pid_reachable, state_file_fresh, LivenessProbes,
};
pub use phase_engine::{PhaseEngine, ProgressRecord, TestResult};
pub use queue::{ClaimFilter, ClaimService};
pub use recovery::{RecoveryLoop, RecoveryReport};
pub use shard_health::{RebalanceReport, ShardHealthMonitor};
pub use shard_router::{assign_shard, route_lane_and_model};
pub use worker_runner::{CycleOutcome, WorkerRunner};
