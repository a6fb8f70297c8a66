// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exponential backoff with jitter for retryable backend errors.

use rand::Rng;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub base_secs: f64,
    pub multiplier: f64,
    pub cap_secs: f64,
    pub jitter: bool,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_secs: 5.0,
            multiplier: 2.0,
            cap_secs: 300.0,
            jitter: true,
        }
    }
}

impl BackoffPolicy {
    /// `backoff(n) = min(base * mult^(n-1), cap)`, then ±25% jitter.
    /// `n` is the 1-indexed attempt number; `n=0` is treated as `n=1`.
    pub fn delay_for_attempt(&self, n: u32) -> Duration {
        let n = n.max(1);
        let raw = self.base_secs * self.multiplier.powi(n as i32 - 1);
        let capped = raw.min(self.cap_secs);
        let seconds = if self.jitter {
            let spread = capped * 0.25;
            let mut rng = rand::thread_rng();
            capped + rng.gen_range(-spread..=spread)
        } else {
            capped
        };
        Duration::from_secs_f64(seconds.max(0.0))
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
