// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retry policy for rate-limited upstream calls
//!
//! Only HTTP 429 responses are retried. Delays follow exponential backoff
//! (1s, 2s) plus bounded uniform jitter; a parseable Retry-After header
//! takes precedence over the computed delay.

use rand::Rng;
use std::time::Duration;

/// Maximum number of upstream attempts (initial call included)
pub const MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff
pub const BASE_DELAY_MS: u64 = 1000;

/// Upper bound for the random jitter added to each backoff delay
pub const MAX_JITTER_MS: u64 = 400;

/// Backoff parameters for rate-limited upstream calls
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, initial call included
    pub max_attempts: u32,
    /// Base delay, doubled on each subsequent attempt
    pub base_delay_ms: u64,
    /// Upper bound for the uniform random jitter
    pub max_jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay_ms: BASE_DELAY_MS,
            max_jitter_ms: MAX_JITTER_MS,
        }
    }
}

impl RetryPolicy {
    /// Compute the backoff delay before retry number `attempt` (0-based:
    /// attempt 0 is the wait after the first rate-limited response).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay_ms.saturating_mul(1u64 << attempt.min(16));
        let jitter = if self.max_jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.max_jitter_ms)
        };
        Duration::from_millis(base.saturating_add(jitter))
    }

    /// Delay before the next retry: a Retry-After hint from the upstream
    /// wins over the computed backoff.
    pub fn next_delay(&self, attempt: u32, retry_after_secs: Option<u64>) -> Duration {
        match retry_after_secs {
            Some(secs) => Duration::from_secs(secs),
            None => self.backoff_delay(attempt),
        }
    }
}
