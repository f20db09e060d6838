// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry policy with exponential backoff

use crate::config::RetryConfig;
use crate::error::{ApiError, ErrorCode};
use std::time::Duration;

/// Decides whether and when a failed attempt is retried
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    multiplier: f64,
    retry_on: Vec<u16>,
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_delay),
            multiplier: config.backoff_multiplier,
            retry_on: config.retry_on.clone(),
        }
    }

    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            multiplier: 1.0,
            retry_on: Vec::new(),
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry `k` (1-indexed): `base * multiplier^(k-1)`
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = self.multiplier.max(0.0).powi(exponent);
        let millis = self.base_delay.as_millis() as f64 * factor;
        // Float-to-int casts saturate
        Duration::from_millis(millis.round() as u64)
    }

    pub fn retries_status(&self, status: u16) -> bool {
        self.retry_on.contains(&status)
    }

    /// Whether a failure after `retries_done` retries warrants another attempt.
    ///
    /// Transport failures and retryable statuses are retried; timeouts,
    /// cancellation and everything else are terminal.
    pub fn should_retry(&self, error: &ApiError, retries_done: u32) -> bool {
        if retries_done >= self.max_retries {
            return false;
        }
        match error.code {
            ErrorCode::NetworkError => true,
            ErrorCode::HttpError => error.status.is_some_and(|s| self.retries_status(s)),
            _ => false,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RetryConfig::default())
    }
}
