// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request accounting

use lattice_core::RunningMean;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Default)]
pub(crate) struct MetricsState {
    total: u64,
    successful: u64,
    failed: u64,
    cache_hits: u64,
    latency: RunningMean,
}

impl MetricsState {
    pub fn record_cache_hit(&mut self) {
        self.total += 1;
        self.cache_hits += 1;
    }

    pub fn record_success(&mut self, elapsed: Duration) {
        self.total += 1;
        self.successful += 1;
        self.latency.record(elapsed.as_secs_f64() * 1000.0);
    }

    pub fn record_failure(&mut self, elapsed: Duration) {
        self.total += 1;
        self.failed += 1;
        self.latency.record(elapsed.as_secs_f64() * 1000.0);
    }

    pub fn snapshot(&self, active_requests: usize, cache_size: usize) -> ClientMetrics {
        let ratio = |part: u64, whole: u64| {
            if whole == 0 {
                0.0
            } else {
                part as f64 / whole as f64
            }
        };
        ClientMetrics {
            total_requests: self.total,
            successful_requests: self.successful,
            failed_requests: self.failed,
            cache_hits: self.cache_hits,
            success_rate: ratio(self.successful, self.successful + self.failed),
            cache_hit_rate: ratio(self.cache_hits, self.total),
            average_latency_ms: self.latency.mean(),
            active_requests,
            cache_size,
        }
    }
}

/// Point-in-time client statistics
///
/// Cache hits count toward `total_requests` but not toward the network
/// figures: `success_rate` and `average_latency_ms` cover requests that
/// reached the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub cache_hits: u64,
    pub success_rate: f64,
    pub cache_hit_rate: f64,
    pub average_latency_ms: f64,
    pub active_requests: usize,
    pub cache_size: usize,
}
