// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use lattice_core::RunningMean;
use serde::Serialize;
use std::time::Duration;

/// Counters accumulated over the life of a bus
#[derive(Debug, Default)]
pub(crate) struct MetricsState {
    events_published: u64,
    handler_invocations: u64,
    handler_errors: u64,
    processing: RunningMean,
}

impl MetricsState {
    pub fn record_emission(&mut self, invoked: usize, errors: usize, elapsed: Duration) {
        self.events_published += 1;
        self.handler_invocations += invoked as u64;
        self.handler_errors += errors as u64;
        self.processing.record(elapsed.as_secs_f64() * 1000.0);
    }

    /// Errors from spawned handlers arrive after their emission was recorded
    pub fn record_late_error(&mut self) {
        self.handler_errors += 1;
    }

    pub fn snapshot(&self, subscription_count: usize, topic_count: usize) -> BusMetrics {
        BusMetrics {
            events_published: self.events_published,
            handler_invocations: self.handler_invocations,
            handler_errors: self.handler_errors,
            average_processing_ms: self.processing.mean(),
            subscription_count,
            topic_count,
        }
    }
}

/// Point-in-time copy of bus metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusMetrics {
    pub events_published: u64,
    pub handler_invocations: u64,
    pub handler_errors: u64,
    pub average_processing_ms: f64,
    pub subscription_count: usize,
    pub topic_count: usize,
}
