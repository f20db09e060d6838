// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded record of completed emissions, kept for diagnostics only

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Duration;

/// One completed emission
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    /// Monotonic sequence number, starting at 1
    pub sequence: u64,
    pub topic: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
    pub handler_count: usize,
    #[serde(rename = "processing_ms")]
    #[serde(serialize_with = "serialize_millis")]
    pub processing_time: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1000.0)
}

/// Ring buffer of history entries; the oldest entry is evicted first
#[derive(Debug)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    sequence: u64,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            sequence: 0,
        }
    }

    pub fn append(
        &mut self,
        topic: &str,
        payload: Value,
        handler_count: usize,
        processing_time: Duration,
    ) {
        self.sequence += 1;
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            sequence: self.sequence,
            topic: topic.to_string(),
            payload,
            timestamp: Utc::now(),
            handler_count,
            processing_time,
        });
    }

    /// The most recent `limit` entries, oldest first
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
