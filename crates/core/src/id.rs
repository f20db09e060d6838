// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier generation for subscriptions and in-flight requests
//!
//! Every generated id has the shape `<prefix>_<suffix>`; consumers rely on the
//! prefix to tell an id apart from other strings (a topic, for instance).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates unique, prefixed identifiers
pub trait IdGen: Send + Sync {
    fn next(&self) -> String;

    /// The prefix every generated id starts with (without the separator)
    fn prefix(&self) -> &str;

    /// Whether `candidate` has the shape of an id from this generator
    fn is_id(&self, candidate: &str) -> bool {
        candidate
            .strip_prefix(self.prefix())
            .and_then(|rest| rest.strip_prefix('_'))
            .is_some_and(|suffix| {
                !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphanumeric())
            })
    }
}

/// UUID-suffixed ids for production use
#[derive(Clone, Debug)]
pub struct UuidIdGen {
    prefix: String,
}

impl UuidIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        format!("{}_{}", self.prefix, uuid::Uuid::new_v4().simple())
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Counter-suffixed ids; predictable in tests, clones share the counter
#[derive(Clone, Debug)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}_{}", self.prefix, n)
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
