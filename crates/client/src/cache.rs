// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response cache keyed by fully resolved URL
//!
//! Entries are valid while `now - inserted < ttl` and are dropped lazily on
//! lookup. When full, the oldest insertion is evicted first (FIFO, not LRU:
//! a hit does not refresh an entry's position).

use crate::response::Payload;
use lattice_core::Clock;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    payload: Payload,
    inserted: Instant,
}

#[derive(Debug)]
pub struct ResponseCache<C: Clock> {
    clock: C,
    ttl: Duration,
    max_size: usize,
    entries: HashMap<String, Entry>,
    /// Keys in insertion order, oldest first
    order: VecDeque<String>,
}

impl<C: Clock> ResponseCache<C> {
    pub fn new(clock: C, ttl: Duration, max_size: usize) -> Self {
        Self {
            clock,
            ttl,
            max_size,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Fresh payload for `key`, removing it if it has expired
    pub fn get(&mut self, key: &str) -> Option<Payload> {
        let entry = self.entries.get(key)?;
        if self.clock.elapsed_since(entry.inserted) < self.ttl {
            return Some(entry.payload.clone());
        }
        self.remove(key);
        None
    }

    /// Store `payload` under `key`; re-inserting a key counts as a new insertion
    pub fn insert(&mut self, key: impl Into<String>, payload: Payload) {
        if self.max_size == 0 {
            return;
        }
        let key = key.into();
        self.remove(&key);
        while self.entries.len() >= self.max_size {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.order.push_back(key.clone());
        self.entries.insert(
            key,
            Entry {
                payload,
                inserted: self.clock.now(),
            },
        );
    }

    pub fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_none() {
            return false;
        }
        self.order.retain(|k| k != key);
        true
    }

    /// Drop everything, returning how many entries were held
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.order.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
