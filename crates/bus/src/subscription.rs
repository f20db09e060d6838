// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription records

use crate::handler::Handler;
use crate::pattern::TopicPattern;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};

/// Handle returned by `subscribe`, usable with `unsubscribe`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SubscriptionId(pub String);

impl SubscriptionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SubscriptionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Options for `EventBus::subscribe`
#[derive(Clone, Debug, Default)]
pub struct SubscribeOptions {
    /// Higher runs first; equal priorities run in registration order
    pub priority: i32,
    /// Remove the subscription after it fires once
    pub once: bool,
    /// Passed to the handler as `BusEvent::context`
    pub context: Option<Value>,
}

impl SubscribeOptions {
    pub fn priority(priority: i32) -> Self {
        Self {
            priority,
            ..Self::default()
        }
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }
}

/// A registered subscription, owned by the bus
#[derive(Debug)]
pub(crate) struct Subscription {
    pub id: SubscriptionId,
    pub pattern: TopicPattern,
    pub handler: Handler,
    pub priority: i32,
    pub once: bool,
    pub context: Option<Value>,
    /// Registration order, used to break priority ties
    pub sequence: u64,
    fired: AtomicBool,
}

impl Subscription {
    pub fn new(
        id: SubscriptionId,
        pattern: TopicPattern,
        handler: Handler,
        options: SubscribeOptions,
        sequence: u64,
    ) -> Self {
        Self {
            id,
            pattern,
            handler,
            priority: options.priority,
            once: options.once,
            context: options.context,
            sequence,
            fired: AtomicBool::new(false),
        }
    }

    /// Claim the right to fire. Always true for persistent subscriptions;
    /// true exactly once for one-shot subscriptions.
    pub fn claim(&self) -> bool {
        !self.once || !self.fired.swap(true, Ordering::AcqRel)
    }

    pub fn info(&self) -> SubscriptionInfo {
        SubscriptionInfo {
            id: self.id.clone(),
            topic: self.pattern.as_str().to_string(),
            wildcard: self.pattern.wildcard(),
            priority: self.priority,
            once: self.once,
        }
    }
}

/// Diagnostic view of a subscription
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubscriptionInfo {
    pub id: SubscriptionId,
    pub topic: String,
    pub wildcard: bool,
    pub priority: i32,
    pub once: bool,
}
