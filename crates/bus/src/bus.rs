// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus for routing emissions to subscribers

use crate::config::BusConfig;
use crate::handler::{BusEvent, Handler, HandlerError, HandlerResult};
use crate::history::{History, HistoryEntry};
use crate::metrics::{BusMetrics, MetricsState};
use crate::pattern::TopicPattern;
use crate::subscription::{SubscribeOptions, Subscription, SubscriptionId, SubscriptionInfo};
use futures_util::future::join_all;
use lattice_core::{IdGen, SequentialIdGen};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

static SHARED: OnceLock<EventBus> = OnceLock::new();

/// Subscriptions, split by how they are matched
#[derive(Default)]
struct Registry {
    exact: HashMap<String, Vec<Arc<Subscription>>>,
    wildcard: Vec<Arc<Subscription>>,
    sequence: u64,
}

impl Registry {
    /// Every subscription that receives `topic`, highest priority first,
    /// registration order within a priority
    fn resolve(&self, topic: &str) -> Vec<Arc<Subscription>> {
        let mut seen = HashSet::new();
        let mut targets: Vec<Arc<Subscription>> = self
            .exact
            .get(topic)
            .into_iter()
            .flatten()
            .chain(self.wildcard.iter().filter(|sub| sub.pattern.matches(topic)))
            .filter(|sub| seen.insert(sub.id.clone()))
            .cloned()
            .collect();

        targets.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.sequence.cmp(&b.sequence))
        });
        targets
    }

    fn insert(&mut self, sub: Arc<Subscription>) {
        if sub.pattern.wildcard() {
            self.wildcard.push(sub);
        } else {
            self.exact
                .entry(sub.pattern.as_str().to_string())
                .or_default()
                .push(sub);
        }
    }

    fn remove_where(&mut self, pred: impl Fn(&Subscription) -> bool) -> usize {
        let before = self.len();
        self.exact.retain(|_, subs| {
            subs.retain(|sub| !pred(sub));
            !subs.is_empty()
        });
        self.wildcard.retain(|sub| !pred(sub));
        before - self.len()
    }

    fn iter(&self) -> impl Iterator<Item = &Arc<Subscription>> {
        self.exact.values().flatten().chain(self.wildcard.iter())
    }

    fn len(&self) -> usize {
        self.exact.values().map(Vec::len).sum::<usize>() + self.wildcard.len()
    }

    fn topics(&self) -> BTreeSet<String> {
        self.iter().map(|sub| sub.pattern.as_str().to_string()).collect()
    }
}

struct Inner {
    registry: RwLock<Registry>,
    history: Mutex<History>,
    metrics: Mutex<MetricsState>,
    ids: SequentialIdGen,
    debug: AtomicBool,
}

/// One handler failure within a dispatch pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    pub subscription: SubscriptionId,
    pub error: HandlerError,
}

/// Outcome of one dispatch pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub topic: String,
    /// Handlers actually invoked, including ones that failed
    pub invoked: usize,
    pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    fn new(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            invoked: 0,
            failures: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.invoked - self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The event bus routes emissions to matching subscribers
///
/// Clones share the same registry, history and metrics.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl EventBus {
    pub fn new(config: BusConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: RwLock::new(Registry::default()),
                history: Mutex::new(History::new(config.max_history)),
                metrics: Mutex::new(MetricsState::default()),
                ids: SequentialIdGen::new("sub"),
                debug: AtomicBool::new(config.debug),
            }),
        }
    }

    /// The process-wide bus. Repeated calls return the same instance.
    pub fn shared() -> Self {
        SHARED
            .get_or_init(|| EventBus::new(BusConfig::default()))
            .clone()
    }

    /// Register `handler` for a topic or glob pattern.
    ///
    /// Returns `None` (and logs) when the topic is empty or cannot be compiled.
    pub fn subscribe(
        &self,
        topic: &str,
        handler: Handler,
        options: SubscribeOptions,
    ) -> Option<SubscriptionId> {
        let pattern = match TopicPattern::parse(topic) {
            Ok(pattern) => pattern,
            Err(error) => {
                warn!(topic, %error, "subscription rejected");
                return None;
            }
        };

        let id = SubscriptionId(self.inner.ids.next());
        let (priority, once) = (options.priority, options.once);
        {
            let mut registry = self.write();
            registry.sequence += 1;
            let sequence = registry.sequence;
            registry.insert(Arc::new(Subscription::new(
                id.clone(),
                pattern,
                handler,
                options,
                sequence,
            )));
        }

        if self.debug_enabled() {
            debug!(topic, id = %id, priority, once, "subscribed");
        }
        Some(id)
    }

    /// Subscribe a synchronous closure with default options
    pub fn on<F>(&self, topic: &str, f: F) -> Option<SubscriptionId>
    where
        F: Fn(&BusEvent) -> HandlerResult + Send + Sync + 'static,
    {
        self.subscribe(topic, Handler::sync(f), SubscribeOptions::default())
    }

    /// Subscribe a closure that is removed after it fires once
    pub fn once<F>(&self, topic: &str, f: F) -> Option<SubscriptionId>
    where
        F: Fn(&BusEvent) -> HandlerResult + Send + Sync + 'static,
    {
        self.subscribe(topic, Handler::sync(f), SubscribeOptions::default().once())
    }

    /// Subscribe an async closure with default options
    pub fn on_async<F, Fut>(&self, topic: &str, f: F) -> Option<SubscriptionId>
    where
        F: Fn(BusEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.subscribe(topic, Handler::future(f), SubscribeOptions::default())
    }

    /// Remove subscriptions.
    ///
    /// A subscription id removes that one subscription wherever it is
    /// registered. Anything else is taken as a literal topic (or pattern text):
    /// all of its subscriptions are removed, or only those registered with
    /// `handler` when one is given. Returns whether anything was removed.
    pub fn unsubscribe(&self, topic_or_id: &str, handler: Option<&Handler>) -> bool {
        let removed = if self.inner.ids.is_id(topic_or_id) {
            self.write()
                .remove_where(|sub| sub.id.as_str() == topic_or_id)
        } else {
            self.write().remove_where(|sub| {
                sub.pattern.as_str() == topic_or_id
                    && handler.map_or(true, |h| sub.handler.same(h))
            })
        };

        if self.debug_enabled() {
            debug!(target_key = topic_or_id, removed, "unsubscribed");
        }
        removed > 0
    }

    /// Drop every subscription for one topic (exact and pattern), or all of them
    pub fn clear_all(&self, topic: Option<&str>) -> usize {
        let mut registry = self.write();
        match topic {
            Some(topic) => registry.remove_where(|sub| sub.pattern.as_str() == topic),
            None => {
                let removed = registry.len();
                registry.exact.clear();
                registry.wildcard.clear();
                removed
            }
        }
    }

    /// Dispatch synchronously; returns the number of handlers invoked
    pub fn publish(&self, topic: &str, payload: Value) -> usize {
        self.publish_report(topic, payload).invoked
    }

    /// Dispatch synchronously, reporting each handler failure.
    ///
    /// Handlers run in the caller's context, in priority order, against a
    /// snapshot taken before the first one runs. Async handlers are spawned
    /// onto the current tokio runtime; without one they are skipped.
    pub fn publish_report(&self, topic: &str, payload: Value) -> DispatchReport {
        let started = Instant::now();
        let event = BusEvent::new(topic, payload);
        let targets = self.claim_targets(topic);
        let release = self.release_once(&targets);
        let runtime = tokio::runtime::Handle::try_current().ok();
        let mut report = DispatchReport::new(topic);

        for sub in &targets {
            let scoped = event.with_context(sub.context.clone());
            match sub.handler.call_sync(&scoped) {
                Some(outcome) => {
                    report.invoked += 1;
                    if let Err(error) = outcome {
                        record_failure(&mut report, sub, error);
                    }
                }
                None => match &runtime {
                    Some(handle) => {
                        report.invoked += 1;
                        self.spawn_detached(handle, sub, scoped);
                    }
                    None => warn!(
                        topic,
                        subscription = %sub.id,
                        "no async runtime, skipping async handler"
                    ),
                },
            }
        }

        drop(release);
        self.finish(&event, &report, started.elapsed());
        report
    }

    /// Dispatch to all handlers concurrently; resolves once every handler
    /// has settled. Returns the number of handlers invoked.
    pub async fn publish_deferred(&self, topic: &str, payload: Value) -> usize {
        self.publish_deferred_report(topic, payload).await.invoked
    }

    pub async fn publish_deferred_report(&self, topic: &str, payload: Value) -> DispatchReport {
        let started = Instant::now();
        let event = BusEvent::new(topic, payload);
        let targets = self.claim_targets(topic);
        let release = self.release_once(&targets);

        let outcomes = join_all(
            targets
                .iter()
                .map(|sub| sub.handler.call_deferred(event.with_context(sub.context.clone()))),
        )
        .await;

        let mut report = DispatchReport::new(topic);
        report.invoked = targets.len();
        for (sub, outcome) in targets.iter().zip(outcomes) {
            if let Err(error) = outcome {
                record_failure(&mut report, sub, error);
            }
        }

        drop(release);
        self.finish(&event, &report, started.elapsed());
        report
    }

    /// Topics and patterns with at least one subscription, sorted
    pub fn list_topics(&self) -> Vec<String> {
        self.read().topics().into_iter().collect()
    }

    /// Subscriptions registered under `topic` (or pattern text), in dispatch order
    pub fn list_subscriptions(&self, topic: &str) -> Vec<SubscriptionInfo> {
        let registry = self.read();
        let mut subs: Vec<&Arc<Subscription>> = registry
            .iter()
            .filter(|sub| sub.pattern.as_str() == topic)
            .collect();
        subs.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.sequence.cmp(&b.sequence))
        });
        subs.into_iter().map(|sub| sub.info()).collect()
    }

    pub fn subscriber_count(&self) -> usize {
        self.read().len()
    }

    /// The last `limit` completed emissions, oldest first
    pub fn recent_history(&self, limit: usize) -> Vec<HistoryEntry> {
        self.inner
            .history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .recent(limit)
    }

    pub fn metrics(&self) -> BusMetrics {
        let (subscriptions, topics) = {
            let registry = self.read();
            (registry.len(), registry.topics().len())
        };
        self.inner
            .metrics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .snapshot(subscriptions, topics)
    }

    pub fn set_debug_logging(&self, enabled: bool) {
        self.inner.debug.store(enabled, Ordering::Relaxed);
    }

    fn debug_enabled(&self) -> bool {
        self.inner.debug.load(Ordering::Relaxed)
    }

    /// Snapshot the subscribers for `topic` and claim the one-shot ones, so a
    /// reentrant publish cannot fire them a second time
    fn claim_targets(&self, topic: &str) -> Vec<Arc<Subscription>> {
        let resolved = self.read().resolve(topic);
        resolved.into_iter().filter(|sub| sub.claim()).collect()
    }

    fn release_once(&self, targets: &[Arc<Subscription>]) -> OneShotRelease<'_> {
        OneShotRelease {
            bus: self,
            ids: targets
                .iter()
                .filter(|sub| sub.once)
                .map(|sub| sub.id.clone())
                .collect(),
        }
    }

    fn spawn_detached(&self, handle: &tokio::runtime::Handle, sub: &Subscription, event: BusEvent) {
        let inner = Arc::clone(&self.inner);
        let id = sub.id.clone();
        let call = sub.handler.call_deferred(event);
        handle.spawn(async move {
            if let Err(error) = call.await {
                warn!(subscription = %id, %error, "async handler failed");
                inner
                    .metrics
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .record_late_error();
            }
        });
    }

    /// Post-pass bookkeeping: history and metrics
    fn finish(&self, event: &BusEvent, report: &DispatchReport, elapsed: Duration) {
        self.inner
            .history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .append(&event.topic, event.payload.clone(), report.invoked, elapsed);
        self.inner
            .metrics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .record_emission(report.invoked, report.failures.len(), elapsed);

        if self.debug_enabled() {
            debug!(
                topic = %event.topic,
                invoked = report.invoked,
                failed = report.failures.len(),
                elapsed_us = elapsed.as_micros() as u64,
                "published"
            );
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.inner
            .registry
            .read()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.inner
            .registry
            .write()
            .unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(BusConfig::default())
    }
}

/// Removes the one-shot subscriptions claimed by a pass when it ends,
/// including a deferred pass dropped before its handlers settle
struct OneShotRelease<'a> {
    bus: &'a EventBus,
    ids: Vec<SubscriptionId>,
}

impl Drop for OneShotRelease<'_> {
    fn drop(&mut self) {
        if !self.ids.is_empty() {
            let ids = &self.ids;
            self.bus.write().remove_where(|sub| ids.contains(&sub.id));
        }
    }
}

fn record_failure(report: &mut DispatchReport, sub: &Subscription, error: HandlerError) {
    warn!(
        topic = %report.topic,
        subscription = %sub.id,
        %error,
        "handler failed"
    );
    report.failures.push(HandlerFailure {
        subscription: sub.id.clone(),
        error,
    });
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
