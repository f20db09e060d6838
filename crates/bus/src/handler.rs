// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscriber callbacks and the events they receive

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

/// An emission as seen by one handler
#[derive(Debug, Clone, Serialize)]
pub struct BusEvent {
    /// The topic the event was published under (never a pattern)
    pub topic: String,
    pub payload: Value,
    /// Context value supplied when the receiving subscription was created
    pub context: Option<Value>,
    pub published_at: DateTime<Utc>,
}

impl BusEvent {
    pub(crate) fn new(topic: &str, payload: Value) -> Self {
        Self {
            topic: topic.to_string(),
            payload,
            context: None,
            published_at: Utc::now(),
        }
    }

    pub(crate) fn with_context(&self, context: Option<Value>) -> Self {
        Self {
            context,
            ..self.clone()
        }
    }
}

/// Failure reported by (or caught around) a handler
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HandlerError {
    #[error("handler failed: {0}")]
    Failed(String),
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::Panicked(message)
    }
}

pub type HandlerResult = Result<(), HandlerError>;

type SyncFn = dyn Fn(&BusEvent) -> HandlerResult + Send + Sync;
type AsyncFn = dyn Fn(BusEvent) -> BoxFuture<'static, HandlerResult> + Send + Sync;

#[derive(Clone)]
enum Kind {
    Sync(Arc<SyncFn>),
    Async(Arc<AsyncFn>),
}

/// A subscriber callback
///
/// Clones share identity: unsubscribing by handler removes every subscription
/// registered with a clone of the same `Handler`.
#[derive(Clone)]
pub struct Handler(Kind);

impl Handler {
    /// A callback that runs to completion inside the dispatch pass
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&BusEvent) -> HandlerResult + Send + Sync + 'static,
    {
        Self(Kind::Sync(Arc::new(f)))
    }

    /// A callback returning a future
    ///
    /// Awaited by `publish_deferred`; spawned onto the ambient tokio runtime
    /// by the synchronous `publish`.
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn(BusEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self(Kind::Async(Arc::new(move |event| f(event).boxed())))
    }

    pub fn is_async(&self) -> bool {
        matches!(self.0, Kind::Async(_))
    }

    /// Identity comparison (data pointer only, vtables may be duplicated)
    pub fn same(&self, other: &Handler) -> bool {
        self.data_ptr() == other.data_ptr()
    }

    fn data_ptr(&self) -> *const () {
        match &self.0 {
            Kind::Sync(f) => Arc::as_ptr(f) as *const (),
            Kind::Async(f) => Arc::as_ptr(f) as *const (),
        }
    }

    /// Invoke a synchronous handler in place. Returns `None` for async handlers.
    pub(crate) fn call_sync(&self, event: &BusEvent) -> Option<HandlerResult> {
        match &self.0 {
            Kind::Sync(f) => Some(run_sync(f.as_ref(), event)),
            Kind::Async(_) => None,
        }
    }

    /// Invoke either kind as a future that never panics
    pub(crate) fn call_deferred(&self, event: BusEvent) -> BoxFuture<'static, HandlerResult> {
        match &self.0 {
            Kind::Sync(f) => {
                let f = Arc::clone(f);
                async move { run_sync(f.as_ref(), &event) }.boxed()
            }
            Kind::Async(f) => match panic::catch_unwind(AssertUnwindSafe(|| f(event))) {
                Ok(fut) => AssertUnwindSafe(fut)
                    .catch_unwind()
                    .map(|outcome| {
                        outcome.unwrap_or_else(|payload| Err(HandlerError::from_panic(payload)))
                    })
                    .boxed(),
                Err(payload) => {
                    futures_util::future::ready(Err(HandlerError::from_panic(payload))).boxed()
                }
            },
        }
    }
}

fn run_sync(f: &SyncFn, event: &BusEvent) -> HandlerResult {
    panic::catch_unwind(AssertUnwindSafe(|| f(event)))
        .unwrap_or_else(|payload| Err(HandlerError::from_panic(payload)))
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_async() { "async" } else { "sync" };
        write!(f, "Handler({kind}, {:p})", self.data_ptr())
    }
}
