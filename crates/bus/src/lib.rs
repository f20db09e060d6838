// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Process-wide publish/subscribe event bus
//!
//! This crate provides:
//! - `EventBus` - synchronous and deferred dispatch with priority ordering
//! - `TopicPattern` - exact topics and `*`/`?` glob patterns, compiled once
//! - `History` - bounded ring of completed emissions for diagnostics
//! - `BusMetrics` - publish/invocation/error counters and mean dispatch time
//!
//! Topics conventionally follow `<domain>:<action>` (`auth:token-updated`,
//! `api:request-error`); wildcard subscribers usually take `<domain>:*`.

mod bus;
mod config;
mod handler;
mod history;
mod metrics;
mod pattern;
mod subscription;

pub use bus::{DispatchReport, EventBus, HandlerFailure};
pub use config::BusConfig;
pub use handler::{BusEvent, Handler, HandlerError, HandlerResult};
pub use history::{History, HistoryEntry};
pub use metrics::BusMetrics;
pub use pattern::{PatternError, TopicPattern};
pub use subscription::{SubscribeOptions, SubscriptionId, SubscriptionInfo};
