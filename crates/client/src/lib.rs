// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lattice-client: the centralized data client
//!
//! Every outbound HTTP exchange of the runtime goes through [`DataClient`],
//! which layers a response cache, retry with exponential backoff, per-attempt
//! timeouts and cooperative cancellation over an [`HttpTransport`]. When an
//! [`EventBus`] is attached, request lifecycle events are published on it and
//! `auth:token-updated` emissions update the bearer token.
//!
//! [`HttpTransport`]: lattice_adapters::HttpTransport
//! [`EventBus`]: lattice_bus::EventBus

mod cache;
mod client;
mod config;
mod error;
pub mod events;
mod metrics;
mod request;
mod response;
mod retry;

pub use cache::ResponseCache;
pub use client::{DataClient, DataClientBuilder, InFlight};
pub use config::{CacheConfig, ClientConfig, ConfigError, RetryConfig};
pub use error::{ApiError, ErrorCode};
pub use metrics::ClientMetrics;
pub use request::{build_url, Credentials, RequestOptions};
pub use response::Payload;
pub use retry::RetryPolicy;
