// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted HTTP transport for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// One scripted outcome, optionally delayed
#[derive(Debug, Clone)]
pub struct FakeReply {
    outcome: Result<HttpResponse, TransportError>,
    delay: Duration,
}

impl FakeReply {
    pub fn response(response: HttpResponse) -> Self {
        Self {
            outcome: Ok(response),
            delay: Duration::ZERO,
        }
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self::response(
            HttpResponse::new(status)
                .with_header("Content-Type", "application/json")
                .with_body(body.to_string()),
        )
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self::response(
            HttpResponse::new(status)
                .with_header("Content-Type", "text/plain; charset=utf-8")
                .with_body(body),
        )
    }

    pub fn status(status: u16) -> Self {
        Self::response(HttpResponse::new(status))
    }

    pub fn error(error: TransportError) -> Self {
        Self {
            outcome: Err(error),
            delay: Duration::ZERO,
        }
    }

    /// Hold the reply back for `delay` (tokio time, so paused clocks apply)
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A recorded exchange
#[derive(Debug, Clone)]
pub struct HttpCall {
    pub request: HttpRequest,
    pub at: Instant,
}

#[derive(Default)]
struct FakeState {
    script: VecDeque<FakeReply>,
    fallback: Option<FakeReply>,
    calls: Vec<HttpCall>,
}

/// Fake transport: replies from a script, then from a fallback
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next unanswered call
    pub fn push(&self, reply: FakeReply) -> &Self {
        self.lock().script.push_back(reply);
        self
    }

    /// Reply used once the script is exhausted
    pub fn always(&self, reply: FakeReply) -> &Self {
        self.lock().fallback = Some(reply);
        self
    }

    pub fn calls(&self) -> Vec<HttpCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = {
            let mut state = self.lock();
            state.calls.push(HttpCall {
                request: request.clone(),
                at: Instant::now(),
            });
            state
                .script
                .pop_front()
                .or_else(|| state.fallback.clone())
        };

        let Some(reply) = reply else {
            return Err(TransportError::Connect(format!(
                "no scripted reply for {} {}",
                request.method, request.url
            )));
        };

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.outcome
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
