// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Production transport backed by a ureq agent
//!
//! ureq is blocking, so each exchange runs on tokio's blocking pool. Dropping
//! the returned future abandons the exchange; the agent-level timeout bounds
//! how long the abandoned thread can linger.

use super::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use async_trait::async_trait;
use std::time::Duration;
use ureq::typestate::WithBody;
use ureq::{Agent, RequestBuilder};

/// Upper bound on a single exchange, enforced inside the agent
const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_AGENT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for UreqTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || exchange(&agent, request))
            .await
            .map_err(|e| TransportError::Io(format!("transport task failed: {}", e)))?
    }
}

fn exchange(agent: &Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;

    let result = match method {
        Method::Post => send_body(with_headers(agent.post(&url), &headers), body),
        Method::Put => send_body(with_headers(agent.put(&url), &headers), body),
        Method::Patch => send_body(with_headers(agent.patch(&url), &headers), body),
        Method::Delete => match body {
            Some(body) => with_headers(agent.delete(&url), &headers)
                .force_send_body()
                .send(&body[..]),
            None => with_headers(agent.delete(&url), &headers).call(),
        },
        Method::Get => with_headers(agent.get(&url), &headers).call(),
        Method::Head => with_headers(agent.head(&url), &headers).call(),
        Method::Options => with_headers(agent.options(&url), &headers).call(),
    };

    let mut response = result.map_err(classify)?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_vec()
        .map_err(|e| TransportError::Io(format!("failed to read response: {}", e)))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn with_headers<B>(
    mut builder: RequestBuilder<B>,
    headers: &[(String, String)],
) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_body(
    builder: RequestBuilder<WithBody>,
    body: Option<Vec<u8>>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    builder.send(&body.unwrap_or_default()[..])
}

fn classify(error: ureq::Error) -> TransportError {
    match error {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            TransportError::Connect(error.to_string())
        }
        ureq::Error::BadUri(message) => TransportError::InvalidRequest(message),
        other => TransportError::Io(other.to_string()),
    }
}
