// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced transport wrapper for consistent observability

use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any HttpTransport
#[derive(Clone)]
pub struct TracedTransport<T> {
    inner: T,
}

impl<T> TracedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for TracedTransport<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let span = tracing::info_span!(
            "http.send",
            method = %request.method,
            url = %request.url
        );

        async move {
            // Precondition: absolute http(s) url
            if !(request.url.starts_with("http://") || request.url.starts_with("https://")) {
                tracing::error!("url is not absolute");
                return Err(TransportError::InvalidRequest(format!(
                    "url must be absolute http(s): {}",
                    request.url
                )));
            }

            tracing::debug!(
                headers = request.headers.len(),
                body_len = request.body.as_ref().map_or(0, Vec::len),
                "sending"
            );

            let start = std::time::Instant::now();
            let result = self.inner.send(request).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(response) => tracing::info!(
                    status = response.status,
                    body_len = response.body.len(),
                    elapsed_ms,
                    "response received"
                ),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "send failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
