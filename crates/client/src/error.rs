// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Normalized client errors

use chrono::{DateTime, Utc};
use lattice_adapters::TransportError;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Failure kinds a caller can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No response was obtained
    NetworkError,
    /// Non-2xx response (after retries, when retryable)
    HttpError,
    Timeout,
    Cancelled,
    /// The body did not match its declared content type
    ParseError,
    /// A GraphQL response carried `errors`
    GraphqlError,
    /// The request could not be built (bad URL, unknown endpoint, ...)
    InvalidRequest,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::HttpError => "HTTP_ERROR",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::Cancelled => "CANCELLED",
            ErrorCode::ParseError => "PARSE_ERROR",
            ErrorCode::GraphqlError => "GRAPHQL_ERROR",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error shape surfaced by every client operation
#[derive(Debug, Clone, Error, Serialize)]
#[error("[{code}] {message}")]
pub struct ApiError {
    pub message: String,
    pub status: Option<u16>,
    pub code: ErrorCode,
    pub timestamp: DateTime<Utc>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            code,
            timestamp: Utc::now(),
        }
    }

    pub fn http(status: u16, body: &[u8]) -> Self {
        let detail = String::from_utf8_lossy(body);
        let detail = detail.trim();
        let message = if detail.is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, truncate(detail, 200))
        };
        Self {
            status: Some(status),
            ..Self::new(ErrorCode::HttpError, message)
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            ErrorCode::Timeout,
            format!("request timed out after {}ms", after.as_millis()),
        )
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorCode::Cancelled, "request cancelled")
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, message)
    }

    pub fn graphql(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GraphqlError, message)
    }

    /// Attach the status of the response that produced this error
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.code == ErrorCode::Cancelled
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        let code = match error {
            TransportError::Timeout => ErrorCode::Timeout,
            TransportError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            TransportError::Connect(_) | TransportError::Io(_) => ErrorCode::NetworkError,
        };
        Self::new(code, error.to_string())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
