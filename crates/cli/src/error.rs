// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! A failed command reports what went wrong, why it might have happened,
//! and what to try next.

use lattice_client::{ApiError, ClientConfig, ErrorCode};
use std::fmt;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// A request that ended in a normalized client error
    pub fn request_failed(error: &ApiError, endpoint: &str) -> Self {
        let base = CliError::new(format!("request to '{}' failed: {}", endpoint, error))
            .with_source(error.clone());
        match error.code {
            ErrorCode::NetworkError => base
                .with_context("No response was received from the server")
                .with_suggestion("Check that the host is reachable")
                .with_suggestion("Override the host with --base-url"),
            ErrorCode::Timeout => base
                .with_context("The server did not answer within the per-attempt timeout")
                .with_suggestion("Raise the limit, e.g. --timeout 60s"),
            ErrorCode::HttpError => match error.status {
                Some(401) | Some(403) => base
                    .with_context("The server rejected the credentials")
                    .with_suggestion("Pass a bearer token with --token"),
                Some(404) => base.with_suggestion("List configured endpoints: lattice config show"),
                _ => base,
            },
            ErrorCode::InvalidRequest => base
                .with_context("The request URL or body could not be built")
                .with_suggestion("Set baseURL in the config file or pass an absolute URL"),
            ErrorCode::Cancelled
            | ErrorCode::ParseError
            | ErrorCode::GraphqlError => base,
        }
    }

    /// An `@name` endpoint that the configuration does not define
    pub fn unknown_endpoint(name: &str, config: &ClientConfig) -> Self {
        let known: Vec<&str> = config.endpoints.keys().map(String::as_str).collect();
        let err = CliError::new(format!("no endpoint named '{}'", name));
        if known.is_empty() {
            err.with_context("The configuration defines no endpoints")
                .with_suggestion("Add an \"endpoints\" map to the config file")
        } else {
            err.with_context(format!("Known endpoints: {}", known.join(", ")))
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                write!(f, "\n  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n\nsuggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                write!(f, "\n  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}
