// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-request options and URL resolution

use crate::error::ApiError;
use lattice_adapters::Method;
use serde_json::Value;
use url::Url;

/// Whether the stored bearer token is attached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    Include,
    Omit,
}

/// Options for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    /// Extra headers; they override configured headers of the same name
    pub headers: Vec<(String, String)>,
    /// Query parameters appended to the URL in order
    pub params: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
    pub credentials: Credentials,
}

impl RequestOptions {
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

/// Resolve `endpoint` against `base_url` and append `params`.
///
/// Absolute `http(s)://` endpoints bypass the base URL. The result is also
/// the cache key for the request.
pub fn build_url(base_url: &str, endpoint: &str, params: &[(String, String)]) -> Result<Url, ApiError> {
    let raw = if is_absolute(endpoint) {
        endpoint.to_string()
    } else {
        join(base_url, endpoint)
    };

    let mut url = Url::parse(&raw)
        .map_err(|e| ApiError::invalid(format!("cannot build URL from {:?}: {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::invalid(format!(
            "unsupported URL scheme: {}",
            url.scheme()
        )));
    }
    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    Ok(url)
}

fn is_absolute(endpoint: &str) -> bool {
    endpoint.starts_with("http://") || endpoint.starts_with("https://")
}

fn join(base_url: &str, endpoint: &str) -> String {
    match (base_url.ends_with('/'), endpoint.starts_with('/')) {
        (true, true) => format!("{}{}", base_url, &endpoint[1..]),
        (false, false) if !base_url.is_empty() && !endpoint.is_empty() => {
            format!("{}/{}", base_url, endpoint)
        }
        _ => format!("{}{}", base_url, endpoint),
    }
}
