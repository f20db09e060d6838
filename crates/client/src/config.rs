// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration
//!
//! Loaded once at startup from JSON (or TOML when the file name ends in
//! `.toml`). Every key is optional; a missing or malformed file falls back to
//! the built-in defaults through [`ClientConfig::load_or_default`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding `baseURL`
pub const ENV_BASE_URL: &str = "LATTICE_BASE_URL";
/// Environment variable overriding `timeout` (milliseconds)
pub const ENV_TIMEOUT_MS: &str = "LATTICE_TIMEOUT_MS";

/// Errors while reading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Prefix for relative endpoints
    #[serde(rename = "baseURL")]
    pub base_url: String,
    /// Per-attempt timeout in milliseconds
    pub timeout: u64,
    /// Headers sent with every request
    pub headers: BTreeMap<String, String>,
    /// Named endpoint paths, see [`ClientConfig::endpoint`]
    pub endpoints: BTreeMap<String, String>,
    pub cache: CacheConfig,
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let headers = [("Content-Type", "application/json"), ("Accept", "application/json")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            base_url: String::new(),
            timeout: 30_000,
            headers,
            endpoints: BTreeMap::new(),
            cache: CacheConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    pub enabled: bool,
    /// Time-to-live in milliseconds
    pub ttl: u64,
    pub max_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: 300_000,
            max_size: 100,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryConfig {
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds
    pub retry_delay: u64,
    pub backoff_multiplier: f64,
    /// Response statuses that trigger a retry
    pub retry_on: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: 1_000,
            backoff_multiplier: 2.0,
            retry_on: vec![408, 429, 500, 502, 503, 504],
        }
    }
}

impl ClientConfig {
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read a configuration file; the format follows the extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Load `path` (when given), falling back to defaults on any failure,
    /// then apply environment overrides. Never fails.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let config = match path {
            Some(path) => Self::load(path).unwrap_or_else(|error| {
                tracing::warn!(path = %path.display(), %error, "using default client config");
                Self::default()
            }),
            None => Self::default(),
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `LATTICE_BASE_URL` / `LATTICE_TIMEOUT_MS` as resolved by `lookup`.
    /// Unparseable values are ignored with a warning.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(timeout) => self.timeout = timeout,
                Err(error) => {
                    tracing::warn!(var = ENV_TIMEOUT_MS, value = %raw, %error, "ignoring override")
                }
            }
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Path registered under `name` in `endpoints`
    pub fn endpoint(&self, name: &str) -> Option<&str> {
        self.endpoints.get(name).map(String::as_str)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
