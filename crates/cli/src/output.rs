// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use lattice_client::{ClientConfig, Payload};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print a response body. Text mode writes the body as received.
pub fn print_payload(payload: &Payload, format: OutputFormat) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Json => writeln!(stdout, "{}", to_pretty(payload)?)?,
        OutputFormat::Text => match payload {
            Payload::Json(value) => writeln!(stdout, "{}", to_pretty(value)?)?,
            Payload::Text(text) => writeln!(stdout, "{}", text)?,
            Payload::Binary(bytes) => stdout.write_all(bytes)?,
            Payload::Empty => {}
        },
    }
    stdout.flush()
}

pub fn print_config(config: &ClientConfig, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", to_pretty(config)?),
        OutputFormat::Text => print!("{}", config_summary(config)),
    }
    Ok(())
}

fn config_summary(config: &ClientConfig) -> String {
    let mut lines = vec![
        format!("{:<10} {}", "baseURL", display_or_unset(&config.base_url)),
        format!("{:<10} {}ms", "timeout", config.timeout),
        format!(
            "{:<10} enabled={} ttl={}ms maxSize={}",
            "cache", config.cache.enabled, config.cache.ttl, config.cache.max_size
        ),
        format!(
            "{:<10} maxRetries={} retryDelay={}ms backoff={} retryOn={:?}",
            "retry",
            config.retry.max_retries,
            config.retry.retry_delay,
            config.retry.backoff_multiplier,
            config.retry.retry_on
        ),
    ];
    for (name, value) in &config.headers {
        lines.push(format!("{:<10} {}: {}", "header", name, value));
    }
    for (name, path) in &config.endpoints {
        lines.push(format!("{:<10} @{} -> {}", "endpoint", name, path));
    }
    lines.iter().map(|line| format!("{}\n", line)).collect()
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

fn to_pretty<T: serde::Serialize + ?Sized>(value: &T) -> io::Result<String> {
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
