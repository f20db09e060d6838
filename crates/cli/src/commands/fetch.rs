// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lattice fetch <endpoint>` - Issue one request through the data client

use crate::error::CliError;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use lattice_adapters::{Method, TracedTransport, UreqTransport};
use lattice_bus::EventBus;
use lattice_client::{events, ClientConfig, Credentials, DataClient, RequestOptions};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

#[derive(Args)]
pub struct FetchArgs {
    /// Endpoint path, absolute URL, or `@name` of a configured endpoint
    pub endpoint: String,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Request body as JSON
    #[arg(long, short)]
    pub data: Option<String>,

    /// Query parameter `key=value` (repeatable)
    #[arg(long = "param", short = 'p', value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Extra header `Name: value` (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Per-attempt timeout, e.g. `500ms` or `10s`
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Maximum number of retries
    #[arg(long)]
    pub retries: Option<u32>,

    /// Override the configured base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Bearer token, delivered through `auth:token-updated`
    #[arg(long)]
    pub token: Option<String>,

    /// Do not attach the bearer token
    #[arg(long)]
    pub anonymous: bool,

    /// Print `api:*` lifecycle events to stderr as JSON lines
    #[arg(long)]
    pub events: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub async fn fetch(args: FetchArgs, mut config: ClientConfig) -> Result<()> {
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout.as_millis() as u64;
    }
    if let Some(retries) = args.retries {
        config.retry.max_retries = retries;
    }

    let method: Method = args.method.parse()?;
    let body: Option<Value> = args
        .data
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .context("--data is not valid JSON")?;
    let endpoint = resolve_endpoint(&config, &args.endpoint)?;

    let bus = EventBus::shared();
    if args.events {
        bus.on("api:*", |event| {
            eprintln!("{}", json!({ "topic": event.topic, "payload": event.payload }));
            Ok(())
        });
    }

    let client = DataClient::builder(TracedTransport::new(UreqTransport::new()))
        .config(config)
        .bus(bus.clone())
        .build();
    if let Some(token) = args.token {
        bus.publish(events::AUTH_TOKEN_UPDATED, json!({ "token": token }));
    }

    let options = RequestOptions {
        method,
        headers: args.headers,
        params: args.params,
        body,
        credentials: if args.anonymous {
            Credentials::Omit
        } else {
            Credentials::Include
        },
    };

    let in_flight = client.submit(&endpoint, options);
    let request_id = in_flight.id().to_string();
    let mut task = tokio::spawn(in_flight.wait());
    let result = tokio::select! {
        joined = &mut task => joined?,
        _ = tokio::signal::ctrl_c() => {
            let cancelled = client.cancel(&request_id);
            debug!(request_id = %request_id, cancelled, "interrupted, cancelling request");
            task.await?
        }
    };

    match result {
        Ok(payload) => output::print_payload(&payload, args.format)?,
        Err(error) => return Err(CliError::request_failed(&error, &endpoint).into()),
    }
    Ok(())
}

/// `@name` looks the path up in the configured endpoints
fn resolve_endpoint(config: &ClientConfig, endpoint: &str) -> Result<String> {
    let Some(name) = endpoint.strip_prefix('@') else {
        return Ok(endpoint.to_string());
    };
    config
        .endpoint(name)
        .map(str::to_string)
        .ok_or_else(|| CliError::unknown_endpoint(name, config).into())
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in '{}'", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
