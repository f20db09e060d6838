// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lattice - data client and event bus operator CLI

mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, fetch};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lattice",
    version,
    about = "Lattice - issue requests through the data client and inspect its configuration"
)]
struct Cli {
    /// Client configuration file (JSON, or TOML by extension)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request an endpoint and print the decoded response
    Fetch(fetch::FetchArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let client_config = lattice_client::ClientConfig::load_or_default(cli.config.as_deref());

    match cli.command {
        Commands::Fetch(args) => fetch::fetch(args, client_config).await?,
        Commands::Config(args) => config::config(args, &client_config)?,
    }

    Ok(())
}

/// Logs go to stderr so stdout stays clean for response bodies
fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
