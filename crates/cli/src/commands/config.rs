// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lattice config` - Inspect the effective client configuration

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use lattice_client::ClientConfig;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the configuration after defaults, file and environment are applied
    Show {
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Print the path registered under a named endpoint
    Endpoint { name: String },
}

pub fn config(args: ConfigArgs, config: &ClientConfig) -> Result<()> {
    match args.command {
        ConfigCommand::Show { format } => output::print_config(config, format)?,
        ConfigCommand::Endpoint { name } => {
            let path = config
                .endpoint(&name)
                .ok_or_else(|| anyhow::anyhow!("no endpoint named '{}'", name))?;
            println!("{}", path);
        }
    }
    Ok(())
}
