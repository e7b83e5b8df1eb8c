// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opsdesk - helpdesk ticketing service with a real-time update channel.
//!
//! This is the binary entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use opsdesk_config::{ConfigError, OpsdeskConfig};

mod listen;
mod serve;

/// Opsdesk - helpdesk ticketing service.
#[derive(Parser, Debug)]
#[command(name = "opsdesk", version, about, long_about = None)]
struct Cli {
    /// Path to a specific config file (bypasses the XDG hierarchy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Opsdesk HTTP/WebSocket server.
    Serve,
    /// Tail real-time ticket updates from a running server.
    Listen,
    /// Print the resolved configuration and exit.
    Config,
}

fn load_config(cli: &Cli) -> Result<OpsdeskConfig, Vec<ConfigError>> {
    match &cli.config {
        Some(path) => match opsdesk_config::load_config_from_path(path) {
            Ok(config) => {
                opsdesk_config::validation::validate_config(&config)?;
                Ok(config)
            }
            Err(err) => Err(opsdesk_config::diagnostic::figment_to_config_errors(err)),
        },
        None => opsdesk_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(errors) => {
            opsdesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Listen) => listen::run_listen(config).await,
        Some(Commands::Config) => {
            match toml::to_string_pretty(&config) {
                Ok(rendered) => {
                    println!("{rendered}");
                    Ok(())
                }
                Err(e) => Err(opsdesk_core::OpsdeskError::Config(e.to_string())),
            }
        }
        None => {
            println!("opsdesk: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
