//! Pulse CLI - terminal front-end for the presence client.
//!
//! Connects to the gateway, prints connection and presence notifications,
//! and reads activity commands from stdin.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod config_bridge;
mod formatter;
mod repl;
mod theme;

/// Pulse - gateway presence client
#[derive(Parser)]
#[command(name = "pulse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a configuration file, layered over ~/.pulse/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect and run interactively (default)
    Run {
        /// Authentication token; overrides the configured one
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Print the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let resolved = pulse_config::Config::load(cli.config.as_deref())
        .context("failed to load configuration")?;

    let log_config = config_bridge::to_log_config(&resolved.config, cli.verbose);
    if let Err(e) = pulse_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command.unwrap_or(Commands::Run { token: None }) {
        Commands::Run { token } => {
            let token = token
                .filter(|t| !t.trim().is_empty())
                .or_else(|| resolved.config.gateway.token.clone());
            let gateway = config_bridge::to_gateway_config(&resolved.config);
            commands::run::run_client(gateway, token).await?;
        },
        Commands::Config => {
            commands::config::show_config(&resolved)?;
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_is_the_default() {
        let cli = Cli::try_parse_from(["pulse", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_config_flag() {
        let cli = Cli::try_parse_from(["pulse", "config", "--config", "/tmp/p.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/p.toml")));
        assert!(matches!(cli.command, Some(Commands::Config)));
    }

    #[test]
    fn run_accepts_token() {
        let cli = Cli::try_parse_from(["pulse", "run", "--token", "abc"]).unwrap();
        let Some(Commands::Run { token }) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(token.as_deref(), Some("abc"));
    }
}
