//! CLI for handing download jobs to the companion application.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use handoff_core::config::{self, HandoffConfig};

use commands::{run_config, run_probe, run_send, run_status, run_watch, SendArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "handoff")]
#[command(about = "Hand download jobs to a local companion application", long_about = None)]
pub struct Cli {
    /// First candidate port (overrides config.toml).
    #[arg(long, global = true, value_name = "PORT")]
    pub base_port: Option<u16>,

    /// Number of candidate ports to sweep (overrides config.toml).
    #[arg(long, global = true, value_name = "N")]
    pub max_port_attempts: Option<u16>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Send a download job to the companion.
    Send(SendArgs),

    /// Find the companion and show which port it is listening on.
    Status,

    /// Run a single liveness check against one port.
    Probe {
        /// Loopback port to check.
        port: u16,
    },

    /// Keep checking the companion periodically and print status changes until Ctrl-C.
    Watch,

    /// Print the effective configuration.
    Config,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply_overrides(&self, cfg: &mut HandoffConfig) {
        if let Some(port) = self.base_port {
            cfg.base_port = port;
        }
        if let Some(n) = self.max_port_attempts {
            cfg.max_port_attempts = n;
        }
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        cli.apply_overrides(&mut cfg);
        cfg.validate()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Send(args) => run_send(&cfg, args).await?,
            CliCommand::Status => run_status(&cfg).await?,
            CliCommand::Probe { port } => run_probe(&cfg, port).await?,
            CliCommand::Watch => run_watch(&cfg).await?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
