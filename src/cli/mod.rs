//! CLI for retrykit.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use retrykit::config;

use commands::{run_config, run_probe, ProbeOverrides};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "retrykit")]
#[command(about = "retrykit: retry network calls on a backoff schedule", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// HEAD-probe a URL, retrying transient network failures.
    Probe {
        /// HTTP/HTTPS URL to probe.
        url: String,
        /// Attempts including the first; negative retries until a non-transient error.
        #[arg(long, allow_negative_numbers = true, value_name = "N")]
        attempts: Option<i64>,
        /// Seconds to wait before the first retry.
        #[arg(long, value_name = "SECS")]
        delay: Option<f64>,
        /// Seconds added to the delay after each retry.
        #[arg(long, value_name = "SECS")]
        step: Option<f64>,
        /// Upper bound on the delay in seconds.
        #[arg(long, value_name = "SECS")]
        max_delay: Option<f64>,
    },

    /// Print the effective configuration as TOML.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Probe {
                url,
                attempts,
                delay,
                step,
                max_delay,
            } => {
                let overrides = ProbeOverrides {
                    attempts,
                    delay,
                    step,
                    max_delay,
                };
                run_probe(&cfg, &url, &overrides)?;
            }
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}
