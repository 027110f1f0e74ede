//! CLI for the Lighthouse Deal Engine client.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lhde_core::config::{self, LhdeConfig};
use lhde_core::deal_engine::DealEngine;
use lhde_core::wait::WaitPolicy;
use std::path::PathBuf;
use std::time::Duration;

use commands::{run_status, run_submit, run_wait};

/// Top-level CLI for the Deal Engine client.
#[derive(Debug, Parser)]
#[command(name = "lhde")]
#[command(about = "Submit CIDs to the Lighthouse Deal Engine and check deal status", long_about = None)]
pub struct Cli {
    /// Bearer token for the Deal Engine API (falls back to `auth_token` in config.toml).
    #[arg(long, global = true, env = "LHDE_AUTH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Override the Deal Engine base URL from the config file.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Read configuration from this file instead of ~/.config/lhde/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Register a CID with the deal engine for deal-making.
    Submit {
        /// Content identifier of previously uploaded content.
        cid: String,
    },

    /// Show the current proof and Filecoin deals for a CID.
    Status {
        /// Content identifier to look up.
        cid: String,
    },

    /// Poll deal status until the CID has Filecoin deals or the deadline passes.
    Wait {
        /// Content identifier to watch.
        cid: String,
        /// Seconds between polls (default from config, else 10).
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
        /// Give up after this many seconds (default from config, else 600).
        #[arg(long, value_name = "SECS")]
        max_wait: Option<u64>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        if let Some(url) = &cli.base_url {
            cfg.base_url = url.clone();
        }

        let token = resolve_token(cli.token.as_deref(), &cfg)?;
        let engine = DealEngine::from_config(&cfg).context("invalid deal engine configuration")?;
        tracing::debug!("using deal engine at {}", engine.base_url());

        match cli.command {
            CliCommand::Submit { cid } => run_submit(&engine, &token, &cid)?,
            CliCommand::Status { cid } => run_status(&engine, &token, &cid)?,
            CliCommand::Wait {
                cid,
                interval,
                max_wait,
            } => {
                let policy = wait_policy(&cfg, interval, max_wait);
                run_wait(&engine, &token, &cid, &policy)?;
            }
        }

        Ok(())
    }
}

/// Token from `--token`/`LHDE_AUTH_TOKEN` first, then the config file.
pub(crate) fn resolve_token(flag: Option<&str>, cfg: &LhdeConfig) -> Result<String> {
    non_empty(flag)
        .or_else(|| non_empty(cfg.auth_token.as_deref()))
        .map(str::to_string)
        .context("no auth token: pass --token, set LHDE_AUTH_TOKEN, or add auth_token to config.toml")
}

fn non_empty(token: Option<&str>) -> Option<&str> {
    token.map(str::trim).filter(|t| !t.is_empty())
}

/// Command-line values override the `[wait]` section of the config.
pub(crate) fn wait_policy(cfg: &LhdeConfig, interval: Option<u64>, max_wait: Option<u64>) -> WaitPolicy {
    let mut policy = WaitPolicy::from(cfg.wait_or_default());
    if let Some(secs) = interval {
        policy.poll_interval = Duration::from_secs(secs);
    }
    if let Some(secs) = max_wait {
        policy.max_wait = Duration::from_secs(secs);
    }
    policy
}

#[cfg(test)]
mod tests;
