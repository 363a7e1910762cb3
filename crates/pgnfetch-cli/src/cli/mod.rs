//! CLI for pgnfetch.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use pgnfetch_core::config::{self, FetchConfig, RetryConfig};
use std::path::PathBuf;

use commands::{run_completions, run_fetch, run_scrape};

/// Top-level CLI for pgnfetch.
#[derive(Debug, Parser)]
#[command(name = "pgnfetch")]
#[command(about = "pgnfetch: scrape the TWIC catalog and download its PGN archives", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch the issue index and save one JSON record per issue.
    Scrape {
        /// Index page URL (default from config).
        #[arg(long)]
        url: Option<String>,
        /// Directory to write records to (default from config).
        #[arg(long, value_name = "DIR")]
        records_dir: Option<PathBuf>,
    },

    /// Download every archive referenced by the saved records.
    Fetch(FetchArgs),

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Overrides for the fetch run; unset flags keep the config file value.
#[derive(Debug, Default, Args)]
pub struct FetchArgs {
    /// Directory of saved records.
    #[arg(long, value_name = "DIR")]
    pub records_dir: Option<PathBuf>,
    /// Directory archives are written to.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub dest: Option<PathBuf>,
    /// Number of concurrent downloads.
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,
    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
    /// Pause after every N completed downloads (0 disables).
    #[arg(long, value_name = "N")]
    pub pause_every: Option<usize>,
    /// Length of each pause in seconds.
    #[arg(long, value_name = "SECS")]
    pub pause_secs: Option<f64>,
    /// Attempts per archive (1 = no retries).
    #[arg(long, value_name = "N")]
    pub attempts: Option<u32>,
}

impl FetchArgs {
    pub fn apply(&self, cfg: &mut FetchConfig) {
        if let Some(dir) = &self.records_dir {
            cfg.records_dir = dir.clone();
        }
        if let Some(dir) = &self.dest {
            cfg.destination_dir = dir.clone();
        }
        if let Some(jobs) = self.jobs {
            cfg.concurrency = jobs.max(1);
        }
        if let Some(secs) = self.timeout {
            cfg.timeout_secs = secs;
        }
        if let Some(n) = self.pause_every {
            cfg.pause_every = n;
        }
        if let Some(secs) = self.pause_secs {
            cfg.pause_secs = secs;
        }
        if let Some(attempts) = self.attempts {
            let retry = cfg.retry.get_or_insert_with(RetryConfig::default);
            retry.max_attempts = attempts.max(1);
        }
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        if let CliCommand::Completions { shell } = cli.command {
            return run_completions(shell);
        }

        let mut cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Scrape { url, records_dir } => {
                if let Some(url) = url {
                    cfg.index_url = url;
                }
                if let Some(dir) = records_dir {
                    cfg.records_dir = dir;
                }
                run_scrape(&cfg).await?
            }
            CliCommand::Fetch(args) => {
                args.apply(&mut cfg);
                run_fetch(&cfg).await?
            }
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
