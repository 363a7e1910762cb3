//! Tracing setup for the CLI.
//!
//! Logs go to `$XDG_STATE_HOME/pgnfetch/pgnfetch.log` so per-item console
//! lines stay readable; stderr is the fallback when the state dir is unusable.
//! The filter comes from `PGNFETCH_LOG`, then `RUST_LOG`, then a built-in default.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,pgnfetch=debug,pgnfetch_core=debug";
const FILTER_ENV: &str = "PGNFETCH_LOG";
const LOG_FILE: &str = "pgnfetch.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Location of the log file; creates the state directory if needed.
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("pgnfetch")?;
    let state = dirs.get_state_home();
    fs::create_dir_all(&state).with_context(|| format!("create {}", state.display()))?;
    Ok(state.join(LOG_FILE))
}

fn open_log(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))
}

/// Installs the global subscriber writing to the log file.
///
/// Returns the file path. Errors leave no subscriber installed, so the caller
/// can fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = open_log(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install tracing subscriber: {}", e))?;

    tracing::info!(log = %path.display(), "pgnfetch starting");
    Ok(path)
}

/// Installs a stderr subscriber; a no-op if one is already installed.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .try_init();
}
