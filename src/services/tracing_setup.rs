//! Global tracing subscriber
//!
//! The terminal is in raw mode while the editor runs, so diagnostics go to a log
//! file instead of stderr.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result as AnyhowResult};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "quill=info";

/// Log file used when `--log-file` is not given
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("quill.log")
}

/// Install the global subscriber, appending to `log_file`
pub fn init_global(log_file: &Path) -> AnyhowResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))?;

    Ok(())
}
