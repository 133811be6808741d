//! Log file setup.
//!
//! The host owns the plugin's stdout and stderr, so everything goes to an
//! append-only file instead.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::config::PluginConfig;

/// Install the global subscriber. Call once, from the binary.
pub fn init(config: &PluginConfig) -> Result<()> {
    let file = open_log_file(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(config.log_level)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))
}

/// Open `path` for appending, creating it and its directory if needed.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}
