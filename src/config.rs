//! Plugin configuration.
//!
//! Values come from built-in defaults, then an optional file, then
//! `PROMDECK_*` environment variables, later sources winning:
//!
//! ```toml
//! action = "dev.promdeck.stat"
//! poll_interval_secs = 60
//! query_timeout_secs = 10
//! settings_queue_capacity = 10
//! log_file = "/tmp/promdeck.log"
//! log_level = "debug"
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::Level;

use crate::registry::MonitorOptions;

pub const DEFAULT_ACTION: &str = "dev.promdeck.stat";
pub const DEFAULT_LOG_FILE: &str = "promdeck.log";
const ENV_PREFIX: &str = "PROMDECK";

#[derive(Debug, Clone, PartialEq)]
pub struct PluginConfig {
    /// Action UUID whose events are handled.
    pub action: String,
    pub poll_interval: Duration,
    pub query_timeout: Duration,
    pub settings_queue_capacity: usize,
    pub log_file: PathBuf,
    pub log_level: Level,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            action: DEFAULT_ACTION.to_string(),
            poll_interval: Duration::from_secs(60),
            query_timeout: Duration::from_secs(10),
            settings_queue_capacity: 10,
            log_file: default_log_file(),
            log_level: Level::INFO,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    action: String,
    poll_interval_secs: u64,
    query_timeout_secs: u64,
    settings_queue_capacity: usize,
    log_file: Option<PathBuf>,
    log_level: String,
}

impl PluginConfig {
    /// Load from defaults, `path` (if given) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(path: Option<&Path>, env: Environment) -> Result<Self> {
        let defaults = PluginConfig::default();
        let mut builder = Config::builder()
            .set_default("action", defaults.action)?
            .set_default("poll_interval_secs", defaults.poll_interval.as_secs())?
            .set_default("query_timeout_secs", defaults.query_timeout.as_secs())?
            .set_default("settings_queue_capacity", defaults.settings_queue_capacity as u64)?
            .set_default("log_level", defaults.log_level.as_str())?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let raw: RawConfig = builder
            .add_source(env.try_parsing(true))
            .build()
            .and_then(Config::try_deserialize)
            .context("Failed to load configuration")?;

        Self::try_from(raw)
    }

    pub fn monitor_options(&self) -> MonitorOptions {
        MonitorOptions {
            poll_interval: self.poll_interval,
            queue_capacity: self.settings_queue_capacity,
        }
    }
}

impl TryFrom<RawConfig> for PluginConfig {
    type Error = anyhow::Error;

    fn try_from(raw: RawConfig) -> Result<Self> {
        if raw.action.trim().is_empty() {
            bail!("action must not be empty");
        }
        if raw.poll_interval_secs == 0 {
            bail!("poll_interval_secs must be greater than zero");
        }
        if raw.query_timeout_secs == 0 {
            bail!("query_timeout_secs must be greater than zero");
        }
        if raw.settings_queue_capacity == 0 {
            bail!("settings_queue_capacity must be greater than zero");
        }
        let log_level = Level::from_str(&raw.log_level)
            .map_err(|_| anyhow::anyhow!("unknown log_level {:?}", raw.log_level))?;

        Ok(Self {
            action: raw.action,
            poll_interval: Duration::from_secs(raw.poll_interval_secs),
            query_timeout: Duration::from_secs(raw.query_timeout_secs),
            settings_queue_capacity: raw.settings_queue_capacity,
            log_file: raw.log_file.unwrap_or_else(default_log_file),
            log_level,
        })
    }
}

/// `promdeck.log` beside the executable, or in the working directory if the
/// executable's location is unknown.
fn default_log_file() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_LOG_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}
