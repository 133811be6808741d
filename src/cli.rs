//! Command line handling.
//!
//! The host launches plugins with single-dash long flags
//! (`-port 28196 -pluginUUID ... -registerEvent registerPlugin -info {...}`),
//! which are rewritten to the double-dash form before parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::host::RegistrationParams;

const HOST_FLAGS: &[&str] = &["port", "pluginUUID", "registerEvent", "info", "config"];

#[derive(Parser, Debug)]
#[command(name = "promdeck")]
#[command(about = "Stream Deck plugin showing the value of a Prometheus query on a key")]
pub struct Args {
    /// WebSocket port of the Stream Deck application
    #[arg(long)]
    pub port: u16,

    /// Identifier to register with
    #[arg(long = "pluginUUID")]
    pub plugin_uuid: String,

    /// Event name to register with
    #[arg(long = "registerEvent")]
    pub register_event: String,

    /// JSON describing the host application and devices
    #[arg(long)]
    pub info: Option<String>,

    /// Optional configuration file (TOML or JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parse host-style arguments, normalising single-dash flags first.
    pub fn parse_host<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    pub fn registration(&self) -> RegistrationParams {
        RegistrationParams {
            port: self.port,
            plugin_uuid: self.plugin_uuid.clone(),
            register_event: self.register_event.clone(),
            info: self.info.clone(),
        }
    }
}

/// Rewrite `-flag` to `--flag` for the flags the host passes. Values and
/// anything else are left untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.strip_prefix('-') {
            Some(name) if HOST_FLAGS.contains(&name) => format!("-{arg}"),
            _ => arg,
        })
        .collect()
}
