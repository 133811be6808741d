use std::sync::Arc;

use anyhow::{Context, Result};
use promdeck::cli::Args;
use promdeck::{host, logging, PluginConfig, PrometheusFetcher};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_host(std::env::args()).unwrap_or_else(|e| e.exit());

    let config = PluginConfig::load(args.config.as_deref())?;
    logging::init(&config)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        action = %config.action,
        poll_interval = ?config.poll_interval,
        "Starting promdeck"
    );

    let fetcher = PrometheusFetcher::new(config.query_timeout)
        .context("Failed to build HTTP client")?;

    let result = host::run(&args.registration(), &config, Arc::new(fetcher)).await;
    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "Plugin stopped");
    }
    result
}
