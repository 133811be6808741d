//! Per-button polling loop.
//!
//! Each visible button gets one [`Monitor`] running as its own task. The
//! loop waits on three things at once:
//!
//! ```text
//!            settings_rx ──┐
//!                          │   ┌───────────────────────────────┐
//!   interval tick (60s) ───┼──▶│ select! (cancel checked first) │
//!                          │   └──────┬──────────┬──────────┬──┘
//!         cancel token ────┘          │          │          │
//!                              new settings    tick      cancelled
//!                                     │          │          │
//!                           spawn render    render inline  return
//! ```
//!
//! A render after new settings is spawned so the loop can keep draining
//! updates; a render on a tick runs inline. Both share the monitor's cancel
//! token, so tearing a monitor down also aborts its in-flight fetches and
//! suppresses any output that would arrive late.

use std::sync::Arc;
use std::time::Duration;

use promdeck_query::QueryError;
use promdeck_types::{ButtonId, Settings};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Instrument};

use crate::display::{Display, DisplayError};
use crate::fetch::MetricFetcher;
use crate::render::Tile;

/// Default time between two scheduled refreshes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Why a render cycle produced no output.
#[derive(Debug, Error)]
pub enum CycleError {
    /// Required settings are missing; nothing was fetched.
    #[error("incomplete settings: {0} must be set")]
    Config(&'static str),

    /// The metric could not be fetched.
    #[error("query failed: {0}")]
    Fetch(#[source] QueryError),

    /// The host did not take the rendered output.
    #[error("display update failed: {0}")]
    Display(#[from] DisplayError),

    /// The monitor was torn down while the cycle was running.
    #[error("cancelled")]
    Cancelled,
}

impl From<QueryError> for CycleError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::MissingField(field) => CycleError::Config(field),
            other => CycleError::Fetch(other),
        }
    }
}

/// What a render cycle needs besides the settings.
#[derive(Clone)]
pub(crate) struct Renderer {
    pub(crate) fetcher: Arc<dyn MetricFetcher>,
    pub(crate) display: Arc<dyn Display>,
    pub(crate) context: Arc<str>,
    pub(crate) cancel: CancellationToken,
}

impl Renderer {
    /// Fetch, classify and push one tile.
    pub(crate) async fn cycle(&self, settings: &Settings) -> Result<Tile, CycleError> {
        if let Some(field) = settings.missing_field() {
            return Err(CycleError::Config(field));
        }

        let sample = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(CycleError::Cancelled),
            result = self.fetcher.fetch(settings) => result?,
        };

        let level = promdeck_types::evaluate(sample.value, settings.threshold_spec());
        let tile = Tile::render(level, sample.value);

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(CycleError::Cancelled),
            pushed = self.push(&tile) => pushed?,
        }
        Ok(tile)
    }

    async fn push(&self, tile: &Tile) -> Result<(), CycleError> {
        self.display.set_image(&self.context, &tile.image).await?;
        self.display.set_title(&self.context, &tile.title).await?;
        Ok(())
    }

    /// Run a cycle and log its outcome. Failures never escape.
    async fn refresh(&self, settings: &Settings, trigger: &'static str) {
        match self.cycle(settings).await {
            Ok(tile) => debug!(trigger, title = %tile.title, level = tile.level.symbol(), "Tile updated"),
            Err(CycleError::Cancelled) => debug!(trigger, "Render abandoned, monitor stopped"),
            Err(err @ CycleError::Config(_)) => info!(trigger, error = %err, "Skipping render"),
            Err(err) => warn!(trigger, error = %err, "Error updating display"),
        }
    }
}

/// The polling loop for one button.
pub(crate) struct Monitor {
    pub(crate) renderer: Renderer,
    pub(crate) settings_rx: mpsc::Receiver<Settings>,
    pub(crate) poll_interval: Duration,
}

impl Monitor {
    /// Spawn the loop on the current runtime, tagged with the button it
    /// serves.
    pub(crate) fn spawn(self, id: &ButtonId, generation: u64) {
        let span = tracing::info_span!("monitor", button = %id, generation);
        tokio::spawn(self.run().instrument(span));
    }

    /// Run until cancelled or until the settings channel is closed.
    pub(crate) async fn run(mut self) {
        let mut ticker = time::interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut settings = Settings::default();

        debug!("Start monitor");
        loop {
            tokio::select! {
                biased;
                _ = self.renderer.cancel.cancelled() => break,
                received = self.settings_rx.recv() => match received {
                    Some(update) => {
                        debug!("Updated settings");
                        settings = update;
                        let renderer = self.renderer.clone();
                        let snapshot = settings.clone();
                        tokio::spawn(
                            async move { renderer.refresh(&snapshot, "settings").await }
                                .in_current_span(),
                        );
                    }
                    None => break,
                },
                _ = ticker.tick() => {
                    self.renderer.refresh(&settings, "tick").await;
                }
            }
        }
        debug!("Stop monitor");
    }
}
