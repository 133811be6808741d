//! # promdeck
//!
//! A Stream Deck plugin that turns keys into live Prometheus gauges.
//!
//! Each key configured with the plugin's action runs its own monitor. The
//! monitor queries Prometheus on a fixed interval and whenever the key's
//! settings change, classifies the value against the key's thresholds and
//! pushes a colored tile with the value as its title.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐ willAppear / didReceiveSettings / willDisappear
//! │ Stream Deck  │──────────────────────────────┐
//! │ application  │◀──────────┐                  ▼
//! └──────────────┘  setImage │          ┌───────────────┐
//!                   setTitle │          │ MonitorRegistry│
//!                            │          └───────┬───────┘
//!                     ┌──────┴──────┐           │ one per button
//!                     │ HostDisplay │    ┌──────▼──────┐   ┌────────────┐
//!                     └──────▲──────┘    │   Monitor   │──▶│ Prometheus │
//!                            └───────────┤ (tokio task)│◀──│  HTTP API  │
//!                                Tile    └─────────────┘   └────────────┘
//! ```
//!
//! - **[`registry`]**: keeps at most one live [`Monitor`](monitor) per button
//!   and tears monitors down on replacement or removal
//! - **[`monitor`]**: the per-button polling loop and render cycle
//! - **[`fetch`]**: the [`MetricFetcher`] boundary and its Prometheus
//!   implementation
//! - **[`render`]**: turns a value and status level into a [`Tile`]
//! - **[`host`]**: the WebSocket session with the Stream Deck application
//!
//! Types shared with other tools (settings, thresholds, status levels) live
//! in `promdeck-types`; the Prometheus client lives in `promdeck-query`.
//!
//! ## Usage
//!
//! The Stream Deck application launches the binary:
//!
//! ```bash
//! promdeck -port 28196 -pluginUUID 6F1B... -registerEvent registerPlugin -info '{...}'
//! ```
//!
//! ### Driving monitors without a host
//!
//! ```no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use promdeck::{Bitmap, Display, DisplayError, MonitorOptions, MonitorRegistry, PrometheusFetcher};
//! use promdeck_types::{ButtonId, Coordinates, Settings};
//!
//! struct Stdout;
//!
//! #[async_trait]
//! impl Display for Stdout {
//!     async fn set_image(&self, _: &str, _: &Bitmap) -> Result<(), DisplayError> {
//!         Ok(())
//!     }
//!     async fn set_title(&self, context: &str, title: &str) -> Result<(), DisplayError> {
//!         println!("{context}: {title}");
//!         Ok(())
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let fetcher = PrometheusFetcher::new(std::time::Duration::from_secs(10)).unwrap();
//! let registry = MonitorRegistry::new(Arc::new(fetcher), Arc::new(Stdout), MonitorOptions::default());
//!
//! let settings = Settings {
//!     endpoint: "http://localhost:9090".into(),
//!     username: "grafana".into(),
//!     password: "secret".into(),
//!     query: "sum(up)".into(),
//!     threshold: Some("5,10".into()),
//! };
//! registry.on_appear(ButtonId::from(Coordinates::new(0, 0)), "stdout", settings);
//! # });
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod fetch;
pub mod host;
pub mod logging;
pub mod monitor;
pub mod registry;
pub mod render;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use config::PluginConfig;
pub use display::{Display, DisplayError};
pub use fetch::{MetricFetcher, PrometheusFetcher};
pub use monitor::{CycleError, DEFAULT_POLL_INTERVAL};
pub use registry::{Delivery, MonitorOptions, MonitorRegistry};
pub use render::{Bitmap, Tile, TILE_SIZE};
