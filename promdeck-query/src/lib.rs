//! # promdeck-query
//!
//! Fetches the latest sample of a PromQL expression for a promdeck tile.
//!
//! ## Supported Backends
//!
//! - **Prometheus** (`prometheus` feature, on by default) - instant queries
//!   via the `/api/v1/query` HTTP endpoint with basic authentication
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use promdeck_query::prometheus::PrometheusClient;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PrometheusClient::builder()
//!         .endpoint("http://localhost:9090")
//!         .credentials("grafana", "secret")
//!         .timeout(Duration::from_secs(10))
//!         .build()?;
//!
//!     let sample = client.query("sum(up)").await?;
//!     println!("value = {}", sample.value);
//!     Ok(())
//! }
//! ```

pub mod error;

#[cfg(feature = "prometheus")]
pub mod prometheus;

pub use error::QueryError;

// Re-export types for convenience
pub use promdeck_types::{Sample, Settings};
