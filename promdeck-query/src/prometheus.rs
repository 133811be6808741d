//! Prometheus adapter using the HTTP query API.
//!
//! Evaluates a PromQL expression as an instant query against
//! `/api/v1/query` and reduces the result to a single [`Sample`].
//!
//! ## Series Selection
//!
//! When the expression matches several series the **last** element of the
//! returned vector wins. Prometheus does not promise any ordering for
//! instant vectors, so queries that should drive a tile are expected to
//! aggregate down to one series (`sum(...)`, `max(...)`, ...). The point
//! chosen is the last one enumerated, not the one with the newest timestamp.
//!
//! ## Example
//!
//! ```rust,no_run
//! use promdeck_query::prometheus::PrometheusClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PrometheusClient::builder()
//!         .endpoint("https://prometheus.example.com")
//!         .credentials("grafana", "secret")
//!         .build()?;
//!
//!     let sample = client.query("avg(node_load1)").await?;
//!     println!("{:.1} @ {}", sample.value, sample.timestamp_ms);
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use promdeck_types::Sample;

use crate::QueryError;

/// Default per-request timeout, also forwarded to the server as the query
/// evaluation timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Prometheus client bound to one endpoint and one set of credentials.
#[derive(Debug, Clone)]
pub struct PrometheusClient {
    client: Client,
    endpoint: String,
    username: String,
    password: String,
    timeout: Duration,
}

impl PrometheusClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> PrometheusClientBuilder {
        PrometheusClientBuilder::default()
    }

    /// Run `query` as an instant query evaluated at the current time.
    ///
    /// Fails with [`QueryError::MissingField`] without touching the network
    /// when `query` is empty. Dropping the returned future aborts the
    /// request.
    pub async fn query(&self, query: &str) -> Result<Sample, QueryError> {
        if query.is_empty() {
            return Err(QueryError::MissingField("query"));
        }

        let url = format!("{}/api/v1/query", self.endpoint.trim_end_matches('/'));
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        let params = [
            ("query", query.to_string()),
            ("time", format!("{:.3}", now)),
            ("timeout", format!("{}s", self.timeout.as_secs().max(1))),
        ];

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(QueryError::Auth(format!("API returned status {}", status)));
        }

        let body = response.text().await?;
        let parsed: ApiResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(QueryError::Http(format!("API returned status {}", status)));
            }
            Err(e) => return Err(QueryError::Parse(e.to_string())),
        };

        if !parsed.warnings.is_empty() {
            warn!(warnings = ?parsed.warnings, "Prometheus returned warnings");
        }

        if parsed.status == "error" {
            return Err(QueryError::Api {
                kind: parsed.error_type.unwrap_or_default(),
                message: parsed.error.unwrap_or_default(),
            });
        }

        if !status.is_success() {
            return Err(QueryError::Http(format!("API returned status {}", status)));
        }

        let data = parsed
            .data
            .ok_or_else(|| QueryError::Parse("response has no data".to_string()))?;

        select_sample(data)
    }
}

/// Builder for PrometheusClient.
#[derive(Debug, Default)]
pub struct PrometheusClientBuilder {
    endpoint: Option<String>,
    username: Option<String>,
    password: Option<String>,
    timeout: Option<Duration>,
    client: Option<Client>,
}

impl PrometheusClientBuilder {
    /// Set the API base URL (e.g., "http://localhost:9090").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the username and password for basic authentication.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reuse an existing HTTP client (and its connection pool).
    pub fn http_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    ///
    /// Endpoint, username and password are all required.
    pub fn build(self) -> Result<PrometheusClient, QueryError> {
        let endpoint = required(self.endpoint, "endpoint")?;
        let username = required(self.username, "username")?;
        let password = required(self.password, "password")?;

        let client = match self.client {
            Some(client) => client,
            None => Client::builder().build()?,
        };

        Ok(PrometheusClient {
            client,
            endpoint,
            username,
            password,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, QueryError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(QueryError::MissingField(field))
}

/// Reduce the `data` section of a query response to one sample.
fn select_sample(data: QueryData) -> Result<Sample, QueryError> {
    if data.result_type != "vector" {
        return Err(QueryError::UnexpectedResultType(data.result_type));
    }

    let mut vector: Vec<VectorSample> =
        serde_json::from_value(data.result).map_err(|e| QueryError::Parse(e.to_string()))?;

    let last = vector.pop().ok_or(QueryError::EmptyResult)?;
    debug!(metric = ?last.metric, "Selected series");

    let (timestamp, raw) = last.value;
    let value: f64 = raw
        .parse()
        .map_err(|_| QueryError::Parse(format!("invalid sample value {:?}", raw)))?;

    Ok(Sample::new(value, (timestamp * 1000.0) as u64))
}

/// Envelope of every Prometheus API response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    status: String,
    data: Option<QueryData>,
    error_type: Option<String>,
    error: Option<String>,
    #[serde(default)]
    warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryData {
    result_type: String,
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct VectorSample {
    #[serde(default)]
    metric: BTreeMap<String, String>,
    value: (f64, String),
}
