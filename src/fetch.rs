//! Metric fetching boundary.

use std::time::Duration;

use async_trait::async_trait;
use promdeck_query::prometheus::PrometheusClient;
use promdeck_query::QueryError;
use promdeck_types::{Sample, Settings};

/// Source of the latest sample for a tile's settings.
///
/// Implementations must not retain `settings`; every call gets the value the
/// calling monitor currently holds.
#[async_trait]
pub trait MetricFetcher: Send + Sync {
    async fn fetch(&self, settings: &Settings) -> Result<Sample, QueryError>;
}

/// Fetches from the Prometheus HTTP API, sharing one connection pool
/// across all tiles.
#[derive(Debug, Clone)]
pub struct PrometheusFetcher {
    http: reqwest::Client,
    timeout: Duration,
}

impl PrometheusFetcher {
    pub fn new(timeout: Duration) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, timeout })
    }
}

#[async_trait]
impl MetricFetcher for PrometheusFetcher {
    async fn fetch(&self, settings: &Settings) -> Result<Sample, QueryError> {
        let client = PrometheusClient::builder()
            .endpoint(settings.endpoint.as_str())
            .credentials(settings.username.as_str(), settings.password.as_str())
            .timeout(self.timeout)
            .http_client(self.http.clone())
            .build()?;

        client.query(&settings.query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn incomplete_settings_fail_before_network() {
        let fetcher = PrometheusFetcher::new(Duration::from_secs(1)).unwrap();
        let settings = Settings {
            // Nothing listens here; reaching the network would yield a
            // connection error instead.
            endpoint: "http://127.0.0.1:9".to_string(),
            username: "grafana".to_string(),
            password: String::new(),
            query: "up".to_string(),
            threshold: None,
        };

        let err = fetcher.fetch(&settings).await.unwrap_err();
        assert!(matches!(err, QueryError::MissingField("password")));
    }
}
