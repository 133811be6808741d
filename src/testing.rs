//! Fakes for exercising monitors without a host or a Prometheus server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use promdeck_query::QueryError;
use promdeck_types::{Sample, Settings};

use crate::display::{Display, DisplayError};
use crate::fetch::MetricFetcher;
use crate::render::Bitmap;

/// Settings that pass validation, querying `query`.
pub(crate) fn settings(query: &str) -> Settings {
    Settings {
        endpoint: "http://prometheus:9090".to_string(),
        username: "grafana".to_string(),
        password: "secret".to_string(),
        query: query.to_string(),
        threshold: None,
    }
}

/// Returns a fixed value after an optional delay and records every query.
#[derive(Debug, Default)]
pub(crate) struct FakeFetcher {
    value: Mutex<f64>,
    delay: Option<Duration>,
    failure: Option<fn() -> QueryError>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub(crate) fn returning(value: f64) -> Self {
        Self {
            value: Mutex::new(value),
            ..Self::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self::failing_with(|| QueryError::Connection("connection refused".to_string()))
    }

    pub(crate) fn failing_with(failure: fn() -> QueryError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub(crate) fn slow(value: f64, delay: Duration) -> Self {
        Self {
            value: Mutex::new(value),
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub(crate) fn set_value(&self, value: f64) {
        *self.value.lock() = value;
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl MetricFetcher for FakeFetcher {
    async fn fetch(&self, settings: &Settings) -> Result<Sample, QueryError> {
        if let Some(field) = settings.missing_field() {
            return Err(QueryError::MissingField(field));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(settings.query.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(failure) = self.failure {
            return Err(failure());
        }
        Ok(Sample::new(*self.value.lock(), 0))
    }
}

/// One call made against [`RecordingDisplay`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Pushed {
    Image { context: String, color: String },
    Title { context: String, title: String },
}

impl Pushed {
    pub(crate) fn context(&self) -> &str {
        match self {
            Pushed::Image { context, .. } | Pushed::Title { context, .. } => context,
        }
    }
}

/// Records everything pushed to it, optionally rejecting images.
#[derive(Debug, Default)]
pub(crate) struct RecordingDisplay {
    pushed: Mutex<Vec<Pushed>>,
    reject_images: bool,
}

impl RecordingDisplay {
    pub(crate) fn rejecting_images() -> Self {
        Self {
            reject_images: true,
            ..Self::default()
        }
    }

    pub(crate) fn pushed(&self) -> Vec<Pushed> {
        self.pushed.lock().clone()
    }

    pub(crate) fn titles_for(&self, context: &str) -> Vec<String> {
        self.pushed
            .lock()
            .iter()
            .filter_map(|p| match p {
                Pushed::Title { context: c, title } if c == context => Some(title.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn colors_for(&self, context: &str) -> Vec<String> {
        self.pushed
            .lock()
            .iter()
            .filter_map(|p| match p {
                Pushed::Image { context: c, color } if c == context => Some(color.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Display for RecordingDisplay {
    async fn set_image(&self, context: &str, image: &Bitmap) -> Result<(), DisplayError> {
        if self.reject_images {
            return Err(DisplayError::Rejected("image too large".to_string()));
        }
        let color = image
            .pixel(0, 0)
            .map(|c| c.to_string())
            .unwrap_or_default();
        self.pushed.lock().push(Pushed::Image {
            context: context.to_string(),
            color,
        });
        Ok(())
    }

    async fn set_title(&self, context: &str, title: &str) -> Result<(), DisplayError> {
        self.pushed.lock().push(Pushed::Title {
            context: context.to_string(),
            title: title.to_string(),
        });
        Ok(())
    }
}
