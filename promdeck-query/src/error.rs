//! Error types for queries.

use thiserror::Error;

/// Errors that can occur when fetching a sample.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A required setting is empty. Raised before any network I/O.
    #[error("{0} must be set")]
    MissingField(&'static str),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The backend rejected the query.
    #[error("Query failed ({kind}): {message}")]
    Api { kind: String, message: String },

    /// The query evaluated to something other than an instant vector.
    #[error("Expected vector result, got {0}")]
    UnexpectedResultType(String),

    /// The query matched no series.
    #[error("Query returned no samples")]
    EmptyResult,
}

impl QueryError {
    /// Whether this error stems from incomplete configuration rather than
    /// from talking to the backend.
    pub fn is_config(&self) -> bool {
        matches!(self, QueryError::MissingField(_))
    }
}

#[cfg(feature = "prometheus")]
impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QueryError::Timeout
        } else if err.is_connect() {
            QueryError::Connection(err.to_string())
        } else {
            QueryError::Http(err.to_string())
        }
    }
}
