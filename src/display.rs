//! Output boundary towards the device host.

use async_trait::async_trait;
use thiserror::Error;

use crate::render::Bitmap;

/// Errors pushing output to a key.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The connection to the host is gone.
    #[error("host connection closed")]
    Closed,

    /// The host refused or failed to take the output.
    #[error("host rejected output: {0}")]
    Rejected(String),
}

/// Where rendered tiles go.
///
/// `context` is the host's address for one key instance, captured when the
/// key appeared.
#[async_trait]
pub trait Display: Send + Sync {
    async fn set_image(&self, context: &str, image: &Bitmap) -> Result<(), DisplayError>;

    async fn set_title(&self, context: &str, title: &str) -> Result<(), DisplayError>;
}
