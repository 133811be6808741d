//! Fetched metric readings.

/// A single fetched reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// The sampled value.
    pub value: f64,
    /// Unix timestamp in milliseconds reported by the backend for this point.
    pub timestamp_ms: u64,
}

impl Sample {
    pub fn new(value: f64, timestamp_ms: u64) -> Self {
        Self {
            value,
            timestamp_ms,
        }
    }
}
