//! # promdeck-types
//!
//! Core types shared by the promdeck crates: how a button is identified,
//! what a tile is configured with, and how a sampled value maps to a
//! status color.
//!
//! ## Features
//!
//! - `serde`: (de)serialization of [`Settings`] and [`Coordinates`] in the
//!   field layout used by the Stream Deck property inspector
//!
//! ## Example
//!
//! ```rust
//! use promdeck_types::{StatusLevel, Thresholds};
//!
//! let thresholds = Thresholds::parse("80, 95");
//! assert_eq!(thresholds.evaluate(42.0), StatusLevel::Normal);
//! assert_eq!(thresholds.evaluate(85.0), StatusLevel::Warning);
//! assert_eq!(thresholds.evaluate(99.5), StatusLevel::Critical);
//! ```

mod button;
mod sample;
mod settings;
mod status;

pub use button::*;
pub use sample::*;
pub use settings::*;
pub use status::*;
