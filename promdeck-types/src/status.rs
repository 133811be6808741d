//! Status levels and threshold evaluation.

use std::fmt;

/// Severity of a sampled value relative to its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StatusLevel {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl StatusLevel {
    /// Tile background color for this level.
    pub fn color(&self) -> Rgb {
        match self {
            StatusLevel::Normal => Rgb::new(0x6a, 0xb7, 0x4b),
            StatusLevel::Warning => Rgb::new(0xf4, 0x81, 0x18),
            StatusLevel::Critical => Rgb::new(0xe5, 0x5a, 0x4e),
        }
    }

    /// Returns a short symbol for logs.
    pub fn symbol(&self) -> &'static str {
        match self {
            StatusLevel::Normal => "OK",
            StatusLevel::Warning => "WARN",
            StatusLevel::Critical => "CRIT",
        }
    }
}

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Parsed warn/critical bounds.
///
/// Each bound is parsed independently, so a spec such as `"80,oops"` still
/// yields a usable warn bound. The critical bound only takes effect when the
/// warn bound is present.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Thresholds {
    pub warn: Option<f64>,
    pub crit: Option<f64>,
}

impl Thresholds {
    /// Parse a `"<warn>"` or `"<warn>,<crit>"` specification.
    ///
    /// Components may carry surrounding whitespace. Anything past the second
    /// component is ignored. Unparsable components become `None`.
    pub fn parse(spec: &str) -> Self {
        let mut parts = spec.split(',').map(|part| part.trim().parse::<f64>().ok());

        Self {
            warn: parts.next().flatten(),
            crit: parts.next().flatten(),
        }
    }

    /// Classify a value against these bounds.
    pub fn evaluate(&self, value: f64) -> StatusLevel {
        let Some(warn) = self.warn else {
            return StatusLevel::Normal;
        };

        match self.crit {
            Some(crit) if value >= crit => StatusLevel::Critical,
            _ if value >= warn => StatusLevel::Warning,
            _ => StatusLevel::Normal,
        }
    }
}

/// Classify `value` against an optional threshold specification.
///
/// Total: a missing or malformed specification simply yields
/// [`StatusLevel::Normal`].
pub fn evaluate(value: f64, spec: Option<&str>) -> StatusLevel {
    spec.map_or(StatusLevel::Normal, |s| Thresholds::parse(s).evaluate(value))
}
