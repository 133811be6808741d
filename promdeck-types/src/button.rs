//! Button identity.

use std::fmt;

/// Position of a key on the device grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinates {
    pub column: u32,
    pub row: u32,
}

impl Coordinates {
    pub fn new(row: u32, column: u32) -> Self {
        Self { column, row }
    }
}

/// Opaque key identifying one button slot.
///
/// Slot identities are stable for as long as the button is visible and are
/// reused when the same slot is assigned again, so a new appearance under an
/// existing id replaces whatever was running there before.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ButtonId(String);

impl ButtonId {
    /// Wrap an arbitrary key (e.g. a host context for buttons without a
    /// grid position, such as multi-action entries).
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Coordinates> for ButtonId {
    fn from(c: Coordinates) -> Self {
        Self(format!("{}:{}", c.row, c.column))
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_from_coordinates_is_row_then_column() {
        let id = ButtonId::from(Coordinates::new(2, 4));
        assert_eq!(id.as_str(), "2:4");
        assert_eq!(id.to_string(), "2:4");
    }

    #[test]
    fn same_slot_gives_same_id() {
        let a = ButtonId::from(Coordinates::new(0, 1));
        let b = ButtonId::from(Coordinates { column: 1, row: 0 });
        assert_eq!(a, b);
        assert_ne!(a, ButtonId::from(Coordinates::new(1, 0)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn coordinates_deserialize() {
        let c: Coordinates = serde_json::from_str(r#"{"column":3,"row":1}"#).unwrap();
        assert_eq!(c, Coordinates::new(1, 3));
    }
}
