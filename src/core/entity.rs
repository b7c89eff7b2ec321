//! Card identity.
//!
//! Every card instance in a game carries a `CardId` that is unique within
//! that game's card pool. Ids are always supplied by the caller that builds
//! the card; `Game` allocates them sequentially for the cards it seeds.
//!
//! ```
//! use life_cards::core::CardId;
//!
//! let id = CardId::new(7);
//! assert_eq!(id.raw(), 7);
//! assert_eq!(format!("{}", id), "Card(7)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id following this one, or `None` at `u32::MAX`.
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_basics() {
        let id = CardId::new(3);
        assert_eq!(id.raw(), 3);
        assert_eq!(id.checked_next(), Some(CardId::new(4)));
        assert_eq!(CardId::new(u32::MAX).checked_next(), None);
        assert_eq!(CardId::from(3), id);
    }

    #[test]
    fn test_ordering() {
        assert!(CardId::new(1) < CardId::new(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CardId(42)), "Card(42)");
    }

    #[test]
    fn test_serialization() {
        let id = CardId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: CardId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
