//! Stable string identifiers for world objects.
//!
//! Instructions reference entities and factions by identifier rather than by live
//! reference, because a recorded program must replay against a freshly
//! reconstructed world. Class and variable identifiers are plain strings keyed
//! into the [`Scenario`](crate::Scenario).

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier of an [`Entity`](crate::Entity).
///
/// # Example
///
/// ```
/// use hexkit_world::EntityId;
///
/// let id = EntityId::new("unit-scout-1");
/// assert_eq!(id.as_str(), "unit-scout-1");
/// assert_eq!(id.to_string(), "unit-scout-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Creates a new `EntityId` from a string.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Unique identifier of a [`Faction`](crate::Faction).
///
/// A faction's identifier equals the identifier of the faction class it was
/// created from, so each class yields at most one faction per world.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FactionId(String);

impl FactionId {
    /// Creates a new `FactionId` from a string.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FactionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FactionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for FactionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn entity_id_ordering_is_lexical() {
        let a = EntityId::new("a-1");
        let b = EntityId::new("b-1");
        assert!(a < b);
    }

    #[test]
    fn borrowed_lookup_by_str() {
        let mut map = BTreeMap::new();
        map.insert(FactionId::new("red"), 1);
        assert_eq!(map.get("red"), Some(&1));
        assert_eq!(map.get("blue"), None);
    }

    #[test]
    fn serialization_roundtrip() {
        let id = EntityId::new("unit-scout-3");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"unit-scout-3\"");
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
