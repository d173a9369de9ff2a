//! Append-only lifecycle history of entities and factions.
//!
//! History is narrative data for the user interface. It is written alongside the
//! world mutations that produce it and never read back by game logic. Recording
//! never fails; entries for deleted objects are kept.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::{EntityId, FactionId};

/// Kind of an entity history entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityEventKind {
    /// Entity was created from the given class
    Create {
        /// Class identifier
        class: String,
    },
    /// Entity was deleted
    Delete,
    /// Entity changed to the given class
    SetClass {
        /// New class identifier
        class: String,
    },
    /// Entity was renamed; `None` restores the default name
    SetName {
        /// New name
        name: Option<String>,
    },
}

/// One entity history entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityEvent {
    /// Turn during which the event happened
    pub turn: u32,
    /// What happened
    pub kind: EntityEventKind,
}

/// Kind of a faction history entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactionEventKind {
    /// Faction joined the game
    Create,
    /// Faction was eliminated
    Delete,
    /// Faction finished its activation
    Advance {
        /// Turn that was finished
        turn: u32,
    },
    /// Faction won the game
    Victory,
    /// Faction acquired an entity
    AddEntity {
        /// Acquired entity
        entity: EntityId,
    },
}

/// One faction history entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionEvent {
    /// Turn during which the event happened
    pub turn: u32,
    /// What happened
    pub kind: FactionEventKind,
}

/// History of every entity and faction that ever existed in a world.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct History {
    entities: BTreeMap<EntityId, Vec<EntityEvent>>,
    factions: BTreeMap<FactionId, Vec<FactionEvent>>,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the events recorded for an entity, oldest first.
    #[must_use]
    pub fn entity(&self, id: &EntityId) -> &[EntityEvent] {
        self.entities.get(id).map_or(&[][..], Vec::as_slice)
    }

    /// Returns the events recorded for a faction, oldest first.
    #[must_use]
    pub fn faction(&self, id: &FactionId) -> &[FactionEvent] {
        self.factions.get(id).map_or(&[][..], Vec::as_slice)
    }

    /// Returns the total number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.values().map(Vec::len).sum::<usize>()
            + self.factions.values().map(Vec::len).sum::<usize>()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records the creation of an entity.
    pub fn create_entity(&mut self, turn: u32, id: &EntityId, class: &str) {
        self.push_entity(
            turn,
            id,
            EntityEventKind::Create {
                class: class.to_string(),
            },
        );
    }

    /// Records the deletion of an entity.
    pub fn delete_entity(&mut self, turn: u32, id: &EntityId) {
        self.push_entity(turn, id, EntityEventKind::Delete);
    }

    /// Records a class change.
    pub fn set_entity_class(&mut self, turn: u32, id: &EntityId, class: &str) {
        self.push_entity(
            turn,
            id,
            EntityEventKind::SetClass {
                class: class.to_string(),
            },
        );
    }

    /// Records a rename.
    pub fn set_entity_name(&mut self, turn: u32, id: &EntityId, name: Option<&str>) {
        self.push_entity(
            turn,
            id,
            EntityEventKind::SetName {
                name: name.map(str::to_string),
            },
        );
    }

    /// Records a faction joining the game.
    pub fn create_faction(&mut self, turn: u32, id: &FactionId) {
        self.push_faction(turn, id, FactionEventKind::Create);
    }

    /// Records a faction's elimination.
    pub fn delete_faction(&mut self, turn: u32, id: &FactionId) {
        self.push_faction(turn, id, FactionEventKind::Delete);
    }

    /// Records the end of a faction's activation.
    pub fn advance(&mut self, turn: u32, id: &FactionId) {
        self.push_faction(turn, id, FactionEventKind::Advance { turn });
    }

    /// Records a faction's victory.
    pub fn victory(&mut self, turn: u32, id: &FactionId) {
        self.push_faction(turn, id, FactionEventKind::Victory);
    }

    /// Records a faction acquiring an entity.
    pub fn add_entity(&mut self, turn: u32, id: &FactionId, entity: &EntityId) {
        self.push_faction(
            turn,
            id,
            FactionEventKind::AddEntity {
                entity: entity.clone(),
            },
        );
    }

    fn push_entity(&mut self, turn: u32, id: &EntityId, kind: EntityEventKind) {
        self.entities
            .entry(id.clone())
            .or_default()
            .push(EntityEvent { turn, kind });
    }

    fn push_faction(&mut self, turn: u32, id: &FactionId, kind: FactionEventKind) {
        self.factions
            .entry(id.clone())
            .or_default()
            .push(FactionEvent { turn, kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_entity_lifecycle_in_order() {
        let mut history = History::new();
        let id = EntityId::new("unit-1");
        history.create_entity(1, &id, "unit");
        history.set_entity_name(2, &id, Some("Bold"));
        history.delete_entity(3, &id);

        let events = history.entity(&id);
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0].kind,
            EntityEventKind::Create {
                class: "unit".to_string()
            }
        );
        assert_eq!(events[2].turn, 3);
        assert_eq!(events[2].kind, EntityEventKind::Delete);
    }

    #[test]
    fn unknown_ids_have_empty_history() {
        let history = History::new();
        assert!(history.entity(&EntityId::new("x")).is_empty());
        assert!(history.faction(&FactionId::new("x")).is_empty());
        assert!(history.is_empty());
    }

    #[test]
    fn faction_events_accumulate() {
        let mut history = History::new();
        let red = FactionId::new("red");
        history.create_faction(1, &red);
        history.advance(1, &red);
        history.victory(2, &red);
        assert_eq!(history.faction(&red).len(), 3);
        assert_eq!(history.len(), 3);
        assert_eq!(
            history.faction(&red)[1].kind,
            FactionEventKind::Advance { turn: 1 }
        );
    }
}
