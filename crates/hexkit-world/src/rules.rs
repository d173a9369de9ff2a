//! Rule factory: the pluggable constructor of entities and factions.
//!
//! Scenario rule scripts decide how a freshly created object looks beyond its
//! class defaults. The world calls the factory whenever an entity or faction is
//! created, including during replay, so implementations must be deterministic.

use crate::entity::{Entity, UnitFlags};
use crate::faction::Faction;
use crate::ids::EntityId;
use crate::scenario::{EntityClass, FactionClass};

/// Creates entities and factions on behalf of the world.
///
/// # Determinism
///
/// Given the same class and identifier, an implementation must always return
/// the same object. Replays depend on it.
pub trait RuleFactory: Send + Sync {
    /// Creates a new, unplaced entity of `class` with identifier `id`.
    fn create_entity(&self, class: &EntityClass, id: EntityId) -> Entity;

    /// Creates a new faction of `class`.
    fn create_faction(&self, class: &FactionClass) -> Faction {
        Faction::new(class)
    }
}

/// Default rules: class defaults, and units may move and attack.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRules;

impl RuleFactory for DefaultRules {
    fn create_entity(&self, class: &EntityClass, id: EntityId) -> Entity {
        let mut entity = Entity::new(id, class);
        if entity.is_unit() {
            entity.set_unit_flags(UnitFlags::CAN_ATTACK | UnitFlags::CAN_MOVE, true);
        }
        entity
    }
}
