//! Factions: the players of a game.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::FactionId;
use crate::scenario::FactionClass;

/// A faction participating in the game.
///
/// Counters and resources start at the faction class's initial values. Resource
/// modifiers set directly on the faction are stored here; modifier influence from
/// entities lives in the [`ModifierMap`](crate::ModifierMap).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Faction {
    id: FactionId,
    class_id: String,
    name: String,
    counters: BTreeMap<String, i32>,
    resources: BTreeMap<String, i32>,
    resource_modifiers: BTreeMap<String, i32>,
}

impl Faction {
    /// Creates a faction from its class. The faction takes the class identifier.
    #[must_use]
    pub fn new(class: &FactionClass) -> Self {
        Self {
            id: FactionId::new(&class.id),
            class_id: class.id.clone(),
            name: class.name.clone(),
            counters: class.counters.clone(),
            resources: class.resources.clone(),
            resource_modifiers: BTreeMap::new(),
        }
    }

    /// Returns the faction's identifier.
    #[must_use]
    pub fn id(&self) -> &FactionId {
        &self.id
    }

    /// Returns the identifier of the faction's class.
    #[must_use]
    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a counter value.
    #[must_use]
    pub fn counter(&self, variable: &str) -> Option<i32> {
        self.counters.get(variable).copied()
    }

    /// Returns a resource value.
    #[must_use]
    pub fn resource(&self, variable: &str) -> Option<i32> {
        self.resources.get(variable).copied()
    }

    /// Returns the faction's own resource modifier, zero if unset.
    #[must_use]
    pub fn resource_modifier(&self, variable: &str) -> i32 {
        self.resource_modifiers.get(variable).copied().unwrap_or(0)
    }

    /// Sets a counter value.
    pub fn set_counter(&mut self, variable: &str, value: i32) {
        self.counters.insert(variable.to_string(), value);
    }

    /// Sets a resource value.
    pub fn set_resource(&mut self, variable: &str, value: i32) {
        self.resources.insert(variable.to_string(), value);
    }

    /// Sets the faction's own resource modifier.
    pub fn set_resource_modifier(&mut self, variable: &str, value: i32) {
        if value == 0 {
            self.resource_modifiers.remove(variable);
        } else {
            self.resource_modifiers.insert(variable.to_string(), value);
        }
    }
}
