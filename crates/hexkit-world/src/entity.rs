//! Entities: units, terrain, effects and upgrades placed on the map.
//!
//! An [`Entity`] is created from an [`EntityClass`] by the
//! [`RuleFactory`](crate::RuleFactory) and afterwards changed only through the
//! world's mutation entry points. Modifiers are class-derived: the effective
//! modifier set is the class's declared modifiers overlaid by the entity's own
//! overrides, so changing an entity's class changes its influence.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::ids::{EntityId, FactionId};
use crate::map::{Point, INVALID_LOCATION};
use crate::scenario::{EntityCategory, EntityClass, ModifierTarget};

bitflags! {
    /// Abilities of a unit for the current turn.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct UnitFlags: u8 {
        /// The unit may attack
        const CAN_ATTACK = 1 << 0;
        /// The unit may move
        const CAN_MOVE = 1 << 1;
    }
}

/// Key of one modifier slot: the variable and who receives the modifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModifierKey {
    /// Modified variable
    pub variable: String,
    /// Receiver of the modifier
    pub target: ModifierTarget,
}

impl ModifierKey {
    /// Creates a modifier key.
    #[must_use]
    pub fn new(variable: &str, target: ModifierTarget) -> Self {
        Self {
            variable: variable.to_string(),
            target,
        }
    }
}

/// A game entity.
///
/// # Invariants
///
/// - `category` always equals the category of the entity's class
/// - `site` is either [`INVALID_LOCATION`] or a site whose stack lists this entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    class_id: String,
    category: EntityCategory,
    name: Option<String>,
    display_class: Option<String>,
    owner: Option<FactionId>,
    site: Point,
    frame_offset: i32,
    attributes: BTreeMap<String, i32>,
    resources: BTreeMap<String, i32>,
    modifier_overrides: BTreeMap<ModifierKey, i32>,
    flags: BTreeSet<String>,
    unit_flags: UnitFlags,
}

impl Entity {
    /// Creates an unplaced, unowned entity of the given class with the class's
    /// initial variable values.
    #[must_use]
    pub fn new(id: EntityId, class: &EntityClass) -> Self {
        Self {
            id,
            class_id: class.id.clone(),
            category: class.category,
            name: None,
            display_class: None,
            owner: None,
            site: INVALID_LOCATION,
            frame_offset: 0,
            attributes: class.attributes.clone(),
            resources: class.resources.clone(),
            modifier_overrides: BTreeMap::new(),
            flags: BTreeSet::new(),
            unit_flags: UnitFlags::empty(),
        }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Returns the identifier of the entity's class.
    #[must_use]
    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    /// Returns the entity's category.
    #[must_use]
    pub const fn category(&self) -> EntityCategory {
        self.category
    }

    /// Returns `true` if this entity is a unit.
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self.category, EntityCategory::Unit)
    }

    /// Returns the custom name, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the display class overriding the class's appearance, if any.
    #[must_use]
    pub fn display_class(&self) -> Option<&str> {
        self.display_class.as_deref()
    }

    /// Returns the owning faction, if any.
    #[must_use]
    pub fn owner(&self) -> Option<&FactionId> {
        self.owner.as_ref()
    }

    /// Returns the entity's location, or [`INVALID_LOCATION`] if unplaced.
    #[must_use]
    pub const fn site(&self) -> Point {
        self.site
    }

    /// Returns the animation frame offset.
    #[must_use]
    pub const fn frame_offset(&self) -> i32 {
        self.frame_offset
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, variable: &str) -> Option<i32> {
        self.attributes.get(variable).copied()
    }

    /// Returns a resource value.
    #[must_use]
    pub fn resource(&self, variable: &str) -> Option<i32> {
        self.resources.get(variable).copied()
    }

    /// Returns `true` if the string flag is set.
    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Returns the unit ability flags.
    #[must_use]
    pub const fn unit_flags(&self) -> UnitFlags {
        self.unit_flags
    }

    /// Returns the effective modifiers: class modifiers overlaid by overrides.
    #[must_use]
    pub fn effective_modifiers(&self, class: &EntityClass) -> BTreeMap<ModifierKey, i32> {
        let mut modifiers: BTreeMap<ModifierKey, i32> = class
            .modifiers
            .iter()
            .map(|m| (ModifierKey::new(&m.variable, m.target), m.value))
            .collect();
        for (key, value) in &self.modifier_overrides {
            modifiers.insert(key.clone(), *value);
        }
        modifiers
    }

    /// Returns the effective value of one modifier slot, zero if unset.
    #[must_use]
    pub fn modifier(&self, class: &EntityClass, key: &ModifierKey) -> i32 {
        if let Some(value) = self.modifier_overrides.get(key) {
            return *value;
        }
        class
            .modifiers
            .iter()
            .rev()
            .find(|m| m.variable == key.variable && m.target == key.target)
            .map_or(0, |m| m.value)
    }

    /// Switches the entity to another class of the same category.
    pub fn set_class(&mut self, class: &EntityClass) {
        debug_assert_eq!(class.category, self.category);
        self.class_id.clone_from(&class.id);
    }

    /// Sets or clears the custom name.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Sets or clears the display class.
    pub fn set_display_class(&mut self, display_class: Option<String>) {
        self.display_class = display_class;
    }

    /// Sets or clears the owner.
    pub fn set_owner(&mut self, owner: Option<FactionId>) {
        self.owner = owner;
    }

    /// Sets the animation frame offset.
    pub fn set_frame_offset(&mut self, offset: i32) {
        self.frame_offset = offset;
    }

    /// Sets an attribute value.
    pub fn set_attribute(&mut self, variable: &str, value: i32) {
        self.attributes.insert(variable.to_string(), value);
    }

    /// Sets a resource value.
    pub fn set_resource(&mut self, variable: &str, value: i32) {
        self.resources.insert(variable.to_string(), value);
    }

    /// Overrides one modifier slot.
    pub fn set_modifier(&mut self, key: ModifierKey, value: i32) {
        self.modifier_overrides.insert(key, value);
    }

    /// Sets or clears a string flag. Returns `true` if the flag changed.
    pub fn set_flag(&mut self, flag: &str, value: bool) -> bool {
        if value {
            self.flags.insert(flag.to_string())
        } else {
            self.flags.remove(flag)
        }
    }

    /// Sets or clears unit ability flags.
    pub fn set_unit_flags(&mut self, flags: UnitFlags, value: bool) {
        self.unit_flags.set(flags, value);
    }

    pub(crate) fn set_site(&mut self, site: Point) {
        self.site = site;
    }
}
