//! The authoritative game-world state.
//!
//! [`WorldState`] is the single unit of mutable shared state in a game. Commands
//! and replays mutate it through the entry points below; nothing else holds live
//! references to its entities across mutations.
//!
//! # Determinism
//!
//! Entities are stored in a `BTreeMap` keyed by identifier, factions in turn
//! order, sites in a row-major grid. New entity identifiers come from a counter
//! stored in the world. Replaying the same mutations against equal initial
//! states therefore yields equal states.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use hexkit_world::{
//!     DefaultRules, EntityCategory, EntityClass, FactionClass, Point, Scenario, WorldState,
//! };
//!
//! let scenario = Scenario::new(4, 4)
//!     .with_entity_class(EntityClass::new("unit-scout", EntityCategory::Unit))
//!     .with_faction_class(FactionClass::new("red"));
//! let scenario = Arc::new(scenario);
//! let mut world = WorldState::new(Arc::clone(&scenario), Arc::new(DefaultRules));
//!
//! world.create_faction(scenario.faction_class("red").unwrap());
//! let id = world.next_entity_id("unit-scout");
//! world.create_entity(scenario.entity_class("unit-scout").unwrap(), id.clone());
//! world.place_entity(id.as_str(), Point::new(1, 2));
//!
//! assert_eq!(world.site(Point::new(1, 2)).unwrap().top(), Some(&id));
//! assert_eq!(world.active_faction().unwrap().id().as_str(), "red");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::entity::Entity;
use crate::faction::Faction;
use crate::history::History;
use crate::ids::{EntityId, FactionId};
use crate::map::{is_valid_location, Point, Site, INVALID_LOCATION};
use crate::modifier_map::ModifierMap;
use crate::rules::RuleFactory;
use crate::scenario::{EntityCategory, EntityClass, FactionClass, Scenario};

/// The mutable game world.
#[derive(Clone)]
pub struct WorldState {
    /// Static data shared by every world of the scenario.
    scenario: Arc<Scenario>,
    /// Constructor of new entities and factions.
    rules: Arc<dyn RuleFactory>,
    /// Map sites in row-major order.
    sites: Vec<Site>,
    /// Entities keyed by identifier.
    entities: BTreeMap<EntityId, Entity>,
    /// Factions in turn order.
    factions: Vec<Faction>,
    /// Index of the faction whose activation is running.
    active_faction: usize,
    /// Current turn, starting at 1.
    turn: u32,
    /// Faction that won the game, if decided.
    winning_faction: Option<FactionId>,
    /// Counter for generated entity identifiers.
    next_entity_number: u64,
    /// Lifecycle history.
    history: History,
    /// Cached modifier influence.
    modifier_map: ModifierMap,
}

impl fmt::Debug for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldState")
            .field("size", &(self.width(), self.height()))
            .field("entities", &self.entities.len())
            .field("factions", &self.factions.len())
            .field("active_faction", &self.active_faction)
            .field("turn", &self.turn)
            .field("winning_faction", &self.winning_faction)
            .finish_non_exhaustive()
    }
}

impl PartialEq for WorldState {
    fn eq(&self, other: &Self) -> bool {
        *self.scenario == *other.scenario
            && self.sites == other.sites
            && self.entities == other.entities
            && self.factions == other.factions
            && self.active_faction == other.active_faction
            && self.turn == other.turn
            && self.winning_faction == other.winning_faction
            && self.next_entity_number == other.next_entity_number
            && self.history == other.history
            && self.modifier_map == other.modifier_map
    }
}

impl WorldState {
    /// Creates an empty world on the scenario's map.
    #[must_use]
    pub fn new(scenario: Arc<Scenario>, rules: Arc<dyn RuleFactory>) -> Self {
        let mut sites = Vec::new();
        for y in 0..scenario.height() {
            for x in 0..scenario.width() {
                sites.push(Site::new(Point::new(x, y)));
            }
        }
        Self {
            scenario,
            rules,
            sites,
            entities: BTreeMap::new(),
            factions: Vec::new(),
            active_faction: 0,
            turn: 1,
            winning_faction: None,
            next_entity_number: 0,
            history: History::new(),
            modifier_map: ModifierMap::new(),
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Returns the shared scenario.
    #[must_use]
    pub fn scenario(&self) -> &Arc<Scenario> {
        &self.scenario
    }

    /// Returns the map width in columns.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.scenario.width()
    }

    /// Returns the map height in rows.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.scenario.height()
    }

    /// Returns `true` if `location` lies on the map.
    #[must_use]
    pub fn contains_site(&self, location: Point) -> bool {
        self.site_index(location).is_some()
    }

    /// Returns the site at `location`.
    #[must_use]
    pub fn site(&self, location: Point) -> Option<&Site> {
        self.site_index(location).map(|i| &self.sites[i])
    }

    /// Iterates over all sites in row-major order.
    pub fn sites(&self) -> impl Iterator<Item = &Site> + '_ {
        self.sites.iter()
    }

    /// Returns an entity by identifier.
    #[must_use]
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Returns a mutable entity by identifier.
    ///
    /// Changing owner, class or modifiers through this reference must be
    /// bracketed by [`remove_influence`](Self::remove_influence) and
    /// [`add_influence`](Self::add_influence). Use
    /// [`place_entity`](Self::place_entity) to change the site.
    #[must_use]
    pub fn entity_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Iterates over entities in identifier order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns a faction by identifier.
    #[must_use]
    pub fn faction(&self, id: &str) -> Option<&Faction> {
        self.factions.iter().find(|f| f.id().as_str() == id)
    }

    /// Returns a mutable faction by identifier.
    #[must_use]
    pub fn faction_mut(&mut self, id: &str) -> Option<&mut Faction> {
        self.factions.iter_mut().find(|f| f.id().as_str() == id)
    }

    /// Iterates over factions in turn order.
    pub fn factions(&self) -> impl Iterator<Item = &Faction> + '_ {
        self.factions.iter()
    }

    /// Returns the faction whose activation is running.
    #[must_use]
    pub fn active_faction(&self) -> Option<&Faction> {
        self.factions.get(self.active_faction)
    }

    /// Returns the turn-order index of the active faction.
    #[must_use]
    pub const fn active_faction_index(&self) -> usize {
        self.active_faction
    }

    /// Returns the current turn.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Returns the counter behind generated entity identifiers.
    #[must_use]
    pub const fn next_entity_number(&self) -> u64 {
        self.next_entity_number
    }

    /// Returns the winning faction, if decided.
    #[must_use]
    pub fn winning_faction(&self) -> Option<&FactionId> {
        self.winning_faction.as_ref()
    }

    /// Returns the lifecycle history.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Returns the mutable lifecycle history.
    #[must_use]
    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Returns the modifier map.
    #[must_use]
    pub const fn modifier_map(&self) -> &ModifierMap {
        &self.modifier_map
    }

    /// Returns the mutable modifier map, e.g. to enable its journal.
    #[must_use]
    pub fn modifier_map_mut(&mut self) -> &mut ModifierMap {
        &mut self.modifier_map
    }

    /// Returns the modifier map influence on a unit for `variable`.
    ///
    /// Zero for unknown entities, non-units and unplaced units.
    #[must_use]
    pub fn unit_modifier(&self, id: &str, variable: &str) -> i32 {
        match self.entities.get(id) {
            Some(entity) if entity.is_unit() && self.contains_site(entity.site()) => self
                .modifier_map
                .site_modifier(entity.site(), variable, entity.owner()),
            _ => 0,
        }
    }

    /// Returns a faction's total resource modifier: its own plus entity influence.
    #[must_use]
    pub fn faction_modifier_total(&self, id: &str, variable: &str) -> i32 {
        let own = self.faction(id).map_or(0, |f| f.resource_modifier(variable));
        own.saturating_add(
            self.modifier_map
                .faction_modifier(&FactionId::new(id), variable),
        )
    }

    /// Returns the entities of `category` on a site, bottom first.
    #[must_use]
    pub fn entities_on(&self, location: Point, category: EntityCategory) -> Vec<EntityId> {
        self.site(location)
            .map(|site| {
                site.stack()
                    .iter()
                    .filter(|id| {
                        self.entities
                            .get(*id)
                            .is_some_and(|e| e.category() == category)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Generates a fresh entity identifier `"{class}-{n}"`.
    pub fn next_entity_id(&mut self, class_id: &str) -> EntityId {
        loop {
            self.next_entity_number += 1;
            let candidate = EntityId::from(format!("{class_id}-{}", self.next_entity_number));
            if !self.entities.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Creates an unplaced entity through the rule factory.
    ///
    /// An existing entity with the same identifier is replaced; callers check
    /// for collisions first.
    pub fn create_entity(&mut self, class: &EntityClass, id: EntityId) -> &Entity {
        let entity = self.rules.create_entity(class, id.clone());
        self.entities.insert(id.clone(), entity);
        tracing::trace!(entity = %id, class = %class.id, "entity created");
        &self.entities[&id]
    }

    /// Removes an entity from its site and from the world.
    ///
    /// Influence must have been removed by the caller.
    pub fn remove_entity(&mut self, id: &str) -> Option<Entity> {
        let location = self.entities.get(id)?.site();
        if let Some(index) = self.site_index(location) {
            self.sites[index].remove(&EntityId::new(id));
        }
        self.entities.remove(id)
    }

    /// Moves an entity to `location`, on top of the site's stack.
    /// [`INVALID_LOCATION`] takes it off the map.
    ///
    /// Returns `false` if the entity is unknown or the location is neither on
    /// the map nor the invalid sentinel. Influence must be bracketed by the caller.
    pub fn place_entity(&mut self, id: &str, location: Point) -> bool {
        if is_valid_location(location) && !self.contains_site(location) {
            return false;
        }
        let Some(entity) = self.entities.get_mut(id) else {
            return false;
        };
        let old = entity.site();
        entity.set_site(if is_valid_location(location) {
            location
        } else {
            INVALID_LOCATION
        });

        let key = entity.id().clone();
        if let Some(index) = self.site_index(old) {
            self.sites[index].remove(&key);
        }
        if let Some(index) = self.site_index(location) {
            self.sites[index].push(key);
        }
        true
    }

    /// Moves a placed entity to the top of its site's stack.
    ///
    /// Returns `true` if the stack order changed.
    pub fn move_to_top(&mut self, id: &str) -> bool {
        let Some(entity) = self.entities.get(id) else {
            return false;
        };
        let Some(index) = self.site_index(entity.site()) else {
            return false;
        };
        let key = entity.id().clone();
        let site = &mut self.sites[index];
        if site.top() == Some(&key) || !site.remove(&key) {
            return false;
        }
        site.push(key);
        true
    }

    // =========================================================================
    // Modifier map bracketing
    // =========================================================================

    /// Adds the entity's current influence to the modifier map.
    pub fn add_influence(&mut self, id: &str) {
        let (width, height) = (self.width(), self.height());
        if let Some(entity) = self.entities.get(id) {
            if let Some(class) = self.scenario.entity_class(entity.class_id()) {
                self.modifier_map
                    .add_influence(entity, class, width, height);
            }
        }
    }

    /// Removes the entity's current influence from the modifier map.
    pub fn remove_influence(&mut self, id: &str) {
        let (width, height) = (self.width(), self.height());
        if let Some(entity) = self.entities.get(id) {
            if let Some(class) = self.scenario.entity_class(entity.class_id()) {
                self.modifier_map
                    .remove_influence(entity, class, width, height);
            }
        }
    }

    // =========================================================================
    // Sites
    // =========================================================================

    /// Sets the owner of a site and of all terrain on it.
    ///
    /// Returns `false` if the location is off the map. Terrain influence must be
    /// bracketed by the caller.
    pub fn set_site_owner(&mut self, location: Point, owner: Option<FactionId>) -> bool {
        let Some(index) = self.site_index(location) else {
            return false;
        };
        for id in self.entities_on(location, EntityCategory::Terrain) {
            if let Some(entity) = self.entities.get_mut(&id) {
                entity.set_owner(owner.clone());
            }
        }
        self.sites[index].set_owner(owner);
        true
    }

    // =========================================================================
    // Factions
    // =========================================================================

    /// Creates a faction through the rule factory and appends it to the turn order.
    pub fn create_faction(&mut self, class: &FactionClass) -> &Faction {
        let faction = self.rules.create_faction(class);
        self.factions.push(faction);
        let index = self.factions.len() - 1;
        &self.factions[index]
    }

    /// Ends the active faction's activation. The turn advances when the last
    /// faction in turn order finishes.
    ///
    /// Returns `false` if there are no factions.
    pub fn advance_faction(&mut self) -> bool {
        if self.factions.is_empty() {
            return false;
        }
        self.active_faction += 1;
        if self.active_faction >= self.factions.len() {
            self.active_faction = 0;
            self.turn += 1;
        }
        true
    }

    /// Removes a faction from the game.
    ///
    /// The faction's units are deleted; its other entities and its sites become
    /// unowned, and a victory it held is withdrawn. All influence changes are
    /// bracketed here. Returns the removed faction, or `None` if it did not
    /// exist.
    pub fn delete_faction(&mut self, id: &str) -> Option<Faction> {
        let index = self.factions.iter().position(|f| f.id().as_str() == id)?;
        let owned: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.owner().is_some_and(|o| o.as_str() == id))
            .map(|e| e.id().clone())
            .collect();

        for entity_id in owned {
            self.remove_influence(entity_id.as_str());
            let is_unit = self.entities.get(&entity_id).is_some_and(Entity::is_unit);
            if is_unit {
                self.remove_entity(entity_id.as_str());
                self.history.delete_entity(self.turn, &entity_id);
            } else {
                if let Some(entity) = self.entities.get_mut(&entity_id) {
                    entity.set_owner(None);
                }
                self.add_influence(entity_id.as_str());
            }
        }
        for site in &mut self.sites {
            if site.owner().is_some_and(|o| o.as_str() == id) {
                site.set_owner(None);
            }
        }

        if self.winning_faction.as_ref().is_some_and(|w| w.as_str() == id) {
            self.winning_faction = None;
        }

        let faction = self.factions.remove(index);
        if index < self.active_faction {
            self.active_faction -= 1;
        }
        if self.active_faction >= self.factions.len() {
            self.active_faction = 0;
        }
        tracing::debug!(faction = %id, "faction deleted");
        Some(faction)
    }

    /// Declares the winner. Returns `false` if it already was the winner.
    pub fn set_winning_faction(&mut self, id: FactionId) -> bool {
        if self.winning_faction.as_ref() == Some(&id) {
            return false;
        }
        self.winning_faction = Some(id);
        true
    }

    fn site_index(&self, location: Point) -> Option<usize> {
        if location.x < 0 || location.y < 0 || location.x >= self.width() || location.y >= self.height() {
            return None;
        }
        usize::try_from(location.y * self.width() + location.x).ok()
    }
}
