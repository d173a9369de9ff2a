//! Cached aggregation of modifier influence across the map.
//!
//! Entities carry modifiers that reach beyond themselves: a mine adds gold to its
//! owner, a general strengthens units around him. The [`ModifierMap`] caches the
//! sum of those contributions per site and per faction so derived totals never
//! require a scan of every entity.
//!
//! # Bracketing
//!
//! The cache is maintained incrementally. Any change to an entity's class, owner,
//! site or non-`Self` modifiers must be bracketed:
//!
//! 1. [`WorldState::remove_influence`](crate::WorldState::remove_influence)
//! 2. the mutation
//! 3. [`WorldState::add_influence`](crate::WorldState::add_influence)
//!
//! Removal subtracts exactly what addition added for the same entity state, so a
//! correctly bracketed mutation leaves the map equal to [`ModifierMap::rebuild`].
//! The optional journal records the call sequence for verification.
//!
//! Entries are exact `i64` sums of `i32` contributions, so removal undoes
//! addition for any modifier value. Queries saturate to the `i32` range.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::entity::Entity;
use crate::ids::{EntityId, FactionId};
use crate::map::{hex_distance, is_valid_location, Point};
use crate::scenario::{EntityClass, ModifierTarget};
use crate::world::WorldState;

/// One influence bracketing call, as recorded by the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfluenceOp {
    /// Influence of the entity was removed
    Remove(EntityId),
    /// Influence of the entity was added
    Add(EntityId),
}

/// Key of a per-site modifier entry.
///
/// `owner` is `None` for modifiers applying to all units on the site and the
/// restricting faction for owner-only modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
struct SiteKey {
    variable: String,
    owner: Option<FactionId>,
}

/// One contribution of an entity to the map.
enum Contribution {
    Faction(FactionId, String, i32),
    Site(Point, SiteKey, i32),
}

/// Cached modifier influence per site and per faction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModifierMap {
    /// Site modifiers keyed by `(column, row)`.
    sites: BTreeMap<(i32, i32), BTreeMap<SiteKey, i64>>,
    /// Faction modifiers from owned entities.
    factions: BTreeMap<FactionId, BTreeMap<String, i64>>,
    /// Recorded bracketing calls, if journaling is enabled.
    #[serde(skip)]
    journal: Option<Vec<InfluenceOp>>,
}

impl PartialEq for ModifierMap {
    fn eq(&self, other: &Self) -> bool {
        self.sites == other.sites && self.factions == other.factions
    }
}

impl Eq for ModifierMap {}

impl Hash for ModifierMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sites.hash(state);
        self.factions.hash(state);
    }
}

impl ModifierMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the map from scratch for every entity in `world`.
    #[must_use]
    pub fn rebuild(world: &WorldState) -> Self {
        let mut map = Self::new();
        let scenario = world.scenario();
        for entity in world.entities() {
            if let Some(class) = scenario.entity_class(entity.class_id()) {
                map.apply(entity, class, world.width(), world.height(), 1);
            }
        }
        map
    }

    /// Adds the influence of an entity in its current state.
    pub fn add_influence(&mut self, entity: &Entity, class: &EntityClass, width: i32, height: i32) {
        if let Some(journal) = &mut self.journal {
            journal.push(InfluenceOp::Add(entity.id().clone()));
        }
        self.apply(entity, class, width, height, 1);
    }

    /// Removes the influence of an entity in its current state.
    pub fn remove_influence(
        &mut self,
        entity: &Entity,
        class: &EntityClass,
        width: i32,
        height: i32,
    ) {
        if let Some(journal) = &mut self.journal {
            journal.push(InfluenceOp::Remove(entity.id().clone()));
        }
        self.apply(entity, class, width, height, -1);
    }

    /// Returns the summed modifier on a site for a unit owned by `owner`.
    #[must_use]
    pub fn site_modifier(&self, location: Point, variable: &str, owner: Option<&FactionId>) -> i32 {
        let Some(entries) = self.sites.get(&(location.x, location.y)) else {
            return 0;
        };
        let total = entries
            .iter()
            .filter(|(key, _)| key.variable == variable)
            .filter(|(key, _)| key.owner.is_none() || key.owner.as_ref() == owner)
            .fold(0_i64, |sum, (_, value)| sum.saturating_add(*value));
        saturate(total)
    }

    /// Returns the summed modifier entities contribute to a faction.
    #[must_use]
    pub fn faction_modifier(&self, faction: &FactionId, variable: &str) -> i32 {
        self.factions
            .get(faction)
            .and_then(|values| values.get(variable))
            .map_or(0, |value| saturate(*value))
    }

    /// Returns `true` if no influence is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty() && self.factions.is_empty()
    }

    /// Starts recording bracketing calls, discarding any previous journal.
    pub fn enable_journal(&mut self) {
        self.journal = Some(Vec::new());
    }

    /// Stops recording bracketing calls.
    pub fn disable_journal(&mut self) {
        self.journal = None;
    }

    /// Drains the recorded bracketing calls. Recording continues if enabled.
    pub fn take_journal(&mut self) -> Vec<InfluenceOp> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn apply(&mut self, entity: &Entity, class: &EntityClass, width: i32, height: i32, sign: i64) {
        for contribution in contributions(entity, class, width, height) {
            match contribution {
                Contribution::Faction(faction, variable, value) => {
                    let values = self.factions.entry(faction.clone()).or_default();
                    add_entry(values, variable, sign * i64::from(value));
                    if values.is_empty() {
                        self.factions.remove(&faction);
                    }
                }
                Contribution::Site(location, key, value) => {
                    let cell = (location.x, location.y);
                    let values = self.sites.entry(cell).or_default();
                    add_entry(values, key, sign * i64::from(value));
                    if values.is_empty() {
                        self.sites.remove(&cell);
                    }
                }
            }
        }
    }
}

/// Adds `delta` to an entry, dropping it when it reaches zero.
fn add_entry<K: Ord>(values: &mut BTreeMap<K, i64>, key: K, delta: i64) {
    let entry = values.entry(key).or_insert(0);
    *entry = entry.wrapping_add(delta);
    if *entry == 0 {
        values.retain(|_, v| *v != 0);
    }
}

/// Clamps an aggregated sum into the `i32` range.
fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Lists every contribution the entity makes in its current state.
fn contributions(entity: &Entity, class: &EntityClass, width: i32, height: i32) -> Vec<Contribution> {
    let site = entity.site();
    if !is_valid_location(site) || site.x >= width || site.y >= height {
        return Vec::new();
    }

    let mut result = Vec::new();
    for (key, value) in entity.effective_modifiers(class) {
        if value == 0 {
            continue;
        }
        let owner = entity.owner().cloned();
        match key.target {
            ModifierTarget::Own => {}
            ModifierTarget::Owner => {
                if let Some(owner) = owner {
                    result.push(Contribution::Faction(owner, key.variable, value));
                }
            }
            target => {
                let restriction = if target.is_owner_restricted() {
                    match owner {
                        Some(owner) => Some(owner),
                        None => continue,
                    }
                } else {
                    None
                };
                let range = if target.is_ranged() {
                    class.modifier_range.max(0)
                } else {
                    0
                };
                for location in sites_within(site, range, width, height) {
                    result.push(Contribution::Site(
                        location,
                        SiteKey {
                            variable: key.variable.clone(),
                            owner: restriction.clone(),
                        },
                        value,
                    ));
                }
            }
        }
    }
    result
}

/// On-map sites within `range` hex steps of `center`, in column-major order.
fn sites_within(center: Point, range: i32, width: i32, height: i32) -> Vec<Point> {
    let mut result = Vec::new();
    for x in (center.x - range).max(0)..=(center.x + range).min(width - 1) {
        for y in (center.y - range).max(0)..=(center.y + range).min(height - 1) {
            let p = Point::new(x, y);
            if hex_distance(center, p) <= range {
                result.push(p);
            }
        }
    }
    result
}
