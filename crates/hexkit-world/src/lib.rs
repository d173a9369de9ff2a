//! # Hexkit World
//!
//! Authoritative game-world state for Hexkit scenarios.
//!
//! This crate holds everything the Hexkit Command Language mutates:
//!
//! - **Scenario**: read-only static data (entity, faction and variable classes)
//! - **World state**: entities, factions and map sites keyed by stable identifiers
//! - **Modifier map**: cached aggregation of modifier influence across the map
//! - **History**: append-only lifecycle facts per entity and faction
//!
//! ## Determinism
//!
//! All collections iterate in a fixed order (`BTreeMap`, turn-ordered `Vec`) and
//! entity identifiers come from a counter stored in the world itself, so replaying
//! the same mutations against the same initial state always reproduces the same
//! world. [`hash_world`] fingerprints a state for verification.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use hexkit_world::{Scenario, WorldState, DefaultRules};
//!
//! let scenario = Scenario::new(4, 4);
//! let world = WorldState::new(Arc::new(scenario), Arc::new(DefaultRules));
//! assert_eq!(world.sites().count(), 16);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod entity;
pub mod faction;
pub mod hash;
pub mod history;
pub mod ids;
pub mod map;
pub mod modifier_map;
pub mod rules;
pub mod scenario;
pub mod world;

// Re-exports for convenience
pub use entity::{Entity, ModifierKey, UnitFlags};
pub use faction::Faction;
pub use hash::hash_world;
pub use history::{EntityEvent, EntityEventKind, FactionEvent, FactionEventKind, History};
pub use ids::{EntityId, FactionId};
pub use map::{hex_distance, is_valid_location, Point, Site, INVALID_LOCATION};
pub use modifier_map::{InfluenceOp, ModifierMap};
pub use rules::{DefaultRules, RuleFactory};
pub use scenario::{
    EntityCategory, EntityClass, FactionClass, ModifierDefinition, ModifierTarget, Scenario,
    ScenarioError, VariableCategory, VariableClass,
};
pub use world::WorldState;
