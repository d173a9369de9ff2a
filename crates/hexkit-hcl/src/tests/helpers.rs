//! Test helper functions for building worlds and placing entities.

use std::sync::Arc;

use hexkit_world::{
    DefaultRules, EntityCategory, EntityClass, EntityId, FactionClass, ModifierTarget, Point,
    Scenario, VariableCategory, VariableClass, WorldState,
};

use crate::instruction::Instruction;
use crate::payload::{IdArgs, PointArgs, TextArgs};
use crate::results::InstructionResults;

/// Red faction, first in turn order.
pub const RED: &str = "faction-red";
/// Blue faction, second in turn order.
pub const BLUE: &str = "faction-blue";

/// Entity attribute, range 0..=99.
pub const ATTRIBUTE_STRENGTH: &str = "attribute-strength";
/// Shared resource, range 0..=1000.
pub const RESOURCE_GOLD: &str = "resource-gold";
/// Faction counter, unbounded.
pub const COUNTER_SCORE: &str = "counter-score";

/// Map size of the test scenario.
pub const MAP_SIZE: i32 = 6;

// =============================================================================
// Scenario Setup
// =============================================================================

/// Builds the shared test scenario.
///
/// Entity classes:
/// - `unit-scout`: plain unit with strength 3
/// - `unit-general`: unit giving +2 strength to its owner's units within 1 step
/// - `terrain-mine`: terrain giving its owner +5 gold
/// - `effect-arrow`: effect used as an image source
///
/// Faction classes `faction-red`, `faction-blue` and `f1`.
pub fn test_scenario() -> Scenario {
    Scenario::new(MAP_SIZE, MAP_SIZE)
        .with_variable(
            VariableClass::new(ATTRIBUTE_STRENGTH, VariableCategory::Attribute).with_range(0, 99),
        )
        .with_variable(
            VariableClass::new(RESOURCE_GOLD, VariableCategory::Resource).with_range(0, 1000),
        )
        .with_variable(VariableClass::new(COUNTER_SCORE, VariableCategory::Counter))
        .with_entity_class(
            EntityClass::new("unit-scout", EntityCategory::Unit).with_attribute(ATTRIBUTE_STRENGTH, 3),
        )
        .with_entity_class(
            EntityClass::new("unit-general", EntityCategory::Unit)
                .with_attribute(ATTRIBUTE_STRENGTH, 5)
                .with_modifier(ATTRIBUTE_STRENGTH, ModifierTarget::OwnerUnitsRanged, 2)
                .with_modifier_range(1),
        )
        .with_entity_class(
            EntityClass::new("terrain-mine", EntityCategory::Terrain).with_modifier(
                RESOURCE_GOLD,
                ModifierTarget::Owner,
                5,
            ),
        )
        .with_entity_class(EntityClass::new("effect-arrow", EntityCategory::Effect))
        .with_faction_class(FactionClass::new(RED).with_resource(RESOURCE_GOLD, 10))
        .with_faction_class(FactionClass::new(BLUE).with_resource(RESOURCE_GOLD, 10))
        .with_faction_class(FactionClass::new("f1").with_counter(COUNTER_SCORE, 0))
}

/// Creates a world over [`test_scenario`] without factions.
pub fn empty_world() -> WorldState {
    WorldState::new(Arc::new(test_scenario()), Arc::new(DefaultRules))
}

/// Creates a world with red and blue factions, red active.
pub fn test_world() -> WorldState {
    let mut world = empty_world();
    for faction in [RED, BLUE] {
        Instruction::CreateFaction(IdArgs::new(faction))
            .execute(&mut world, None)
            .unwrap();
    }
    world
}

// =============================================================================
// Entity Setup
// =============================================================================

/// Creates a `unit-scout` at `location`, optionally owned by `owner`.
///
/// # Returns
///
/// The generated entity identifier.
pub fn placed_unit(world: &mut WorldState, location: Point, owner: Option<&str>) -> EntityId {
    place_new(world, "unit-scout", location, owner)
}

/// Creates an entity of `class` at `location`, optionally owned by `owner`.
pub fn place_new(
    world: &mut WorldState,
    class: &str,
    location: Point,
    owner: Option<&str>,
) -> EntityId {
    let mut results = InstructionResults::new();
    Instruction::CreateEntity(TextArgs::new(class, ""))
        .execute(world, Some(&mut results))
        .unwrap();
    let id = results.entity.unwrap().id().clone();
    Instruction::SetEntitySite(PointArgs::new(id.as_str(), location))
        .execute(world, None)
        .unwrap();
    if let Some(owner) = owner {
        Instruction::SetEntityOwner(TextArgs::new(id.as_str(), owner))
            .execute(world, None)
            .unwrap();
    }
    id
}
