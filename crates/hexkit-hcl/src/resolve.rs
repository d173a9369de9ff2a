//! Identifier resolution shared by all instructions.
//!
//! Every helper takes the display name of the calling instruction and fails with
//! a structured [`InvalidCommand`] instead of returning nothing. Instructions
//! resolve every reference before they mutate anything.

use hexkit_world::{
    Entity, EntityClass, Faction, FactionClass, FactionEvent, FactionId, Point, Scenario, Site,
    VariableClass, WorldState,
};

use crate::error::InvalidCommand;

fn require<'a>(name: &'static str, id: &'a str) -> Result<&'a str, InvalidCommand> {
    if id.is_empty() {
        Err(InvalidCommand::IdentifierEmpty {
            instruction: name,
            id: String::new(),
        })
    } else {
        Ok(id)
    }
}

/// Resolves an entity.
///
/// # Errors
///
/// `IdentifierEmpty` if `id` is empty, `EntityInvalid` if no such entity exists.
pub fn get_entity<'w>(
    world: &'w WorldState,
    name: &'static str,
    id: &str,
) -> Result<&'w Entity, InvalidCommand> {
    let id = require(name, id)?;
    world.entity(id).ok_or_else(|| InvalidCommand::EntityInvalid {
        instruction: name,
        id: id.to_string(),
    })
}

/// Resolves an entity that must be a unit.
///
/// # Errors
///
/// As [`get_entity`]; `EntityInvalid` also if the entity is not a unit.
pub fn get_unit<'w>(
    world: &'w WorldState,
    name: &'static str,
    id: &str,
) -> Result<&'w Entity, InvalidCommand> {
    let entity = get_entity(world, name, id)?;
    if entity.is_unit() {
        Ok(entity)
    } else {
        Err(InvalidCommand::EntityInvalid {
            instruction: name,
            id: id.to_string(),
        })
    }
}

/// Resolves a faction.
///
/// # Errors
///
/// `IdentifierEmpty` if `id` is empty, `FactionInvalid` if no such faction exists.
pub fn get_faction<'w>(
    world: &'w WorldState,
    name: &'static str,
    id: &str,
) -> Result<&'w Faction, InvalidCommand> {
    let id = require(name, id)?;
    world.faction(id).ok_or_else(|| InvalidCommand::FactionInvalid {
        instruction: name,
        id: id.to_string(),
    })
}

/// Resolves a secondary faction reference where an empty identifier means "none".
///
/// # Errors
///
/// `FactionInvalid` if `id` is not empty and no such faction exists.
pub fn get_optional_faction(
    world: &WorldState,
    name: &'static str,
    id: &str,
) -> Result<Option<FactionId>, InvalidCommand> {
    if id.is_empty() {
        return Ok(None);
    }
    get_faction(world, name, id).map(|faction| Some(faction.id().clone()))
}

/// Resolves a map site.
///
/// # Errors
///
/// `SiteInvalid` if `location` is not on the map.
pub fn get_site<'w>(
    world: &'w WorldState,
    name: &'static str,
    location: Point,
) -> Result<&'w Site, InvalidCommand> {
    world
        .site(location)
        .ok_or_else(|| InvalidCommand::SiteInvalid {
            instruction: name,
            id: format!("({}, {})", location.x, location.y),
        })
}

/// Resolves an entity class.
///
/// # Errors
///
/// `IdentifierEmpty` if `id` is empty, `ClassInvalid` if no such class exists.
pub fn get_entity_class<'s>(
    scenario: &'s Scenario,
    name: &'static str,
    id: &str,
) -> Result<&'s EntityClass, InvalidCommand> {
    let id = require(name, id)?;
    scenario
        .entity_class(id)
        .ok_or_else(|| InvalidCommand::ClassInvalid {
            instruction: name,
            id: id.to_string(),
        })
}

/// Resolves a faction class.
///
/// # Errors
///
/// `IdentifierEmpty` if `id` is empty, `ClassInvalid` if no such class exists.
pub fn get_faction_class<'s>(
    scenario: &'s Scenario,
    name: &'static str,
    id: &str,
) -> Result<&'s FactionClass, InvalidCommand> {
    let id = require(name, id)?;
    scenario
        .faction_class(id)
        .ok_or_else(|| InvalidCommand::ClassInvalid {
            instruction: name,
            id: id.to_string(),
        })
}

/// Resolves a variable class.
///
/// # Errors
///
/// `IdentifierEmpty` if `id` is empty, `VariableInvalid` if no such variable exists.
pub fn get_variable<'s>(
    scenario: &'s Scenario,
    name: &'static str,
    id: &str,
) -> Result<&'s VariableClass, InvalidCommand> {
    let id = require(name, id)?;
    scenario
        .variable(id)
        .ok_or_else(|| InvalidCommand::VariableInvalid {
            instruction: name,
            id: id.to_string(),
        })
}

/// Resolves the history of a faction that exists or once existed.
///
/// # Errors
///
/// `IdentifierEmpty` if `id` is empty, `FactionInvalid` if the faction neither
/// exists nor has any recorded history.
pub fn get_faction_history<'w>(
    world: &'w WorldState,
    name: &'static str,
    id: &str,
) -> Result<&'w [FactionEvent], InvalidCommand> {
    let id = require(name, id)?;
    let events = world.history().faction(&FactionId::new(id));
    if events.is_empty() && world.faction(id).is_none() {
        return Err(InvalidCommand::FactionInvalid {
            instruction: name,
            id: id.to_string(),
        });
    }
    Ok(events)
}
