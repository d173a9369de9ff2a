//! Faction lifecycle and turn instructions.

use std::sync::Arc;

use hexkit_world::{FactionId, WorldState};

use crate::error::InvalidCommand;
use crate::payload::IdArgs;
use crate::resolve::{get_faction, get_faction_class};
use crate::results::InstructionResults;

pub(super) fn advance_faction(
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> bool {
    let Some(finished) = world.active_faction().map(|f| f.id().clone()) else {
        return false;
    };
    let turn = world.turn();
    world.advance_faction();
    world.history_mut().advance(turn, &finished);

    if let Some(results) = results {
        results.faction = world.active_faction().cloned();
    }
    true
}

pub(super) fn create_faction(
    name: &'static str,
    args: &IdArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let scenario = Arc::clone(world.scenario());
    let class = get_faction_class(&scenario, name, &args.id)?;
    if world.faction(&class.id).is_some() {
        return Err(InvalidCommand::FactionInvalid {
            instruction: name,
            id: class.id.clone(),
        });
    }

    let id = world.create_faction(class).id().clone();
    let turn = world.turn();
    world.history_mut().create_faction(turn, &id);

    if let Some(results) = results {
        results.faction = world.faction(id.as_str()).cloned();
    }
    Ok(true)
}

pub(super) fn delete_faction(
    name: &'static str,
    args: &IdArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let id = get_faction(world, name, &args.id)?.id().clone();

    let deleted = world.delete_faction(id.as_str());
    let turn = world.turn();
    world.history_mut().delete_faction(turn, &id);

    if let Some(results) = results {
        results.faction = deleted;
    }
    Ok(true)
}

pub(super) fn set_winning_faction(
    name: &'static str,
    args: &IdArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let id: FactionId = get_faction(world, name, &args.id)?.id().clone();
    if !world.set_winning_faction(id.clone()) {
        return Ok(false);
    }
    let turn = world.turn();
    world.history_mut().victory(turn, &id);

    if let Some(results) = results {
        results.faction = world.faction(id.as_str()).cloned();
    }
    Ok(true)
}
