//! Entity lifecycle and entity property instructions.

use std::sync::Arc;

use hexkit_world::{is_valid_location, EntityId, UnitFlags, WorldState, INVALID_LOCATION};

use super::{bracketed, update_entity};
use crate::error::InvalidCommand;
use crate::payload::{FlagArgs, IdArgs, PointArgs, TextArgs, TextFlagArgs, ValueArgs};
use crate::resolve::{get_entity, get_entity_class, get_optional_faction, get_site, get_unit};
use crate::results::InstructionResults;

/// Stores the entity's current state in the results bag.
fn report_entity(world: &WorldState, id: &str, results: Option<&mut InstructionResults>) {
    if let Some(results) = results {
        results.entity = world.entity(id).cloned();
    }
}

pub(super) fn create_entity(
    name: &'static str,
    args: &TextArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let scenario = Arc::clone(world.scenario());
    let class = get_entity_class(&scenario, name, &args.id)?;
    if !args.text.is_empty() && world.entity(&args.text).is_some() {
        return Err(InvalidCommand::EntityInvalid {
            instruction: name,
            id: args.text.clone(),
        });
    }

    let id = if args.text.is_empty() {
        world.next_entity_id(&class.id)
    } else {
        EntityId::new(&args.text)
    };
    world.create_entity(class, id.clone());
    let turn = world.turn();
    world.history_mut().create_entity(turn, &id, &class.id);

    if let Some(results) = results {
        results.entity = world.entity(id.as_str()).cloned();
        results.entity_class = Some(class.clone());
    }
    Ok(true)
}

pub(super) fn delete_entity(
    name: &'static str,
    args: &IdArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let entity = get_entity(world, name, &args.id)?.clone();
    let owner = entity
        .owner()
        .and_then(|owner| world.faction(owner.as_str()))
        .cloned();
    let site = world.site(entity.site()).cloned();

    world.remove_influence(&args.id);
    world.remove_entity(&args.id);
    let turn = world.turn();
    world.history_mut().delete_entity(turn, entity.id());

    if let Some(results) = results {
        results.entity = Some(entity);
        results.faction = owner;
        results.site = site;
    }
    Ok(true)
}

pub(super) fn move_to_top(
    name: &'static str,
    args: &IdArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    get_entity(world, name, &args.id)?;
    if !world.move_to_top(&args.id) {
        return Ok(false);
    }
    report_entity(world, &args.id, results);
    Ok(true)
}

pub(super) fn set_class(
    name: &'static str,
    args: &TextArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let scenario = Arc::clone(world.scenario());
    let entity = get_entity(world, name, &args.id)?;
    let class = get_entity_class(&scenario, name, &args.text)?;
    if class.category != entity.category() {
        return Err(InvalidCommand::ClassInvalid {
            instruction: name,
            id: args.text.clone(),
        });
    }
    if entity.class_id() == class.id {
        return Ok(false);
    }

    bracketed(world, &args.id, |world| {
        update_entity(world, &args.id, |entity| entity.set_class(class));
    });
    let turn = world.turn();
    world
        .history_mut()
        .set_entity_class(turn, &EntityId::new(&args.id), &class.id);

    if let Some(results) = results {
        results.entity = world.entity(&args.id).cloned();
        results.entity_class = Some(class.clone());
    }
    Ok(true)
}

pub(super) fn set_display_class(
    name: &'static str,
    args: &TextArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let scenario = Arc::clone(world.scenario());
    let entity = get_entity(world, name, &args.id)?;
    let display_class = if args.text.is_empty() {
        None
    } else {
        let class = get_entity_class(&scenario, name, &args.text)?;
        if class.category != entity.category() {
            return Err(InvalidCommand::ClassInvalid {
                instruction: name,
                id: args.text.clone(),
            });
        }
        Some(class.id.clone())
    };
    if entity.display_class() == display_class.as_deref() {
        return Ok(false);
    }

    update_entity(world, &args.id, |entity| entity.set_display_class(display_class));
    report_entity(world, &args.id, results);
    Ok(true)
}

pub(super) fn set_frame_offset(
    name: &'static str,
    args: &ValueArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let entity = get_entity(world, name, &args.id)?;
    if args.value < 0 {
        return Err(InvalidCommand::ValueNegative {
            instruction: name,
            id: args.id.clone(),
            value: args.value,
        });
    }
    if entity.frame_offset() == args.value {
        return Ok(false);
    }

    update_entity(world, &args.id, |entity| entity.set_frame_offset(args.value));
    report_entity(world, &args.id, results);
    Ok(true)
}

pub(super) fn set_name(
    name: &'static str,
    args: &TextArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let entity = get_entity(world, name, &args.id)?;
    let new_name = (!args.text.is_empty()).then(|| args.text.clone());
    if entity.name() == new_name.as_deref() {
        return Ok(false);
    }

    let turn = world.turn();
    world
        .history_mut()
        .set_entity_name(turn, &EntityId::new(&args.id), new_name.as_deref());
    update_entity(world, &args.id, |entity| entity.set_name(new_name));
    report_entity(world, &args.id, results);
    Ok(true)
}

pub(super) fn set_owner(
    name: &'static str,
    args: &TextArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let entity = get_entity(world, name, &args.id)?;
    let owner = get_optional_faction(world, name, &args.text)?;
    if entity.owner() == owner.as_ref() {
        return Ok(false);
    }
    let original = entity
        .owner()
        .and_then(|current| world.faction(current.as_str()))
        .cloned();

    bracketed(world, &args.id, |world| {
        update_entity(world, &args.id, |entity| entity.set_owner(owner.clone()));
    });
    if let Some(owner) = &owner {
        let turn = world.turn();
        world
            .history_mut()
            .add_entity(turn, owner, &EntityId::new(&args.id));
    }

    if let Some(results) = results {
        results.entity = world.entity(&args.id).cloned();
        results.faction = original;
    }
    Ok(true)
}

pub(super) fn set_site(
    name: &'static str,
    args: &PointArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let entity = get_entity(world, name, &args.id)?;
    let target = if is_valid_location(args.location) {
        get_site(world, name, args.location)?.location()
    } else {
        INVALID_LOCATION
    };
    if entity.site() == target {
        return Ok(false);
    }
    let original = world.site(entity.site()).cloned();

    bracketed(world, &args.id, |world| {
        world.place_entity(&args.id, target);
    });

    if let Some(results) = results {
        results.entity = world.entity(&args.id).cloned();
        results.site = original;
    }
    Ok(true)
}

pub(super) fn set_flag(
    name: &'static str,
    args: &TextFlagArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let entity = get_entity(world, name, &args.id)?;
    if args.text.is_empty() {
        return Err(InvalidCommand::IdentifierEmpty {
            instruction: name,
            id: String::new(),
        });
    }
    if entity.has_flag(&args.text) == args.value {
        return Ok(false);
    }

    update_entity(world, &args.id, |entity| {
        entity.set_flag(&args.text, args.value);
    });
    report_entity(world, &args.id, results);
    Ok(true)
}

pub(super) fn set_unit_flag(
    name: &'static str,
    args: &FlagArgs,
    flag: UnitFlags,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let unit = get_unit(world, name, &args.id)?;
    if unit.unit_flags().contains(flag) == args.value {
        return Ok(false);
    }

    update_entity(world, &args.id, |unit| unit.set_unit_flags(flag, args.value));
    report_entity(world, &args.id, results);
    Ok(true)
}
