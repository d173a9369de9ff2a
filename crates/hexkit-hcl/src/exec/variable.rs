//! Variable and modifier instructions for entities and factions.
//!
//! | Instruction | Attribute | Counter | Resource |
//! |---|---|---|---|
//! | `SetEntityVariable` | yes | no | yes |
//! | `SetEntityVariableModifier` | yes | no | yes |
//! | `SetFactionVariable` | no | yes | yes |
//! | `SetFactionVariableModifier` | no | no | yes |
//!
//! Unsupported combinations raise `VariableCategoryInvalid`. Values are clamped
//! to the variable's range; modifiers are not.

use std::sync::Arc;

use hexkit_world::{ModifierKey, ModifierTarget, VariableCategory, VariableClass, WorldState};

use super::{bracketed, update_entity};
use crate::error::InvalidCommand;
use crate::payload::{ModifierArgs, TextValueArgs};
use crate::resolve::{get_entity, get_faction, get_variable};
use crate::results::InstructionResults;

fn category_error(name: &'static str, variable: &VariableClass) -> InvalidCommand {
    InvalidCommand::VariableCategoryInvalid {
        instruction: name,
        id: variable.id.clone(),
        category: variable.category,
    }
}

pub(super) fn set_entity_variable(
    name: &'static str,
    args: &TextValueArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let scenario = Arc::clone(world.scenario());
    let entity = get_entity(world, name, &args.id)?;
    let variable = get_variable(&scenario, name, &args.text)?;
    let value = variable.clamp(args.value);
    let current = match variable.category {
        VariableCategory::Attribute => entity.attribute(&variable.id),
        VariableCategory::Resource => entity.resource(&variable.id),
        VariableCategory::Counter => return Err(category_error(name, variable)),
    };
    if current == Some(value) {
        return Ok(false);
    }

    update_entity(world, &args.id, |entity| match variable.category {
        VariableCategory::Attribute => entity.set_attribute(&variable.id, value),
        _ => entity.set_resource(&variable.id, value),
    });

    if let Some(results) = results {
        results.entity = world.entity(&args.id).cloned();
        results.variable_class = Some(variable.clone());
    }
    Ok(true)
}

pub(super) fn set_entity_modifier(
    name: &'static str,
    args: &ModifierArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let scenario = Arc::clone(world.scenario());
    let entity = get_entity(world, name, &args.id)?;
    let variable = get_variable(&scenario, name, &args.text)?;
    if variable.category == VariableCategory::Counter {
        return Err(category_error(name, variable));
    }
    let class = scenario
        .entity_class(entity.class_id())
        .ok_or_else(|| InvalidCommand::ClassInvalid {
            instruction: name,
            id: entity.class_id().to_string(),
        })?;
    let key = ModifierKey::new(&variable.id, args.target);
    if entity.modifier(class, &key) == args.value {
        return Ok(false);
    }

    let value = args.value;
    if args.target == ModifierTarget::Own {
        update_entity(world, &args.id, |entity| entity.set_modifier(key, value));
    } else {
        bracketed(world, &args.id, |world| {
            update_entity(world, &args.id, |entity| entity.set_modifier(key, value));
        });
    }

    if let Some(results) = results {
        results.entity = world.entity(&args.id).cloned();
        results.variable_class = Some(variable.clone());
    }
    Ok(true)
}

pub(super) fn set_faction_variable(
    name: &'static str,
    args: &TextValueArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let scenario = Arc::clone(world.scenario());
    let faction = get_faction(world, name, &args.id)?;
    let variable = get_variable(&scenario, name, &args.text)?;
    let value = variable.clamp(args.value);
    let current = match variable.category {
        VariableCategory::Counter => faction.counter(&variable.id),
        VariableCategory::Resource => faction.resource(&variable.id),
        VariableCategory::Attribute => return Err(category_error(name, variable)),
    };
    if current == Some(value) {
        return Ok(false);
    }

    if let Some(faction) = world.faction_mut(&args.id) {
        match variable.category {
            VariableCategory::Counter => faction.set_counter(&variable.id, value),
            _ => faction.set_resource(&variable.id, value),
        }
    }

    if let Some(results) = results {
        results.faction = world.faction(&args.id).cloned();
        results.variable_class = Some(variable.clone());
    }
    Ok(true)
}

pub(super) fn set_faction_modifier(
    name: &'static str,
    args: &TextValueArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let scenario = Arc::clone(world.scenario());
    let faction = get_faction(world, name, &args.id)?;
    let variable = get_variable(&scenario, name, &args.text)?;
    if variable.category != VariableCategory::Resource {
        return Err(category_error(name, variable));
    }
    if faction.resource_modifier(&variable.id) == args.value {
        return Ok(false);
    }

    if let Some(faction) = world.faction_mut(&args.id) {
        faction.set_resource_modifier(&variable.id, args.value);
    }

    if let Some(results) = results {
        results.faction = world.faction(&args.id).cloned();
        results.variable_class = Some(variable.clone());
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use crate::error::InvalidCommandKind;
    use crate::payload::{ModifierArgs, TextValueArgs};
    use crate::tests::helpers::{
        placed_unit, test_world, ATTRIBUTE_STRENGTH, COUNTER_SCORE, RED, RESOURCE_GOLD,
    };
    use crate::Instruction;
    use hexkit_world::{ModifierMap, ModifierTarget, Point};

    mod entity_variable_tests {
        use super::*;

        #[test]
        fn attribute_is_clamped() {
            let mut world = test_world();
            let unit = placed_unit(&mut world, Point::new(0, 0), None);
            let set = Instruction::SetEntityVariable(TextValueArgs::new(
                unit.as_str(),
                ATTRIBUTE_STRENGTH,
                500,
            ));
            assert!(set.execute(&mut world, None).unwrap());
            assert_eq!(
                world.entity(unit.as_str()).unwrap().attribute(ATTRIBUTE_STRENGTH),
                Some(99)
            );
            // clamped value already stored
            assert!(!set.execute(&mut world, None).unwrap());
        }

        #[test]
        fn counter_on_entity_is_rejected() {
            let mut world = test_world();
            let unit = placed_unit(&mut world, Point::new(0, 0), None);
            let err = Instruction::SetEntityVariable(TextValueArgs::new(
                unit.as_str(),
                COUNTER_SCORE,
                1,
            ))
            .execute(&mut world, None)
            .unwrap_err();
            assert_eq!(err.kind(), InvalidCommandKind::VariableCategoryInvalid);
        }

        #[test]
        fn self_modifier_skips_the_map() {
            let mut world = test_world();
            let unit = placed_unit(&mut world, Point::new(0, 0), None);
            world.modifier_map_mut().enable_journal();
            let set = Instruction::SetEntityVariableModifier(ModifierArgs::new(
                unit.as_str(),
                ATTRIBUTE_STRENGTH,
                4,
                ModifierTarget::Own,
            ));
            assert!(set.execute(&mut world, None).unwrap());
            assert!(world.modifier_map_mut().take_journal().is_empty());
            assert!(!set.execute(&mut world, None).unwrap());
        }

        #[test]
        fn ranged_modifier_updates_the_map() {
            let mut world = test_world();
            let unit = placed_unit(&mut world, Point::new(2, 2), Some(RED));
            let set = Instruction::SetEntityVariableModifier(ModifierArgs::new(
                unit.as_str(),
                ATTRIBUTE_STRENGTH,
                3,
                ModifierTarget::UnitsRanged,
            ));
            assert!(set.execute(&mut world, None).unwrap());
            assert_eq!(world.modifier_map(), &ModifierMap::rebuild(&world));
        }
    }

    mod faction_variable_tests {
        use super::*;

        #[test]
        fn counter_and_resource() {
            let mut world = test_world();
            assert!(Instruction::SetFactionVariable(TextValueArgs::new(RED, COUNTER_SCORE, 7))
                .execute(&mut world, None)
                .unwrap());
            assert!(Instruction::SetFactionVariable(TextValueArgs::new(RED, RESOURCE_GOLD, -4))
                .execute(&mut world, None)
                .unwrap());
            let red = world.faction(RED).unwrap();
            assert_eq!(red.counter(COUNTER_SCORE), Some(7));
            assert_eq!(red.resource(RESOURCE_GOLD), Some(0));
        }

        #[test]
        fn attribute_on_faction_is_rejected() {
            let mut world = test_world();
            let err = Instruction::SetFactionVariable(TextValueArgs::new(
                RED,
                ATTRIBUTE_STRENGTH,
                1,
            ))
            .execute(&mut world, None)
            .unwrap_err();
            assert_eq!(err.kind(), InvalidCommandKind::VariableCategoryInvalid);
        }

        #[test]
        fn unknown_variable() {
            let mut world = test_world();
            let err = Instruction::SetFactionVariableModifier(TextValueArgs::new(RED, "mana", 1))
                .execute(&mut world, None)
                .unwrap_err();
            assert_eq!(err.kind(), InvalidCommandKind::VariableInvalid);
            assert_eq!(err.identifier(), "mana");
        }
    }
}
