//! Execution of instructions against a [`WorldState`].
//!
//! Every variant follows the same sequence:
//!
//! 1. Resolve all identifiers (fail with [`InvalidCommand`], nothing mutated)
//! 2. Compare the requested value with the current one (return `false` if equal)
//! 3. Remove modifier-map influence of the affected entities, if bracketed
//! 4. Mutate
//! 5. Add modifier-map influence back
//! 6. Record history and fill the results bag
//!
//! Steps 3 to 6 cannot fail, so an instruction is never partially applied.

mod entity;
mod faction;
mod site;
mod variable;

use hexkit_world::{Entity, WorldState};

use crate::error::InvalidCommand;
use crate::instruction::Instruction;
use crate::results::InstructionResults;

/// Runs `mutate` between removing and re-adding the entity's map influence.
fn bracketed(world: &mut WorldState, id: &str, mutate: impl FnOnce(&mut WorldState)) {
    world.remove_influence(id);
    mutate(world);
    world.add_influence(id);
}

/// Applies `update` to an entity that was resolved earlier.
fn update_entity(world: &mut WorldState, id: &str, update: impl FnOnce(&mut Entity)) {
    if let Some(entity) = world.entity_mut(id) {
        update(entity);
    }
}

impl Instruction {
    /// Applies this instruction to `world`.
    ///
    /// Returns `Ok(true)` if the world changed and `Ok(false)` for a no-op. A
    /// no-op leaves both the world and `results` untouched. Event instructions
    /// never mutate and always return `Ok(false)`; replay drivers route them to
    /// an [`EventDisplay`](crate::EventDisplay) instead.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCommand`] if an identifier does not resolve or a value is
    /// out of range. The world is unchanged in that case.
    pub fn execute(
        &self,
        world: &mut WorldState,
        results: Option<&mut InstructionResults>,
    ) -> Result<bool, InvalidCommand> {
        let name = self.name();
        let changed = match self {
            Self::AdvanceFaction(_) => faction::advance_faction(world, results),
            Self::CreateEntity(args) => entity::create_entity(name, args, world, results)?,
            Self::CreateFaction(args) => faction::create_faction(name, args, world, results)?,
            Self::DeleteEntity(args) => entity::delete_entity(name, args, world, results)?,
            Self::DeleteFaction(args) => faction::delete_faction(name, args, world, results)?,
            Self::MoveEntityToTop(args) => entity::move_to_top(name, args, world, results)?,
            Self::SetEntityClass(args) => entity::set_class(name, args, world, results)?,
            Self::SetEntityDisplayClass(args) => {
                entity::set_display_class(name, args, world, results)?
            }
            Self::SetEntityFrameOffset(args) => {
                entity::set_frame_offset(name, args, world, results)?
            }
            Self::SetEntityName(args) => entity::set_name(name, args, world, results)?,
            Self::SetEntityOwner(args) => entity::set_owner(name, args, world, results)?,
            Self::SetEntitySite(args) => entity::set_site(name, args, world, results)?,
            Self::SetEntityVariable(args) => {
                variable::set_entity_variable(name, args, world, results)?
            }
            Self::SetEntityVariableModifier(args) => {
                variable::set_entity_modifier(name, args, world, results)?
            }
            Self::SetEntityFlag(args) => entity::set_flag(name, args, world, results)?,
            Self::SetUnitCanAttack(args) => entity::set_unit_flag(
                name,
                args,
                hexkit_world::UnitFlags::CAN_ATTACK,
                world,
                results,
            )?,
            Self::SetUnitCanMove(args) => entity::set_unit_flag(
                name,
                args,
                hexkit_world::UnitFlags::CAN_MOVE,
                world,
                results,
            )?,
            Self::SetFactionVariable(args) => {
                variable::set_faction_variable(name, args, world, results)?
            }
            Self::SetFactionVariableModifier(args) => {
                variable::set_faction_modifier(name, args, world, results)?
            }
            Self::SetSiteOwner(args) => site::set_owner(name, args, world, results)?,
            Self::SetWinningFaction(args) => {
                faction::set_winning_faction(name, args, world, results)?
            }
            Self::SelectEntity(_)
            | Self::ShowImage(_)
            | Self::MoveImage(_)
            | Self::ShowMessage(_)
            | Self::ShowMessageDialog(_) => false,
        };

        if changed {
            tracing::debug!(instruction = name, id = self.id(), "instruction applied");
        } else {
            tracing::trace!(instruction = name, id = self.id(), "instruction had no effect");
        }
        Ok(changed)
    }
}
