//! Command execution with all-or-nothing semantics.
//!
//! Command logic emits instructions through a [`CommandContext`]. The context
//! works on a private copy of the world; [`execute_command`] swaps the copy in
//! only if the logic returns `Ok`, so a failing command leaves no trace.

use hexkit_world::WorldState;

use crate::error::InvalidCommand;
use crate::instruction::Instruction;
use crate::program::Program;
use crate::results::InstructionResults;

/// Handle through which command logic reads the world and emits instructions.
#[derive(Debug)]
pub struct CommandContext<'w> {
    world: &'w mut WorldState,
    program: Program,
}

impl<'w> CommandContext<'w> {
    fn new(world: &'w mut WorldState) -> Self {
        Self {
            world,
            program: Program::new(),
        }
    }

    /// Returns the world as changed by the instructions emitted so far.
    #[must_use]
    pub fn world(&self) -> &WorldState {
        self.world
    }

    /// Returns the instructions recorded so far.
    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Executes and records an instruction. Returns whether the world changed.
    ///
    /// # Errors
    ///
    /// The instruction's [`InvalidCommand`].
    pub fn emit(&mut self, instruction: Instruction) -> Result<bool, InvalidCommand> {
        self.program.record(instruction, self.world, None)
    }

    /// Like [`emit`](Self::emit), and also returns the results bag.
    ///
    /// The bag is empty for no-ops and events.
    ///
    /// # Errors
    ///
    /// The instruction's [`InvalidCommand`].
    pub fn emit_with_results(
        &mut self,
        instruction: Instruction,
    ) -> Result<InstructionResults, InvalidCommand> {
        let mut results = InstructionResults::new();
        self.program
            .record(instruction, self.world, Some(&mut results))?;
        Ok(results)
    }

    fn into_program(self) -> Program {
        self.program
    }
}

/// Runs command logic atomically and returns the recorded program.
///
/// `command` runs against a copy of `world`. On success the copy replaces
/// `world`; on failure `world` is untouched and the error is returned.
///
/// # Errors
///
/// Whatever `command` returns. Instruction errors convert through `From`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use hexkit_hcl::{execute_command, IdArgs, Instruction, InvalidCommand};
/// use hexkit_world::{DefaultRules, FactionClass, Scenario, WorldState};
///
/// let scenario = Scenario::new(2, 2).with_faction_class(FactionClass::new("faction-red"));
/// let mut world = WorldState::new(Arc::new(scenario), Arc::new(DefaultRules));
///
/// let program = execute_command(&mut world, |ctx| -> Result<(), InvalidCommand> {
///     ctx.emit(Instruction::CreateFaction(IdArgs::new("faction-red")))?;
///     Ok(())
/// })
/// .unwrap();
/// assert_eq!(program.len(), 1);
/// assert!(world.faction("faction-red").is_some());
/// ```
pub fn execute_command<F, E>(world: &mut WorldState, command: F) -> Result<Program, E>
where
    F: FnOnce(&mut CommandContext<'_>) -> Result<(), E>,
    E: From<InvalidCommand>,
{
    let mut scratch = world.clone();
    let program = {
        let mut context = CommandContext::new(&mut scratch);
        command(&mut context)?;
        context.into_program()
    };
    *world = scratch;
    tracing::debug!(instructions = program.len(), "command committed");
    Ok(program)
}
