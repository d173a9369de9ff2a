//! Replay driver.
//!
//! The [`Replayer`] walks a [`Program`] in order and routes every instruction
//! by category: Normal instructions go to [`Instruction::execute`], Event
//! instructions go to the [`EventDisplay`]. Neither side ever sees the other
//! category.

use hexkit_world::WorldState;

use crate::display::EventDisplay;
use crate::error::ReplayError;
use crate::program::Program;

/// What the driver does when an instruction is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidCommandPolicy {
    /// Stop and return the error. The world keeps the effects of every
    /// instruction before the rejected one.
    #[default]
    Abort,
    /// Log a warning, count the instruction as skipped and continue.
    Skip,
}

/// Replay configuration.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Handling of invalid commands
    pub on_invalid_command: InvalidCommandPolicy,
    /// Whether event instructions reach the display; counted either way
    pub display_events: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            on_invalid_command: InvalidCommandPolicy::Abort,
            display_events: true,
        }
    }
}

impl ReplayConfig {
    /// Configuration that skips invalid commands instead of aborting.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            on_invalid_command: InvalidCommandPolicy::Skip,
            ..Self::default()
        }
    }
}

/// Counters collected during a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Normal instructions executed without error
    pub executed: usize,
    /// Executed instructions that changed the world
    pub changed: usize,
    /// Event instructions encountered
    pub events: usize,
    /// Instructions skipped under [`InvalidCommandPolicy::Skip`]
    pub skipped: usize,
}

impl ReplayStats {
    /// Adds the counters of another replay.
    pub fn merge(&mut self, other: &Self) {
        self.executed += other.executed;
        self.changed += other.changed;
        self.events += other.events;
        self.skipped += other.skipped;
    }
}

/// Replays programs against a world.
#[derive(Debug, Clone, Default)]
pub struct Replayer {
    config: ReplayConfig,
}

impl Replayer {
    /// Creates a driver with the given configuration.
    #[must_use]
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Replays `program` against `world`.
    ///
    /// # Errors
    ///
    /// Under [`InvalidCommandPolicy::Abort`], the first rejected instruction
    /// with its index. Instructions before it stay applied.
    pub fn replay(
        &self,
        program: &Program,
        world: &mut WorldState,
        display: &mut dyn EventDisplay,
    ) -> Result<ReplayStats, ReplayError> {
        let mut stats = ReplayStats::default();

        for (index, instruction) in program.iter().enumerate() {
            if instruction.is_event() {
                stats.events += 1;
                if self.config.display_events {
                    display.show(instruction);
                }
                continue;
            }

            match instruction.execute(world, None) {
                Ok(changed) => {
                    stats.executed += 1;
                    if changed {
                        stats.changed += 1;
                    }
                }
                Err(source) => match self.config.on_invalid_command {
                    InvalidCommandPolicy::Abort => {
                        return Err(ReplayError::Instruction { index, source });
                    }
                    InvalidCommandPolicy::Skip => {
                        tracing::warn!(index, error = %source, "skipping invalid instruction");
                        stats.skipped += 1;
                    }
                },
            }
        }

        tracing::info!(
            instructions = program.len(),
            executed = stats.executed,
            changed = stats.changed,
            events = stats.events,
            skipped = stats.skipped,
            "program replayed"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{EventRecorder, NullDisplay};
    use crate::error::InvalidCommandKind;
    use crate::payload::{IdArgs, TextArgs};
    use crate::tests::helpers::{test_world, RED};
    use crate::Instruction;

    fn mixed_program() -> Program {
        Program::from_iter([
            Instruction::CreateEntity(TextArgs::new("unit-scout", "scout")),
            Instruction::SelectEntity(IdArgs::new("scout")),
            Instruction::SetEntityOwner(TextArgs::new("scout", RED)),
            Instruction::SetEntityOwner(TextArgs::new("scout", RED)),
        ])
    }

    mod routing_tests {
        use super::*;

        #[test]
        fn events_reach_only_the_display() {
            let mut world = test_world();
            let mut recorder = EventRecorder::new();
            let stats = Replayer::default()
                .replay(&mixed_program(), &mut world, &mut recorder)
                .unwrap();
            assert_eq!(
                stats,
                ReplayStats {
                    executed: 3,
                    changed: 2,
                    events: 1,
                    skipped: 0
                }
            );
            let events = recorder.take_events();
            assert_eq!(events.len(), 1);
            assert!(events.iter().all(Instruction::is_event));
        }

        #[test]
        fn events_can_be_suppressed() {
            let mut world = test_world();
            let mut recorder = EventRecorder::new();
            let config = ReplayConfig {
                display_events: false,
                ..ReplayConfig::default()
            };
            let stats = Replayer::new(config)
                .replay(&mixed_program(), &mut world, &mut recorder)
                .unwrap();
            assert_eq!(stats.events, 1);
            assert!(recorder.events().is_empty());
        }
    }

    mod policy_tests {
        use super::*;

        fn broken_program() -> Program {
            Program::from_iter([
                Instruction::CreateEntity(TextArgs::new("unit-scout", "scout")),
                Instruction::DeleteEntity(IdArgs::new("ghost")),
                Instruction::SetEntityOwner(TextArgs::new("scout", RED)),
            ])
        }

        #[test]
        fn abort_reports_index() {
            let mut world = test_world();
            let err = Replayer::default()
                .replay(&broken_program(), &mut world, &mut NullDisplay)
                .unwrap_err();
            assert_eq!(err.index(), 1);
            assert_eq!(err.invalid_command().kind(), InvalidCommandKind::EntityInvalid);
            assert!(world.entity("scout").unwrap().owner().is_none());
        }

        #[test]
        fn skip_continues() {
            let mut world = test_world();
            let stats = Replayer::new(ReplayConfig::lenient())
                .replay(&broken_program(), &mut world, &mut NullDisplay)
                .unwrap();
            assert_eq!(stats.skipped, 1);
            assert_eq!(stats.changed, 2);
            assert_eq!(world.entity("scout").unwrap().owner().unwrap().as_str(), RED);
        }
    }
}
