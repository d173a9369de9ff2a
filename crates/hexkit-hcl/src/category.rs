//! Instruction categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification deciding how a program treats an instruction.
///
/// - `Normal`: mutates the world. Executed on replay and pruned from a program
///   when it turns out to have no effect.
/// - `Event`: presentation only. Never executed on replay, never pruned, and
///   routed to the event display instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InstructionCategory {
    /// State-mutating instruction
    #[default]
    Normal,
    /// Display-only instruction
    Event,
}

impl InstructionCategory {
    /// Returns `true` for [`InstructionCategory::Event`].
    #[must_use]
    pub const fn is_event(self) -> bool {
        matches!(self, Self::Event)
    }
}

impl fmt::Display for InstructionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Event => write!(f, "Event"),
        }
    }
}
