//! # Hexkit HCL
//!
//! The Hexkit Command Language: deterministic, serializable instructions that
//! encode every effect of a command on a [`WorldState`](hexkit_world::WorldState).
//!
//! ## Architecture
//!
//! - **Instructions**: one sum type, [`Instruction`], with a payload struct per
//!   shape and an explicit tag registry ([`InstructionKind`])
//! - **Execution**: [`Instruction::execute`] resolves identifiers, short-circuits
//!   no-ops, brackets modifier-map influence and records history
//! - **Programs**: [`Program`] records effectful instructions; [`CommandLog`]
//!   persists them per command
//! - **Replay**: [`Replayer`] routes Normal instructions to the world and Event
//!   instructions to an [`EventDisplay`]
//! - **Wire format**: XML, one element per instruction ([`codec`])
//!
//! ## Determinism
//!
//! Replaying the same program against equal initial worlds yields equal worlds.
//! Instructions reference entities, factions and classes by identifier only, and
//! the world assigns new entity identifiers from its own counter.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use hexkit_hcl::{IdArgs, Instruction, NullDisplay, Program, Replayer};
//! use hexkit_world::{DefaultRules, FactionClass, Scenario, WorldState};
//!
//! let scenario = Scenario::new(4, 4).with_faction_class(FactionClass::new("f1"));
//! let mut world = WorldState::new(Arc::new(scenario), Arc::new(DefaultRules));
//!
//! let program = Program::from_xml("<program><CreateFaction id=\"f1\"/><AdvanceFaction/></program>")?;
//! let stats = Replayer::default().replay(&program, &mut world, &mut NullDisplay)?;
//! assert_eq!(stats.changed, 2);
//! assert_eq!(world.turn(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod category;
pub mod codec;
pub mod context;
pub mod display;
pub mod error;
mod exec;
pub mod instruction;
pub mod log;
pub mod payload;
pub mod program;
pub mod replay;
pub mod resolve;
pub mod results;
pub mod xml;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use category::InstructionCategory;
pub use context::{execute_command, CommandContext};
pub use display::{EventDisplay, EventRecorder, NullDisplay};
pub use error::{CodecError, InvalidCommand, InvalidCommandKind, ReplayError};
pub use instruction::{Instruction, InstructionKind};
pub use log::{CommandLog, CommandRecord};
pub use payload::{
    FlagArgs, IdArgs, ImageArgs, MessageArgs, ModifierArgs, PointArgs, TextArgs, TextFlagArgs,
    TextValueArgs, ValueArgs,
};
pub use program::Program;
pub use replay::{InvalidCommandPolicy, ReplayConfig, ReplayStats, Replayer};
pub use results::InstructionResults;
