//! Command log: the persisted form of a game session.
//!
//! A saved game is its initial world plus a [`CommandLog`]. Each
//! [`CommandRecord`] names the command that produced it, the faction that
//! issued it and the turn, and carries the recorded [`Program`].
//!
//! ```xml
//! <commands>
//!   <command name="Move" faction="faction-red" turn="3">
//!     <SetEntitySite id="unit-1" x="4" y="2"/>
//!   </command>
//! </commands>
//! ```

use hexkit_world::WorldState;

use crate::display::EventDisplay;
use crate::error::{CodecError, ReplayError};
use crate::program::Program;
use crate::replay::{ReplayConfig, ReplayStats, Replayer};
use crate::xml::{self, XmlElement};

const COMMANDS_TAG: &str = "commands";
const COMMAND_TAG: &str = "command";

/// One executed command and its instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRecord {
    /// Command name, e.g. `Move` or `Attack`
    pub name: String,
    /// Issuing faction; empty for automatic commands
    pub faction: String,
    /// Turn in which the command ran
    pub turn: u32,
    /// Recorded instructions
    pub program: Program,
}

impl CommandRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(name: &str, faction: &str, turn: u32, program: Program) -> Self {
        Self {
            name: name.to_string(),
            faction: faction.to_string(),
            turn,
            program,
        }
    }

    fn to_element(&self) -> XmlElement {
        let mut element = self.program.to_element_named(COMMAND_TAG);
        element.set_attr("name", self.name.as_str());
        element.set_attr_nonempty("faction", &self.faction);
        element.set_attr("turn", self.turn.to_string());
        element
    }

    fn from_element(element: &XmlElement) -> Result<Self, CodecError> {
        element.expect_name(COMMAND_TAG)?;
        Ok(Self {
            name: element.attr_or_empty("name").to_string(),
            faction: element.attr_or_empty("faction").to_string(),
            turn: element.u32_attr("turn")?,
            program: Program::from_children(element)?,
        })
    }
}

/// Ordered list of executed commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLog {
    /// Records in execution order
    pub records: Vec<CommandRecord>,
}

impl CommandLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn push(&mut self, record: CommandRecord) {
        self.records.push(record);
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the log holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replays every record in order.
    ///
    /// # Errors
    ///
    /// Under the abort policy, the first rejected instruction with its command
    /// and instruction index.
    pub fn replay(
        &self,
        world: &mut WorldState,
        display: &mut dyn EventDisplay,
        config: &ReplayConfig,
    ) -> Result<ReplayStats, ReplayError> {
        let replayer = Replayer::new(config.clone());
        let mut total = ReplayStats::default();
        for (command, record) in self.records.iter().enumerate() {
            let stats = replayer
                .replay(&record.program, world, display)
                .map_err(|err| ReplayError::Command {
                    command,
                    name: record.name.clone(),
                    index: err.index(),
                    source: err.invalid_command().clone(),
                })?;
            total.merge(&stats);
        }
        tracing::info!(commands = self.records.len(), "command log replayed");
        Ok(total)
    }

    /// Serializes the log as a `<commands>` document.
    ///
    /// # Errors
    ///
    /// `Xml` if the writer fails.
    pub fn to_xml(&self) -> Result<String, CodecError> {
        let mut root = XmlElement::new(COMMANDS_TAG);
        root.children = self.records.iter().map(CommandRecord::to_element).collect();
        xml::write(&root)
    }

    /// Parses a `<commands>` document.
    ///
    /// # Errors
    ///
    /// Any [`CodecError`].
    pub fn from_xml(document: &str) -> Result<Self, CodecError> {
        let root = xml::parse(document)?;
        root.expect_name(COMMANDS_TAG)?;
        let records = root
            .children
            .iter()
            .map(CommandRecord::from_element)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NullDisplay;
    use crate::payload::{IdArgs, PointArgs, TextArgs};
    use crate::tests::helpers::{empty_world, test_world, RED};
    use crate::Instruction;
    use hexkit_world::Point;

    fn sample_log() -> CommandLog {
        let mut log = CommandLog::new();
        log.push(CommandRecord::new(
            "Build",
            RED,
            1,
            Program::from_iter([
                Instruction::CreateEntity(TextArgs::new("unit-scout", "scout")),
                Instruction::SetEntityOwner(TextArgs::new("scout", RED)),
                Instruction::SetEntitySite(PointArgs::new("scout", Point::new(2, 1))),
            ]),
        ));
        log.push(CommandRecord::new(
            "EndTurn",
            RED,
            1,
            Program::from_iter([Instruction::AdvanceFaction(IdArgs::default())]),
        ));
        log
    }

    #[test]
    fn xml_round_trip() {
        let log = sample_log();
        let xml = log.to_xml().unwrap();
        assert!(xml.starts_with("<commands>"));
        assert!(xml.contains(r#"<command name="Build" faction="faction-red" turn="1">"#));
        assert_eq!(CommandLog::from_xml(&xml).unwrap(), log);
    }

    #[test]
    fn turns_keep_their_full_range() {
        let mut log = CommandLog::new();
        for turn in [3_000_000_000, u32::MAX] {
            log.push(CommandRecord::new("Move", "", turn, Program::new()));
        }
        let xml = log.to_xml().unwrap();
        assert!(xml.contains(r#"turn="4294967295""#));
        assert_eq!(CommandLog::from_xml(&xml).unwrap(), log);
    }

    #[test]
    fn negative_turn_is_invalid() {
        let err = CommandLog::from_xml(r#"<commands><command name="x" turn="-1"/></commands>"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidAttribute { attribute: "turn", .. }));
    }

    #[test]
    fn replay_accumulates_stats() {
        let mut world = test_world();
        let stats = sample_log()
            .replay(&mut world, &mut NullDisplay, &ReplayConfig::default())
            .unwrap();
        assert_eq!(stats.changed, 4);
        assert_eq!(world.active_faction_index(), 1);
    }

    #[test]
    fn replay_error_names_the_command() {
        let mut world = empty_world();
        let err = sample_log()
            .replay(&mut world, &mut NullDisplay, &ReplayConfig::default())
            .unwrap_err();
        match err {
            ReplayError::Command {
                command, name, index, ..
            } => {
                assert_eq!(command, 0);
                assert_eq!(name, "Build");
                assert_eq!(index, 1);
            }
            ReplayError::Instruction { .. } => panic!("expected a command error"),
        }
    }
}
