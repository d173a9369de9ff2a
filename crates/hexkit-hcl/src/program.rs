//! Ordered instruction programs.
//!
//! A [`Program`] is the persisted effect of one command: the instructions it
//! emitted, in order. Recording through [`Program::record`] keeps only Normal
//! instructions that changed the world, together with every Event instruction,
//! so replaying a recorded program never executes a no-op.

use hexkit_world::WorldState;

use crate::codec;
use crate::error::{CodecError, InvalidCommand, ReplayError};
use crate::instruction::Instruction;
use crate::results::InstructionResults;
use crate::xml::{self, XmlElement};

const PROGRAM_TAG: &str = "program";

/// An ordered sequence of instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Creates an empty program.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the program holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the instructions in program order.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterates over the instructions in program order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Appends an instruction without executing it.
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Executes `instruction` and appends it if it belongs in the log.
    ///
    /// Event instructions are appended unexecuted. Normal instructions are
    /// appended only if they changed the world. Returns whether the world
    /// changed.
    ///
    /// # Errors
    ///
    /// The instruction's [`InvalidCommand`]; nothing is appended then.
    pub fn record(
        &mut self,
        instruction: Instruction,
        world: &mut WorldState,
        results: Option<&mut InstructionResults>,
    ) -> Result<bool, InvalidCommand> {
        if instruction.is_event() {
            self.instructions.push(instruction);
            return Ok(false);
        }
        let changed = instruction.execute(world, results)?;
        if changed {
            self.instructions.push(instruction);
        }
        Ok(changed)
    }

    /// Returns a copy without the Normal instructions that have no effect when
    /// replayed from `initial`.
    ///
    /// `initial` itself is not modified.
    ///
    /// # Errors
    ///
    /// The first rejected instruction and its index.
    pub fn prune(&self, initial: &WorldState) -> Result<Self, ReplayError> {
        let mut world = initial.clone();
        let mut pruned = Self::new();
        for (index, instruction) in self.iter().enumerate() {
            if instruction.is_event() {
                pruned.push(instruction.clone());
                continue;
            }
            let changed = instruction
                .execute(&mut world, None)
                .map_err(|source| ReplayError::Instruction { index, source })?;
            if changed {
                pruned.push(instruction.clone());
            } else {
                tracing::trace!(index, instruction = %instruction, "pruned no-op");
            }
        }
        Ok(pruned)
    }

    /// Builds a `<program>` element.
    #[must_use]
    pub fn to_element(&self) -> XmlElement {
        self.to_element_named(PROGRAM_TAG)
    }

    pub(crate) fn to_element_named(&self, name: &str) -> XmlElement {
        let mut element = XmlElement::new(name);
        element.children = self.iter().map(codec::to_element).collect();
        element
    }

    /// Reads a `<program>` element.
    ///
    /// # Errors
    ///
    /// `UnexpectedElement` for another tag, or any instruction error.
    pub fn from_element(element: &XmlElement) -> Result<Self, CodecError> {
        element.expect_name(PROGRAM_TAG)?;
        Self::from_children(element)
    }

    pub(crate) fn from_children(element: &XmlElement) -> Result<Self, CodecError> {
        element
            .children
            .iter()
            .map(codec::from_element)
            .collect::<Result<Vec<_>, _>>()
            .map(|instructions| Self { instructions })
    }

    /// Serializes the program as a `<program>` document.
    ///
    /// # Errors
    ///
    /// `Xml` if the writer fails.
    pub fn to_xml(&self) -> Result<String, CodecError> {
        xml::write(&self.to_element())
    }

    /// Parses a `<program>` document.
    ///
    /// # Errors
    ///
    /// Any [`CodecError`].
    pub fn from_xml(document: &str) -> Result<Self, CodecError> {
        Self::from_element(&xml::parse(document)?)
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Program {
    type Item = Instruction;
    type IntoIter = std::vec::IntoIter<Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.into_iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Instruction> for Program {
    fn extend<I: IntoIterator<Item = Instruction>>(&mut self, iter: I) {
        self.instructions.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{IdArgs, PointArgs, TextArgs};
    use crate::tests::helpers::{test_world, BLUE, RED};
    use hexkit_world::{hash_world, Point};

    mod record_tests {
        use super::*;

        #[test]
        fn no_ops_are_not_recorded() {
            let mut world = test_world();
            let mut program = Program::new();
            let owner = Instruction::SetSiteOwner(PointArgs::new(RED, Point::new(0, 0)));
            assert!(program.record(owner.clone(), &mut world, None).unwrap());
            assert!(!program.record(owner, &mut world, None).unwrap());
            assert_eq!(program.len(), 1);
        }

        #[test]
        fn events_are_recorded_unexecuted() {
            let mut world = test_world();
            let before = world.clone();
            let mut program = Program::new();
            assert!(!program
                .record(
                    Instruction::SelectEntity(IdArgs::new("anything")),
                    &mut world,
                    None
                )
                .unwrap());
            assert_eq!(program.len(), 1);
            assert_eq!(world, before);
        }

        #[test]
        fn rejected_instruction_is_not_recorded() {
            let mut world = test_world();
            let mut program = Program::new();
            assert!(program
                .record(
                    Instruction::DeleteFaction(IdArgs::new("faction-green")),
                    &mut world,
                    None
                )
                .is_err());
            assert!(program.is_empty());
        }
    }

    mod prune_tests {
        use super::*;

        #[test]
        fn prune_preserves_replay_result() {
            let initial = test_world();
            let program = Program::from_iter([
                Instruction::CreateEntity(TextArgs::new("unit-scout", "scout")),
                Instruction::SetEntityOwner(TextArgs::new("scout", BLUE)),
                Instruction::SetEntityOwner(TextArgs::new("scout", BLUE)),
                Instruction::SelectEntity(IdArgs::new("scout")),
                Instruction::SetEntityName(TextArgs::new("scout", "")),
            ]);
            let pruned = program.prune(&initial).unwrap();
            assert_eq!(pruned.len(), 3);
            assert!(pruned.instructions()[2].is_event());

            let mut full = initial.clone();
            for instruction in &program {
                instruction.execute(&mut full, None).unwrap();
            }
            let mut short = initial.clone();
            for instruction in &pruned {
                instruction.execute(&mut short, None).unwrap();
            }
            assert_eq!(hash_world(&full), hash_world(&short));
        }

        #[test]
        fn prune_reports_failing_index() {
            let program = Program::from_iter([
                Instruction::AdvanceFaction(IdArgs::default()),
                Instruction::DeleteEntity(IdArgs::new("ghost")),
            ]);
            let err = program.prune(&test_world()).unwrap_err();
            assert_eq!(err.index(), 1);
        }
    }

    mod xml_tests {
        use super::*;

        #[test]
        fn program_document() {
            let program = Program::from_iter([
                Instruction::CreateFaction(IdArgs::new("faction-green")),
                Instruction::AdvanceFaction(IdArgs::default()),
            ]);
            let xml = program.to_xml().unwrap();
            assert_eq!(
                xml,
                "<program>\n  <CreateFaction id=\"faction-green\"/>\n  <AdvanceFaction/>\n</program>"
            );
            assert_eq!(Program::from_xml(&xml).unwrap(), program);
        }

        #[test]
        fn empty_program_document() {
            assert_eq!(Program::new().to_xml().unwrap(), "<program/>");
            assert!(Program::from_xml("<program></program>").unwrap().is_empty());
        }

        #[test]
        fn wrong_root_is_rejected() {
            let err = Program::from_xml("<commands/>").unwrap_err();
            assert!(matches!(err, CodecError::UnexpectedElement { .. }));
        }
    }
}
