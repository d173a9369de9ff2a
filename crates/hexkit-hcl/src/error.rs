//! Error types of the instruction engine.
//!
//! - [`InvalidCommand`]: an instruction referenced data the world does not hold.
//!   Raised before any mutation, so the world is unchanged when it surfaces.
//! - [`CodecError`]: the XML wire format could not be read or written.
//! - [`ReplayError`]: a replay stopped on an invalid command.

use std::fmt;

use hexkit_world::VariableCategory;
use thiserror::Error;

/// Kind of an [`InvalidCommand`], for callers that branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidCommandKind {
    /// A required identifier was empty
    IdentifierEmpty,
    /// No such entity, or an entity of the wrong category
    EntityInvalid,
    /// No such faction, or the faction already exists
    FactionInvalid,
    /// Location is not on the map
    SiteInvalid,
    /// No such class, or a class of the wrong category
    ClassInvalid,
    /// No such variable
    VariableInvalid,
    /// The variable's category is not supported by the instruction
    VariableCategoryInvalid,
    /// A value that must not be negative was negative
    ValueNegative,
}

impl fmt::Display for InvalidCommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IdentifierEmpty => "IdentifierEmpty",
            Self::EntityInvalid => "EntityInvalid",
            Self::FactionInvalid => "FactionInvalid",
            Self::SiteInvalid => "SiteInvalid",
            Self::ClassInvalid => "ClassInvalid",
            Self::VariableInvalid => "VariableInvalid",
            Self::VariableCategoryInvalid => "VariableCategoryInvalid",
            Self::ValueNegative => "ValueNegative",
        };
        f.write_str(name)
    }
}

/// An instruction could not be executed against the given world.
///
/// Every variant carries the display name of the failing instruction and the
/// offending identifier so the user interface can describe the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCommand {
    /// A required identifier was empty.
    #[error("instruction {instruction} requires a non-empty identifier")]
    IdentifierEmpty {
        /// Display name of the instruction
        instruction: &'static str,
        /// The empty identifier
        id: String,
    },
    /// An entity identifier did not resolve.
    #[error("instruction {instruction} specifies invalid entity \"{id}\"")]
    EntityInvalid {
        /// Display name of the instruction
        instruction: &'static str,
        /// Offending identifier
        id: String,
    },
    /// A faction identifier did not resolve.
    #[error("instruction {instruction} specifies invalid faction \"{id}\"")]
    FactionInvalid {
        /// Display name of the instruction
        instruction: &'static str,
        /// Offending identifier
        id: String,
    },
    /// A location is not on the map.
    #[error("instruction {instruction} specifies invalid site {id}")]
    SiteInvalid {
        /// Display name of the instruction
        instruction: &'static str,
        /// Offending location, formatted as `(x, y)`
        id: String,
    },
    /// A class identifier did not resolve.
    #[error("instruction {instruction} specifies invalid class \"{id}\"")]
    ClassInvalid {
        /// Display name of the instruction
        instruction: &'static str,
        /// Offending identifier
        id: String,
    },
    /// A variable identifier did not resolve.
    #[error("instruction {instruction} specifies invalid variable \"{id}\"")]
    VariableInvalid {
        /// Display name of the instruction
        instruction: &'static str,
        /// Offending identifier
        id: String,
    },
    /// The variable has a category the instruction does not support.
    #[error("instruction {instruction} does not support {category} variable \"{id}\"")]
    VariableCategoryInvalid {
        /// Display name of the instruction
        instruction: &'static str,
        /// Offending variable identifier
        id: String,
        /// Category of the variable
        category: VariableCategory,
    },
    /// A value that must not be negative was negative.
    #[error("instruction {instruction} specifies negative value {value} for \"{id}\"")]
    ValueNegative {
        /// Display name of the instruction
        instruction: &'static str,
        /// Identifier of the instruction's subject
        id: String,
        /// Offending value
        value: i32,
    },
}

impl InvalidCommand {
    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> InvalidCommandKind {
        match self {
            Self::IdentifierEmpty { .. } => InvalidCommandKind::IdentifierEmpty,
            Self::EntityInvalid { .. } => InvalidCommandKind::EntityInvalid,
            Self::FactionInvalid { .. } => InvalidCommandKind::FactionInvalid,
            Self::SiteInvalid { .. } => InvalidCommandKind::SiteInvalid,
            Self::ClassInvalid { .. } => InvalidCommandKind::ClassInvalid,
            Self::VariableInvalid { .. } => InvalidCommandKind::VariableInvalid,
            Self::VariableCategoryInvalid { .. } => InvalidCommandKind::VariableCategoryInvalid,
            Self::ValueNegative { .. } => InvalidCommandKind::ValueNegative,
        }
    }

    /// Returns the display name of the failing instruction.
    #[must_use]
    pub const fn instruction(&self) -> &'static str {
        match self {
            Self::IdentifierEmpty { instruction, .. }
            | Self::EntityInvalid { instruction, .. }
            | Self::FactionInvalid { instruction, .. }
            | Self::SiteInvalid { instruction, .. }
            | Self::ClassInvalid { instruction, .. }
            | Self::VariableInvalid { instruction, .. }
            | Self::VariableCategoryInvalid { instruction, .. }
            | Self::ValueNegative { instruction, .. } => *instruction,
        }
    }

    /// Returns the offending identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::IdentifierEmpty { id, .. }
            | Self::EntityInvalid { id, .. }
            | Self::FactionInvalid { id, .. }
            | Self::SiteInvalid { id, .. }
            | Self::ClassInvalid { id, .. }
            | Self::VariableInvalid { id, .. }
            | Self::VariableCategoryInvalid { id, .. }
            | Self::ValueNegative { id, .. } => id,
        }
    }
}

/// The XML wire format could not be read or written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(String),
    /// The document has no root element.
    #[error("document contains no element")]
    Empty,
    /// An element tag names no known instruction.
    #[error("unknown instruction <{0}>")]
    UnknownInstruction(String),
    /// An element other than the expected one was found.
    #[error("expected <{expected}>, found <{found}>")]
    UnexpectedElement {
        /// Expected tag
        expected: &'static str,
        /// Tag that was found
        found: String,
    },
    /// A required attribute is missing.
    #[error("<{element}> is missing attribute \"{attribute}\"")]
    MissingAttribute {
        /// Element tag
        element: String,
        /// Attribute name
        attribute: &'static str,
    },
    /// An attribute value could not be parsed.
    #[error("<{element}> has invalid {attribute}=\"{value}\"")]
    InvalidAttribute {
        /// Element tag
        element: String,
        /// Attribute name
        attribute: &'static str,
        /// Raw attribute value
        value: String,
    },
}

/// A replay stopped on an invalid command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// An instruction of a program was rejected.
    #[error("instruction {index} rejected: {source}")]
    Instruction {
        /// Zero-based index of the instruction in its program
        index: usize,
        /// The rejection
        source: InvalidCommand,
    },
    /// An instruction inside a logged command was rejected.
    #[error("command {command} ({name}) rejected at instruction {index}: {source}")]
    Command {
        /// Zero-based index of the command in the log
        command: usize,
        /// Name of the command
        name: String,
        /// Zero-based index of the instruction in the command's program
        index: usize,
        /// The rejection
        source: InvalidCommand,
    },
}

impl ReplayError {
    /// Returns the index of the rejected instruction within its program.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Instruction { index, .. } | Self::Command { index, .. } => *index,
        }
    }

    /// Returns the underlying rejection.
    #[must_use]
    pub const fn invalid_command(&self) -> &InvalidCommand {
        match self {
            Self::Instruction { source, .. } | Self::Command { source, .. } => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_report_name_and_identifier() {
        let err = InvalidCommand::EntityInvalid {
            instruction: "SetEntityOwner",
            id: "entity-42".to_string(),
        };
        assert_eq!(err.kind(), InvalidCommandKind::EntityInvalid);
        assert_eq!(err.instruction(), "SetEntityOwner");
        assert_eq!(err.identifier(), "entity-42");
        assert_eq!(
            err.to_string(),
            "instruction SetEntityOwner specifies invalid entity \"entity-42\""
        );
    }

    #[test]
    fn category_error_names_category() {
        let err = InvalidCommand::VariableCategoryInvalid {
            instruction: "SetFactionVariableModifier",
            id: "score".to_string(),
            category: VariableCategory::Counter,
        };
        assert!(err.to_string().contains("Counter"));
        assert_eq!(err.kind().to_string(), "VariableCategoryInvalid");
    }

    #[test]
    fn replay_error_exposes_source() {
        let source = InvalidCommand::IdentifierEmpty {
            instruction: "DeleteEntity",
            id: String::new(),
        };
        let err = ReplayError::Instruction {
            index: 3,
            source: source.clone(),
        };
        assert_eq!(err.index(), 3);
        assert_eq!(err.invalid_command(), &source);
        assert!(std::error::Error::source(&err).is_some());
    }
}
