//! The instruction sum type and its tag registry.
//!
//! An [`Instruction`] is one atomic, replayable unit of a command's effect.
//! Each variant carries only the payload it needs; [`InstructionKind`] is the
//! fieldless mirror used for routing and as the explicit registry between
//! variants and wire tags.
//!
//! # Example
//!
//! ```
//! use hexkit_hcl::{IdArgs, Instruction, InstructionCategory, InstructionKind, TextArgs};
//!
//! let owner = Instruction::SetEntityOwner(TextArgs::new("unit-1", "red"));
//! assert_eq!(owner.name(), "SetEntityOwner");
//! assert_eq!(owner.id(), "unit-1");
//! assert_eq!(owner.category(), InstructionCategory::Normal);
//!
//! let select = Instruction::SelectEntity(IdArgs::new("unit-1"));
//! assert!(select.is_event());
//! assert_eq!(InstructionKind::from_tag("SelectEntity"), Some(InstructionKind::SelectEntity));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::InstructionCategory;
use crate::payload::{
    FlagArgs, IdArgs, ImageArgs, MessageArgs, ModifierArgs, PointArgs, TextArgs, TextFlagArgs,
    TextValueArgs, ValueArgs,
};

/// One HCL instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Ends the active faction's activation
    AdvanceFaction(IdArgs),
    /// Creates an entity; `id` is the class, `text` an explicit entity id or empty
    CreateEntity(TextArgs),
    /// Creates a faction from the faction class `id`
    CreateFaction(IdArgs),
    /// Deletes an entity
    DeleteEntity(IdArgs),
    /// Removes a faction from the game
    DeleteFaction(IdArgs),
    /// Moves an entity to the top of its site's stack
    MoveEntityToTop(IdArgs),
    /// Changes an entity's class
    SetEntityClass(TextArgs),
    /// Changes or clears an entity's display class
    SetEntityDisplayClass(TextArgs),
    /// Sets an entity's animation frame offset
    SetEntityFrameOffset(ValueArgs),
    /// Sets or clears an entity's custom name
    SetEntityName(TextArgs),
    /// Changes or clears an entity's owner
    SetEntityOwner(TextArgs),
    /// Moves an entity to a site, or off the map
    SetEntitySite(PointArgs),
    /// Sets an entity attribute or resource
    SetEntityVariable(TextValueArgs),
    /// Sets an entity modifier
    SetEntityVariableModifier(ModifierArgs),
    /// Sets or clears a string flag on an entity
    SetEntityFlag(TextFlagArgs),
    /// Allows or forbids a unit to attack
    SetUnitCanAttack(FlagArgs),
    /// Allows or forbids a unit to move
    SetUnitCanMove(FlagArgs),
    /// Sets a faction counter or resource
    SetFactionVariable(TextValueArgs),
    /// Sets a faction resource modifier
    SetFactionVariableModifier(TextValueArgs),
    /// Changes or clears a site's owner; `id` is the faction
    SetSiteOwner(PointArgs),
    /// Declares the winning faction
    SetWinningFaction(IdArgs),
    /// Selects an entity in the display
    SelectEntity(IdArgs),
    /// Shows an image on a sequence of sites
    ShowImage(ImageArgs),
    /// Moves an image along a sequence of sites
    MoveImage(ImageArgs),
    /// Shows a message in the event log
    ShowMessage(MessageArgs),
    /// Shows a message in a modal dialog
    ShowMessageDialog(MessageArgs),
}

/// Fieldless discriminant of [`Instruction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum InstructionKind {
    AdvanceFaction,
    CreateEntity,
    CreateFaction,
    DeleteEntity,
    DeleteFaction,
    MoveEntityToTop,
    SetEntityClass,
    SetEntityDisplayClass,
    SetEntityFrameOffset,
    SetEntityName,
    SetEntityOwner,
    SetEntitySite,
    SetEntityVariable,
    SetEntityVariableModifier,
    SetEntityFlag,
    SetUnitCanAttack,
    SetUnitCanMove,
    SetFactionVariable,
    SetFactionVariableModifier,
    SetSiteOwner,
    SetWinningFaction,
    SelectEntity,
    ShowImage,
    MoveImage,
    ShowMessage,
    ShowMessageDialog,
}

/// Tag registry: every kind with its wire tag.
const REGISTRY: [(InstructionKind, &str); 26] = [
    (InstructionKind::AdvanceFaction, "AdvanceFaction"),
    (InstructionKind::CreateEntity, "CreateEntity"),
    (InstructionKind::CreateFaction, "CreateFaction"),
    (InstructionKind::DeleteEntity, "DeleteEntity"),
    (InstructionKind::DeleteFaction, "DeleteFaction"),
    (InstructionKind::MoveEntityToTop, "MoveEntityToTop"),
    (InstructionKind::SetEntityClass, "SetEntityClass"),
    (InstructionKind::SetEntityDisplayClass, "SetEntityDisplayClass"),
    (InstructionKind::SetEntityFrameOffset, "SetEntityFrameOffset"),
    (InstructionKind::SetEntityName, "SetEntityName"),
    (InstructionKind::SetEntityOwner, "SetEntityOwner"),
    (InstructionKind::SetEntitySite, "SetEntitySite"),
    (InstructionKind::SetEntityVariable, "SetEntityVariable"),
    (InstructionKind::SetEntityVariableModifier, "SetEntityVariableModifier"),
    (InstructionKind::SetEntityFlag, "SetEntityFlag"),
    (InstructionKind::SetUnitCanAttack, "SetUnitCanAttack"),
    (InstructionKind::SetUnitCanMove, "SetUnitCanMove"),
    (InstructionKind::SetFactionVariable, "SetFactionVariable"),
    (InstructionKind::SetFactionVariableModifier, "SetFactionVariableModifier"),
    (InstructionKind::SetSiteOwner, "SetSiteOwner"),
    (InstructionKind::SetWinningFaction, "SetWinningFaction"),
    (InstructionKind::SelectEntity, "SelectEntity"),
    (InstructionKind::ShowImage, "ShowImage"),
    (InstructionKind::MoveImage, "MoveImage"),
    (InstructionKind::ShowMessage, "ShowMessage"),
    (InstructionKind::ShowMessageDialog, "ShowMessageDialog"),
];

impl InstructionKind {
    /// Every kind, in registry order.
    pub const ALL: [Self; 26] = {
        let mut all = [Self::AdvanceFaction; 26];
        let mut i = 0;
        while i < REGISTRY.len() {
            all[i] = REGISTRY[i].0;
            i += 1;
        }
        all
    };

    /// Returns the wire tag, which is also the display name.
    #[must_use]
    pub fn tag(self) -> &'static str {
        REGISTRY
            .iter()
            .find(|(kind, _)| *kind == self)
            .map_or("", |(_, tag)| *tag)
    }

    /// Looks up a kind by wire tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|(_, name)| *name == tag)
            .map(|(kind, _)| *kind)
    }

    /// Returns the category shared by all instructions of this kind.
    #[must_use]
    pub const fn category(self) -> InstructionCategory {
        match self {
            Self::SelectEntity
            | Self::ShowImage
            | Self::MoveImage
            | Self::ShowMessage
            | Self::ShowMessageDialog => InstructionCategory::Event,
            _ => InstructionCategory::Normal,
        }
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Instruction {
    /// Returns the kind of this instruction.
    #[must_use]
    pub const fn kind(&self) -> InstructionKind {
        match self {
            Self::AdvanceFaction(_) => InstructionKind::AdvanceFaction,
            Self::CreateEntity(_) => InstructionKind::CreateEntity,
            Self::CreateFaction(_) => InstructionKind::CreateFaction,
            Self::DeleteEntity(_) => InstructionKind::DeleteEntity,
            Self::DeleteFaction(_) => InstructionKind::DeleteFaction,
            Self::MoveEntityToTop(_) => InstructionKind::MoveEntityToTop,
            Self::SetEntityClass(_) => InstructionKind::SetEntityClass,
            Self::SetEntityDisplayClass(_) => InstructionKind::SetEntityDisplayClass,
            Self::SetEntityFrameOffset(_) => InstructionKind::SetEntityFrameOffset,
            Self::SetEntityName(_) => InstructionKind::SetEntityName,
            Self::SetEntityOwner(_) => InstructionKind::SetEntityOwner,
            Self::SetEntitySite(_) => InstructionKind::SetEntitySite,
            Self::SetEntityVariable(_) => InstructionKind::SetEntityVariable,
            Self::SetEntityVariableModifier(_) => InstructionKind::SetEntityVariableModifier,
            Self::SetEntityFlag(_) => InstructionKind::SetEntityFlag,
            Self::SetUnitCanAttack(_) => InstructionKind::SetUnitCanAttack,
            Self::SetUnitCanMove(_) => InstructionKind::SetUnitCanMove,
            Self::SetFactionVariable(_) => InstructionKind::SetFactionVariable,
            Self::SetFactionVariableModifier(_) => InstructionKind::SetFactionVariableModifier,
            Self::SetSiteOwner(_) => InstructionKind::SetSiteOwner,
            Self::SetWinningFaction(_) => InstructionKind::SetWinningFaction,
            Self::SelectEntity(_) => InstructionKind::SelectEntity,
            Self::ShowImage(_) => InstructionKind::ShowImage,
            Self::MoveImage(_) => InstructionKind::MoveImage,
            Self::ShowMessage(_) => InstructionKind::ShowMessage,
            Self::ShowMessageDialog(_) => InstructionKind::ShowMessageDialog,
        }
    }

    /// Returns the display name, identical to the wire tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind().tag()
    }

    /// Returns the category of this instruction.
    #[must_use]
    pub const fn category(&self) -> InstructionCategory {
        self.kind().category()
    }

    /// Returns `true` for display-only instructions.
    #[must_use]
    pub const fn is_event(&self) -> bool {
        self.category().is_event()
    }

    /// Returns the primary identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::AdvanceFaction(args)
            | Self::CreateFaction(args)
            | Self::DeleteEntity(args)
            | Self::DeleteFaction(args)
            | Self::MoveEntityToTop(args)
            | Self::SetWinningFaction(args)
            | Self::SelectEntity(args) => &args.id,
            Self::CreateEntity(args)
            | Self::SetEntityClass(args)
            | Self::SetEntityDisplayClass(args)
            | Self::SetEntityName(args)
            | Self::SetEntityOwner(args) => &args.id,
            Self::SetEntityFrameOffset(args) => &args.id,
            Self::SetEntitySite(args) | Self::SetSiteOwner(args) => &args.id,
            Self::SetEntityVariable(args)
            | Self::SetFactionVariable(args)
            | Self::SetFactionVariableModifier(args) => &args.id,
            Self::SetEntityVariableModifier(args) => &args.id,
            Self::SetEntityFlag(args) => &args.id,
            Self::SetUnitCanAttack(args) | Self::SetUnitCanMove(args) => &args.id,
            Self::ShowImage(args) | Self::MoveImage(args) => &args.id,
            Self::ShowMessage(args) | Self::ShowMessageDialog(args) => &args.id,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id().is_empty() {
            f.write_str(self.name())
        } else {
            write!(f, "{}({})", self.name(), self.id())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod registry_tests {
        use super::*;
        use std::collections::BTreeSet;

        #[test]
        fn tags_are_unique_and_round_trip() {
            let tags: BTreeSet<_> = InstructionKind::ALL.iter().map(|k| k.tag()).collect();
            assert_eq!(tags.len(), InstructionKind::ALL.len());
            for kind in InstructionKind::ALL {
                assert!(!kind.tag().is_empty());
                assert_eq!(InstructionKind::from_tag(kind.tag()), Some(kind));
            }
        }

        #[test]
        fn unknown_tag_is_none() {
            assert_eq!(InstructionKind::from_tag("CreateEntityInstruction"), None);
            assert_eq!(InstructionKind::from_tag(""), None);
        }

        #[test]
        fn exactly_five_event_kinds() {
            let events: Vec<_> = InstructionKind::ALL
                .into_iter()
                .filter(|k| k.category().is_event())
                .collect();
            assert_eq!(
                events,
                vec![
                    InstructionKind::SelectEntity,
                    InstructionKind::ShowImage,
                    InstructionKind::MoveImage,
                    InstructionKind::ShowMessage,
                    InstructionKind::ShowMessageDialog,
                ]
            );
        }
    }

    mod accessor_tests {
        use super::*;

        #[test]
        fn kind_name_and_id() {
            let instruction = Instruction::SetEntityFrameOffset(ValueArgs::new("unit-1", 3));
            assert_eq!(instruction.kind(), InstructionKind::SetEntityFrameOffset);
            assert_eq!(instruction.name(), "SetEntityFrameOffset");
            assert_eq!(instruction.id(), "unit-1");
            assert_eq!(instruction.to_string(), "SetEntityFrameOffset(unit-1)");
        }

        #[test]
        fn display_without_id() {
            let instruction = Instruction::AdvanceFaction(IdArgs::default());
            assert_eq!(instruction.to_string(), "AdvanceFaction");
        }

        #[test]
        fn serde_json_round_trip() {
            let instruction = Instruction::SetEntityFlag(TextFlagArgs::new("unit-1", "veteran", true));
            let json = serde_json::to_string(&instruction).unwrap();
            let back: Instruction = serde_json::from_str(&json).unwrap();
            assert_eq!(back, instruction);
        }
    }
}
