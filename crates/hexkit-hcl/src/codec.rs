//! XML codec for single instructions.
//!
//! Every instruction is one element whose tag is its [`InstructionKind::tag`].
//! Payload attributes are written by the payload structs; this module only
//! routes between tags and variants.
//!
//! ```
//! use hexkit_hcl::codec::{from_xml_str, to_xml_string};
//! use hexkit_hcl::{Instruction, TextArgs};
//!
//! let owner = Instruction::SetEntityOwner(TextArgs::new("unit-1", "faction-red"));
//! let xml = to_xml_string(&owner).unwrap();
//! assert_eq!(xml, r#"<SetEntityOwner id="unit-1" text="faction-red"/>"#);
//! assert_eq!(from_xml_str(&xml).unwrap(), owner);
//! ```

use crate::error::CodecError;
use crate::instruction::{Instruction, InstructionKind};
use crate::payload::{
    FlagArgs, IdArgs, ImageArgs, MessageArgs, ModifierArgs, PointArgs, TextArgs, TextFlagArgs,
    TextValueArgs, ValueArgs,
};
use crate::xml::{self, XmlElement};

const CAN_ATTACK: &str = "canAttack";
const CAN_MOVE: &str = "canMove";

/// Builds the element for one instruction.
#[must_use]
pub fn to_element(instruction: &Instruction) -> XmlElement {
    let mut element = XmlElement::new(instruction.name());
    match instruction {
        Instruction::AdvanceFaction(args)
        | Instruction::CreateFaction(args)
        | Instruction::DeleteEntity(args)
        | Instruction::DeleteFaction(args)
        | Instruction::MoveEntityToTop(args)
        | Instruction::SetWinningFaction(args)
        | Instruction::SelectEntity(args) => args.write(&mut element),
        Instruction::CreateEntity(args)
        | Instruction::SetEntityClass(args)
        | Instruction::SetEntityDisplayClass(args)
        | Instruction::SetEntityName(args)
        | Instruction::SetEntityOwner(args) => args.write(&mut element),
        Instruction::SetEntityFrameOffset(args) => args.write(&mut element),
        Instruction::SetEntitySite(args) | Instruction::SetSiteOwner(args) => {
            args.write(&mut element);
        }
        Instruction::SetEntityVariable(args)
        | Instruction::SetFactionVariable(args)
        | Instruction::SetFactionVariableModifier(args) => args.write(&mut element),
        Instruction::SetEntityVariableModifier(args) => args.write(&mut element),
        Instruction::SetEntityFlag(args) => args.write(&mut element),
        Instruction::SetUnitCanAttack(args) => args.write(&mut element, CAN_ATTACK),
        Instruction::SetUnitCanMove(args) => args.write(&mut element, CAN_MOVE),
        Instruction::ShowImage(args) | Instruction::MoveImage(args) => args.write(&mut element),
        Instruction::ShowMessage(args) | Instruction::ShowMessageDialog(args) => {
            args.write(&mut element);
        }
    }
    element
}

/// Reads one instruction from its element.
///
/// Unknown attributes and child elements are ignored.
///
/// # Errors
///
/// `UnknownInstruction` if the tag is not registered, or an attribute error
/// from the payload.
pub fn from_element(element: &XmlElement) -> Result<Instruction, CodecError> {
    let kind = InstructionKind::from_tag(&element.name)
        .ok_or_else(|| CodecError::UnknownInstruction(element.name.clone()))?;
    let instruction = match kind {
        InstructionKind::AdvanceFaction => Instruction::AdvanceFaction(IdArgs::read(element)?),
        InstructionKind::CreateEntity => Instruction::CreateEntity(TextArgs::read(element)?),
        InstructionKind::CreateFaction => Instruction::CreateFaction(IdArgs::read(element)?),
        InstructionKind::DeleteEntity => Instruction::DeleteEntity(IdArgs::read(element)?),
        InstructionKind::DeleteFaction => Instruction::DeleteFaction(IdArgs::read(element)?),
        InstructionKind::MoveEntityToTop => Instruction::MoveEntityToTop(IdArgs::read(element)?),
        InstructionKind::SetEntityClass => Instruction::SetEntityClass(TextArgs::read(element)?),
        InstructionKind::SetEntityDisplayClass => {
            Instruction::SetEntityDisplayClass(TextArgs::read(element)?)
        }
        InstructionKind::SetEntityFrameOffset => {
            Instruction::SetEntityFrameOffset(ValueArgs::read(element)?)
        }
        InstructionKind::SetEntityName => Instruction::SetEntityName(TextArgs::read(element)?),
        InstructionKind::SetEntityOwner => Instruction::SetEntityOwner(TextArgs::read(element)?),
        InstructionKind::SetEntitySite => Instruction::SetEntitySite(PointArgs::read(element)?),
        InstructionKind::SetEntityVariable => {
            Instruction::SetEntityVariable(TextValueArgs::read(element)?)
        }
        InstructionKind::SetEntityVariableModifier => {
            Instruction::SetEntityVariableModifier(ModifierArgs::read(element)?)
        }
        InstructionKind::SetEntityFlag => {
            Instruction::SetEntityFlag(TextFlagArgs::read(element)?)
        }
        InstructionKind::SetUnitCanAttack => {
            Instruction::SetUnitCanAttack(FlagArgs::read(element, CAN_ATTACK)?)
        }
        InstructionKind::SetUnitCanMove => {
            Instruction::SetUnitCanMove(FlagArgs::read(element, CAN_MOVE)?)
        }
        InstructionKind::SetFactionVariable => {
            Instruction::SetFactionVariable(TextValueArgs::read(element)?)
        }
        InstructionKind::SetFactionVariableModifier => {
            Instruction::SetFactionVariableModifier(TextValueArgs::read(element)?)
        }
        InstructionKind::SetSiteOwner => Instruction::SetSiteOwner(PointArgs::read(element)?),
        InstructionKind::SetWinningFaction => {
            Instruction::SetWinningFaction(IdArgs::read(element)?)
        }
        InstructionKind::SelectEntity => Instruction::SelectEntity(IdArgs::read(element)?),
        InstructionKind::ShowImage => Instruction::ShowImage(ImageArgs::read(element)?),
        InstructionKind::MoveImage => Instruction::MoveImage(ImageArgs::read(element)?),
        InstructionKind::ShowMessage => Instruction::ShowMessage(MessageArgs::read(element)?),
        InstructionKind::ShowMessageDialog => {
            Instruction::ShowMessageDialog(MessageArgs::read(element)?)
        }
    };
    Ok(instruction)
}

/// Serializes one instruction as an XML fragment.
///
/// # Errors
///
/// `Xml` if the writer fails.
pub fn to_xml_string(instruction: &Instruction) -> Result<String, CodecError> {
    xml::write(&to_element(instruction))
}

/// Parses one instruction from an XML fragment.
///
/// # Errors
///
/// Any [`CodecError`].
pub fn from_xml_str(document: &str) -> Result<Instruction, CodecError> {
    from_element(&xml::parse(document)?)
}
