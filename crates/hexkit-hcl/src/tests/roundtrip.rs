//! Wire-format round-trip properties.

use hexkit_world::{ModifierTarget, Point};
use proptest::prelude::*;

use crate::codec::{from_xml_str, to_xml_string};
use crate::instruction::{Instruction, InstructionKind};
use crate::payload::{
    FlagArgs, IdArgs, ImageArgs, MessageArgs, ModifierArgs, PointArgs, TextArgs, TextFlagArgs,
    TextValueArgs, ValueArgs,
};
use crate::program::Program;

/// Field values shared by every payload shape.
#[derive(Debug, Clone)]
struct Fields {
    id: String,
    text: String,
    details: String,
    value: i32,
    flag: bool,
    target: ModifierTarget,
    location: Point,
    sites: Vec<Point>,
    delay: i32,
    names: Vec<String>,
}

/// Builds an instruction of `kind` from generated fields.
fn build(kind: InstructionKind, f: Fields) -> Instruction {
    use InstructionKind as K;
    let id = f.id.as_str();
    let text = f.text.as_str();
    match kind {
        K::AdvanceFaction => Instruction::AdvanceFaction(IdArgs::new(id)),
        K::CreateEntity => Instruction::CreateEntity(TextArgs::new(id, text)),
        K::CreateFaction => Instruction::CreateFaction(IdArgs::new(id)),
        K::DeleteEntity => Instruction::DeleteEntity(IdArgs::new(id)),
        K::DeleteFaction => Instruction::DeleteFaction(IdArgs::new(id)),
        K::MoveEntityToTop => Instruction::MoveEntityToTop(IdArgs::new(id)),
        K::SetEntityClass => Instruction::SetEntityClass(TextArgs::new(id, text)),
        K::SetEntityDisplayClass => Instruction::SetEntityDisplayClass(TextArgs::new(id, text)),
        K::SetEntityFrameOffset => Instruction::SetEntityFrameOffset(ValueArgs::new(id, f.value)),
        K::SetEntityName => Instruction::SetEntityName(TextArgs::new(id, text)),
        K::SetEntityOwner => Instruction::SetEntityOwner(TextArgs::new(id, text)),
        K::SetEntitySite => Instruction::SetEntitySite(PointArgs::new(id, f.location)),
        K::SetEntityVariable => {
            Instruction::SetEntityVariable(TextValueArgs::new(id, text, f.value))
        }
        K::SetEntityVariableModifier => Instruction::SetEntityVariableModifier(
            ModifierArgs::new(id, text, f.value, f.target),
        ),
        K::SetEntityFlag => Instruction::SetEntityFlag(TextFlagArgs::new(id, text, f.flag)),
        K::SetUnitCanAttack => Instruction::SetUnitCanAttack(FlagArgs::new(id, f.flag)),
        K::SetUnitCanMove => Instruction::SetUnitCanMove(FlagArgs::new(id, f.flag)),
        K::SetFactionVariable => {
            Instruction::SetFactionVariable(TextValueArgs::new(id, text, f.value))
        }
        K::SetFactionVariableModifier => {
            Instruction::SetFactionVariableModifier(TextValueArgs::new(id, text, f.value))
        }
        K::SetSiteOwner => Instruction::SetSiteOwner(PointArgs::new(id, f.location)),
        K::SetWinningFaction => Instruction::SetWinningFaction(IdArgs::new(id)),
        K::SelectEntity => Instruction::SelectEntity(IdArgs::new(id)),
        K::ShowImage => Instruction::ShowImage(ImageArgs::new(id, f.sites, f.delay)),
        K::MoveImage => Instruction::MoveImage(ImageArgs::new(id, f.sites, f.delay)),
        K::ShowMessage => {
            Instruction::ShowMessage(MessageArgs::new(id, text, &f.details, f.names))
        }
        K::ShowMessageDialog => {
            Instruction::ShowMessageDialog(MessageArgs::new(id, text, &f.details, f.names))
        }
    }
}

fn point() -> impl Strategy<Value = Point> {
    (-1..40i32, -1..40i32).prop_map(|(x, y)| Point::new(x, y))
}

fn fields() -> impl Strategy<Value = Fields> {
    (
        (
            "[a-z0-9-]{0,12}",
            "[A-Za-z0-9 .,'&<>-]{0,16}",
            "[A-Za-z0-9 .,&<>-]{0,24}",
            any::<i32>(),
            any::<bool>(),
            prop::sample::select(ModifierTarget::ALL.to_vec()),
        ),
        (
            point(),
            prop::collection::vec(point(), 0..4),
            0..2000i32,
            prop::collection::vec("[A-Za-z0-9 -]{0,10}", 0..3),
        ),
    )
        .prop_map(
            |((id, text, details, value, flag, target), (location, sites, delay, names))| Fields {
                id,
                text,
                details,
                value,
                flag,
                target,
                location,
                sites,
                delay,
                names,
            },
        )
}

fn instruction() -> impl Strategy<Value = Instruction> {
    (prop::sample::select(InstructionKind::ALL.to_vec()), fields())
        .prop_map(|(kind, fields)| build(kind, fields))
}

proptest! {
    #[test]
    fn instruction_write_then_read_is_identity(instruction in instruction()) {
        let xml = to_xml_string(&instruction).unwrap();
        prop_assert_eq!(from_xml_str(&xml).unwrap(), instruction);
    }

    #[test]
    fn program_write_then_read_is_identity(
        instructions in prop::collection::vec(instruction(), 0..8)
    ) {
        let program = Program::from_iter(instructions);
        let xml = program.to_xml().unwrap();
        prop_assert_eq!(Program::from_xml(&xml).unwrap(), program);
    }
}

#[test]
fn every_kind_is_covered() {
    let fields = Fields {
        id: "id".to_string(),
        text: "text".to_string(),
        details: "details".to_string(),
        value: -7,
        flag: true,
        target: ModifierTarget::OwnerUnits,
        location: Point::new(3, 4),
        sites: vec![Point::new(1, 1)],
        delay: 0,
        names: vec!["a".to_string()],
    };
    for kind in InstructionKind::ALL {
        let instruction = build(kind, fields.clone());
        assert_eq!(instruction.kind(), kind);
        let xml = to_xml_string(&instruction).unwrap();
        assert!(xml.starts_with(&format!("<{}", kind.tag())), "{xml}");
        assert_eq!(from_xml_str(&xml).unwrap(), instruction);
    }
}
