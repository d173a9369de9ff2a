//! Result slots filled by instruction execution.

use hexkit_world::{Entity, EntityClass, Faction, Site, VariableClass};

/// Objects touched by one [`execute`](crate::Instruction::execute) call.
///
/// Callers pass a results bag to learn what an instruction created or changed
/// without resolving identifiers again. Each slot holds an owned snapshot taken
/// at the moment the instruction ran, so deleted objects stay readable.
///
/// Instructions only write to the bag and leave it untouched when they turn out
/// to be no-ops. Callers [`clear`](Self::clear) it between uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionResults {
    /// Entity created, changed or deleted
    pub entity: Option<Entity>,
    /// Entity class involved
    pub entity_class: Option<EntityClass>,
    /// Faction involved; for ownership changes the original owner
    pub faction: Option<Faction>,
    /// Site involved; for moves the original site
    pub site: Option<Site>,
    /// Variable class involved
    pub variable_class: Option<VariableClass>,
}

impl InstructionResults {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties every slot.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` if no slot is filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entity.is_none()
            && self.entity_class.is_none()
            && self.faction.is_none()
            && self.site.is_none()
            && self.variable_class.is_none()
    }
}
