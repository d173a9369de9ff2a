//! Presentation seam for event instructions.
//!
//! Event instructions never touch the world. Replay drivers hand them to an
//! [`EventDisplay`], which may animate, print or simply collect them.

use crate::instruction::Instruction;

/// Animation delay per site when an image instruction leaves it unset.
pub const DEFAULT_ANIMATION_DELAY_MS: i32 = 250;

/// Resolves the per-site delay of an image instruction.
#[must_use]
pub const fn effective_delay(delay: i32) -> i32 {
    if delay > 0 {
        delay
    } else {
        DEFAULT_ANIMATION_DELAY_MS
    }
}

/// Receives event instructions during replay.
pub trait EventDisplay {
    /// Presents one event instruction.
    fn show(&mut self, instruction: &Instruction);
}

impl<F: FnMut(&Instruction)> EventDisplay for F {
    fn show(&mut self, instruction: &Instruction) {
        self(instruction);
    }
}

/// Display that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl EventDisplay for NullDisplay {
    fn show(&mut self, _instruction: &Instruction) {}
}

/// Display that records events for later inspection.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Vec<Instruction>,
}

impl EventRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events without clearing them.
    #[must_use]
    pub fn events(&self) -> &[Instruction] {
        &self.events
    }

    /// Drains and returns all recorded events in arrival order.
    pub fn take_events(&mut self) -> Vec<Instruction> {
        std::mem::take(&mut self.events)
    }
}

impl EventDisplay for EventRecorder {
    fn show(&mut self, instruction: &Instruction) {
        self.events.push(instruction.clone());
    }
}
