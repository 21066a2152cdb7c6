//! Output sinks for the procedure engine
//!
//! The engine writes one instruction line and one "needs operator action"
//! flag per control point. Rendering is the host's concern; [`Panel`] keeps
//! the latest values in memory.

use std::collections::BTreeMap;

use super::signal::ControlPoint;

/// Receives instruction text and indicator states from the engine.
pub trait ProcedureDisplay {
    /// Replaces the current instruction line.
    fn set_instruction(&mut self, text: &str);

    /// Sets whether `control` needs operator action.
    fn set_indicator(&mut self, control: ControlPoint, needs_action: bool);
}

/// In-memory display holding the latest instruction and indicator states.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    instruction: String,
    indicators: BTreeMap<ControlPoint, bool>,
    revision: u64,
}

impl Panel {
    /// Creates a blank panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest instruction line.
    #[must_use]
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Latest state of a control point, `None` if never written.
    #[must_use]
    pub fn indicator(&self, control: ControlPoint) -> Option<bool> {
        self.indicators.get(&control).copied()
    }

    /// Control points currently flagged, in panel order.
    #[must_use]
    pub fn flagged(&self) -> Vec<ControlPoint> {
        self.indicators
            .iter()
            .filter_map(|(&control, &on)| on.then_some(control))
            .collect()
    }

    /// Incremented whenever a write changes what the panel shows.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

impl ProcedureDisplay for Panel {
    fn set_instruction(&mut self, text: &str) {
        if self.instruction != text {
            text.clone_into(&mut self.instruction);
            self.revision += 1;
        }
    }

    fn set_indicator(&mut self, control: ControlPoint, needs_action: bool) {
        if self.indicators.insert(control, needs_action) != Some(needs_action) {
            self.revision += 1;
        }
    }
}
