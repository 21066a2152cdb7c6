//! Indicator sync
//!
//! Maps an observed control value and the value a step requires to a single
//! "flag this control to the operator" signal. Polarity is per step: some
//! steps need a switch turned on, others need it turned off.

use crate::telemetry::TelemetrySnapshot;

use super::signal::{ControlPoint, UiaSignal};

/// Returns whether a control needs operator action.
///
/// An absent document counts as a mismatch, so the control stays flagged
/// until telemetry confirms the required value.
#[must_use]
pub const fn needs_action(observed: Option<bool>, target: bool) -> bool {
    match observed {
        Some(value) => value != target,
        None => true,
    }
}

/// A control point a step highlights while its value differs from `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    /// Panel control that is flagged
    pub control: ControlPoint,
    /// Telemetry field observed for the control
    pub signal: UiaSignal,
    /// Value the step requires
    pub target: bool,
}

impl Indicator {
    /// Creates an indicator.
    #[must_use]
    pub const fn new(control: ControlPoint, signal: UiaSignal, target: bool) -> Self {
        Self {
            control,
            signal,
            target,
        }
    }

    /// Flag state for the current snapshot.
    #[must_use]
    pub fn needs_action(&self, snapshot: &TelemetrySnapshot) -> bool {
        needs_action(self.signal.read(snapshot), self.target)
    }
}
