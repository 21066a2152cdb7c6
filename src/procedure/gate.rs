//! Step gates
//!
//! A gate is the precondition a step waits on: an ordered list of
//! conditions over the current telemetry snapshot. Evaluation stops at the
//! first unmet condition. A condition whose subsystem document is absent is
//! unmet; gates never fail.

use crate::telemetry::{EvaSlot, TelemetrySnapshot};

use super::signal::{DcuControl, Reading, UiaSignal};

/// A single precondition over telemetry.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A UIA boolean must equal `target`.
    Control {
        /// Observed field
        signal: UiaSignal,
        /// Required value
        target: bool,
    },
    /// A DCU switch of `slot` must be in `mode`.
    ///
    /// When unmet, the prompt names the mode to select.
    Switch {
        /// Suit whose DCU is read
        slot: EvaSlot,
        /// Switch
        control: DcuControl,
        /// Required mode
        mode: bool,
    },
    /// Every reading must be strictly below `limit`.
    ///
    /// Always prompts with the live readings.
    Below {
        /// Readings compared against the limit
        readings: Vec<Reading>,
        /// Exclusive upper bound
        limit: f64,
    },
}

impl Condition {
    /// Evaluates the condition against a snapshot.
    #[must_use]
    pub fn evaluate(&self, snapshot: &TelemetrySnapshot) -> Evaluation {
        match self {
            Self::Control { signal, target } => Evaluation {
                satisfied: signal.read(snapshot) == Some(*target),
                prompt: None,
            },
            Self::Switch {
                slot,
                control,
                mode,
            } => {
                if control.read(*slot, snapshot) == Some(*mode) {
                    Evaluation::satisfied()
                } else {
                    Evaluation {
                        satisfied: false,
                        prompt: Some(format!(
                            "Switch {} DCU {} to {}.",
                            slot.label(),
                            control.name(),
                            control.mode_name(*mode)
                        )),
                    }
                }
            }
            Self::Below { readings, limit } => {
                let values: Vec<Option<f64>> =
                    readings.iter().map(|reading| reading.read(snapshot)).collect();
                let satisfied = !values.is_empty()
                    && values
                        .iter()
                        .all(|value| matches!(value, Some(v) if *v < *limit));
                Evaluation {
                    satisfied,
                    prompt: Some(readings_prompt(readings, &values, *limit)),
                }
            }
        }
    }
}

/// Renders `EV-1 O2 primary: 35, O2 secondary: 40 (target < 10)`.
fn readings_prompt(readings: &[Reading], values: &[Option<f64>], limit: f64) -> String {
    let slot = readings.first().map_or(EvaSlot::Eva1, |reading| reading.slot());
    let parts: Vec<String> = readings
        .iter()
        .zip(values)
        .map(|(reading, value)| {
            value.map_or_else(
                || format!("{}: n/a", reading.label()),
                |v| format!("{}: {v}", reading.label()),
            )
        })
        .collect();
    format!("{} {} (target < {limit})", slot.label(), parts.join(", "))
}

/// Outcome of evaluating a condition or gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Whether the precondition holds
    pub satisfied: bool,
    /// Text that replaces the step instruction, if any
    pub prompt: Option<String>,
}

impl Evaluation {
    /// A satisfied evaluation with no prompt.
    #[must_use]
    pub const fn satisfied() -> Self {
        Self {
            satisfied: true,
            prompt: None,
        }
    }
}

/// Ordered conjunction of conditions. An empty gate is always satisfied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gate {
    conditions: Vec<Condition>,
}

impl Gate {
    /// A gate that is always satisfied.
    #[must_use]
    pub const fn always() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// A gate over the given conditions, checked in order.
    #[must_use]
    pub const fn all(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    /// Conditions in evaluation order.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns whether the gate has no conditions.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluates conditions in order, stopping at the first unmet one.
    #[must_use]
    pub fn evaluate(&self, snapshot: &TelemetrySnapshot) -> Evaluation {
        for condition in &self.conditions {
            let evaluation = condition.evaluate(snapshot);
            if !evaluation.satisfied {
                return evaluation;
            }
        }
        Evaluation::satisfied()
    }
}

/// Condition constructors for the gating rules used by suit procedures.
///
/// The oxygen-source, comm-channel, fan-source, and CO2-bank switches are
/// not wired into any ingress step.
pub mod predicates {
    use super::{Condition, DcuControl, EvaSlot, Reading, UiaSignal};

    /// Oxygen tanks count as depleted strictly below this storage reading.
    pub const OXYGEN_DEPLETED_LIMIT: f64 = 10.0;

    /// Coolant counts as depleted strictly below this reading.
    pub const COOLANT_DEPLETED_LIMIT: f64 = 5.0;

    /// A UIA boolean must equal `target`.
    #[must_use]
    pub const fn uia(signal: UiaSignal, target: bool) -> Condition {
        Condition::Control { signal, target }
    }

    /// Battery source: umbilical (`true`) or local.
    #[must_use]
    pub const fn dcu_batt(slot: EvaSlot, umbilical: bool) -> Condition {
        dcu(slot, DcuControl::Batt, umbilical)
    }

    /// Oxygen source: primary (`true`) or secondary.
    #[must_use]
    pub const fn dcu_oxy(slot: EvaSlot, primary: bool) -> Condition {
        dcu(slot, DcuControl::Oxy, primary)
    }

    /// Comm channel: A (`true`) or B.
    #[must_use]
    pub const fn dcu_comm(slot: EvaSlot, channel_a: bool) -> Condition {
        dcu(slot, DcuControl::Comm, channel_a)
    }

    /// Fan source: primary (`true`) or secondary.
    #[must_use]
    pub const fn dcu_fan(slot: EvaSlot, primary: bool) -> Condition {
        dcu(slot, DcuControl::Fan, primary)
    }

    /// Pump position: open (`true`) or closed.
    #[must_use]
    pub const fn dcu_pump(slot: EvaSlot, open: bool) -> Condition {
        dcu(slot, DcuControl::Pump, open)
    }

    /// CO2 scrubber bank: A (`true`) or B.
    #[must_use]
    pub const fn dcu_co2(slot: EvaSlot, bank_a: bool) -> Condition {
        dcu(slot, DcuControl::Co2, bank_a)
    }

    /// Both oxygen tanks of `slot` below [`OXYGEN_DEPLETED_LIMIT`].
    #[must_use]
    pub fn oxygen_depleted(slot: EvaSlot) -> Condition {
        Condition::Below {
            readings: vec![
                Reading::OxyPrimaryStorage(slot),
                Reading::OxySecondaryStorage(slot),
            ],
            limit: OXYGEN_DEPLETED_LIMIT,
        }
    }

    /// Coolant of `slot` below [`COOLANT_DEPLETED_LIMIT`].
    #[must_use]
    pub fn coolant_depleted(slot: EvaSlot) -> Condition {
        Condition::Below {
            readings: vec![Reading::Coolant(slot)],
            limit: COOLANT_DEPLETED_LIMIT,
        }
    }

    const fn dcu(slot: EvaSlot, control: DcuControl, mode: bool) -> Condition {
        Condition::Switch {
            slot,
            control,
            mode,
        }
    }
}
