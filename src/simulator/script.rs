//! Scripted operator actions keyed by procedure position.
//!
//! Each position carries a label and one operator action. The telemetry
//! published at a position is the nominal baseline with every action up to
//! and including that position applied, so moving the cursor backwards
//! reproduces exactly the state seen on the way forward.

use crate::procedure::gate::predicates::{COOLANT_DEPLETED_LIMIT, OXYGEN_DEPLETED_LIMIT};
use crate::procedure::{DcuControl, StepId, UiaSignal};
use crate::telemetry::EvaSlot;
use crate::telemetry::schema::{DcuDocument, TelemetryDocument, UiaDocument};

/// Oxygen storage before venting.
pub const NOMINAL_OXYGEN: f64 = 100.0;

/// Coolant volume before draining.
pub const NOMINAL_COOLANT: f64 = 100.0;

/// Oxygen storage once the tanks have vented.
pub const VENTED_OXYGEN: f64 = OXYGEN_DEPLETED_LIMIT / 2.0;

/// Coolant volume once the waste line has drained.
pub const DRAINED_COOLANT: f64 = COOLANT_DEPLETED_LIMIT / 2.5;

/// A simulated operator action on the selected suit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperatorAction {
    /// Nothing changes.
    None,
    /// Flip a UIA switch.
    Uia(UiaSignal, bool),
    /// Flip a DCU switch of the selected suit.
    Dcu(DcuControl, bool),
    /// Set both oxygen tanks of the selected suit to a storage level.
    OxygenStorage(f64),
    /// Set the coolant volume of the selected suit.
    Coolant(f64),
}

impl OperatorAction {
    /// Applies the action to a telemetry frame.
    pub fn apply(self, slot: EvaSlot, frame: &mut TelemetryFrame) {
        match self {
            Self::None => {}
            Self::Uia(signal, value) => signal.set(&mut frame.uia.uia, value),
            Self::Dcu(control, mode) => control.set(frame.dcu.dcu.eva_mut(slot), mode),
            Self::OxygenStorage(level) => {
                let eva = frame.telemetry.telemetry.eva_mut(slot);
                eva.oxy_pri_storage = level;
                eva.oxy_sec_storage = level;
            }
            Self::Coolant(level) => frame.telemetry.telemetry.eva_mut(slot).coolant_ml = level,
        }
    }
}

/// The three gated subsystem documents as published together.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryFrame {
    pub uia: UiaDocument,
    pub dcu: DcuDocument,
    pub telemetry: TelemetryDocument,
}

impl TelemetryFrame {
    /// Every switch off, tanks and coolant full on both suits.
    #[must_use]
    pub fn baseline() -> Self {
        let mut telemetry = TelemetryDocument::default();
        for slot in [EvaSlot::Eva1, EvaSlot::Eva2] {
            let eva = telemetry.telemetry.eva_mut(slot);
            eva.oxy_pri_storage = NOMINAL_OXYGEN;
            eva.oxy_sec_storage = NOMINAL_OXYGEN;
            eva.coolant_ml = NOMINAL_COOLANT;
        }
        Self {
            uia: UiaDocument::default(),
            dcu: DcuDocument::default(),
            telemetry,
        }
    }
}

/// Label and action for one procedure position.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptEntry {
    label: String,
    action: OperatorAction,
}

impl ScriptEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(label: impl Into<String>, action: OperatorAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }

    /// Operator-facing description of the simulated action.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The simulated action.
    #[must_use]
    pub const fn action(&self) -> OperatorAction {
        self.action
    }
}

/// Deterministic telemetry generator for one suit.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationScript {
    slot: EvaSlot,
    phases: Vec<Vec<ScriptEntry>>,
}

impl SimulationScript {
    /// Creates a script; `None` if it has no phases or an empty phase.
    #[must_use]
    pub fn new(slot: EvaSlot, phases: Vec<Vec<ScriptEntry>>) -> Option<Self> {
        if phases.is_empty() || phases.iter().any(Vec::is_empty) {
            return None;
        }
        Some(Self { slot, phases })
    }

    /// Script mirroring the four-phase ingress procedure for `slot`.
    #[must_use]
    pub fn ingress(slot: EvaSlot) -> Self {
        let ev = slot.label();
        let phases = vec![
            vec![
                ScriptEntry::new(
                    format!("Connect {ev} UIA and DCU umbilical"),
                    OperatorAction::None,
                ),
                ScriptEntry::new(
                    format!("{ev} EMU Power ON"),
                    OperatorAction::Uia(UiaSignal::Power(slot), true),
                ),
                ScriptEntry::new("Set BATT to UMB", OperatorAction::Dcu(DcuControl::Batt, true)),
            ],
            vec![
                ScriptEntry::new("Open O2 vent", OperatorAction::Uia(UiaSignal::OxyVent, true)),
                ScriptEntry::new(
                    "Waiting for O2 tanks to drop below 10psi...",
                    OperatorAction::OxygenStorage(VENTED_OXYGEN),
                ),
                ScriptEntry::new("Close O2 vent", OperatorAction::Uia(UiaSignal::OxyVent, false)),
            ],
            vec![
                ScriptEntry::new("Open DCU pump", OperatorAction::Dcu(DcuControl::Pump, true)),
                ScriptEntry::new(
                    format!("Open {ev} waste water"),
                    OperatorAction::Uia(UiaSignal::WaterWaste(slot), true),
                ),
                ScriptEntry::new(
                    "Waiting for coolant to drop below 5%...",
                    OperatorAction::Coolant(DRAINED_COOLANT),
                ),
                ScriptEntry::new(
                    format!("Close {ev} waste water"),
                    OperatorAction::Uia(UiaSignal::WaterWaste(slot), false),
                ),
            ],
            vec![
                ScriptEntry::new(
                    format!("Toggle {ev} EMU Power OFF"),
                    OperatorAction::Uia(UiaSignal::Power(slot), false),
                ),
                ScriptEntry::new(
                    "Disconnect UIA umbilical",
                    OperatorAction::Dcu(DcuControl::Batt, false),
                ),
            ],
        ];
        Self { slot, phases }
    }

    /// Suit the script drives.
    #[must_use]
    pub const fn slot(&self) -> EvaSlot {
        self.slot
    }

    /// Step count per phase.
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        self.phases.iter().map(Vec::len).collect()
    }

    /// Entry at a position, `None` when out of range.
    #[must_use]
    pub fn entry(&self, id: StepId) -> Option<&ScriptEntry> {
        let phase = self.phases.get(id.phase.checked_sub(1)?)?;
        phase.get(id.step.checked_sub(1)?)
    }

    /// Telemetry published while the cursor sits at `id`.
    #[must_use]
    pub fn frame_at(&self, id: StepId) -> TelemetryFrame {
        let mut frame = TelemetryFrame::baseline();
        let applied = self
            .phases
            .iter()
            .enumerate()
            .flat_map(|(p, steps)| {
                steps
                    .iter()
                    .enumerate()
                    .map(move |(s, entry)| (StepId::new(p + 1, s + 1), entry))
            })
            .take_while(|(position, _)| *position <= id);
        for (_, entry) in applied {
            entry.action.apply(self.slot, &mut frame);
        }
        frame
    }
}
