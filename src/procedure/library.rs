//! Step library
//!
//! Declarative procedure data: ordered phases of ordered steps, each with an
//! instruction, a gate, and the indicators it drives. Phase and step indices
//! are 1-based and contiguous because they are positions in these vectors.

use serde::Serialize;

use crate::error::ProcedureError;
use crate::telemetry::EvaSlot;

use super::gate::predicates::{
    coolant_depleted, dcu_batt, dcu_pump, oxygen_depleted, uia,
};
use super::gate::{Condition, Gate};
use super::indicator::Indicator;
use super::signal::{ControlPoint, UiaSignal};

/// 1-based position of a step within a procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StepId {
    /// 1-based phase index
    pub phase: usize,
    /// 1-based step index within the phase
    pub step: usize,
}

impl StepId {
    /// Creates a step id.
    #[must_use]
    pub const fn new(phase: usize, step: usize) -> Self {
        Self { phase, step }
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.phase, self.step)
    }
}

/// The atomic gated unit of a procedure.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    instruction: String,
    gate: Gate,
    indicators: Vec<Indicator>,
}

impl Step {
    /// A step with an always-satisfied gate and no indicators.
    #[must_use]
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            gate: Gate::always(),
            indicators: Vec::new(),
        }
    }

    /// Sets the gate to the given conditions.
    #[must_use]
    pub fn gated(mut self, conditions: Vec<Condition>) -> Self {
        self.gate = Gate::all(conditions);
        self
    }

    /// Adds an indicator refreshed whenever the step is evaluated.
    #[must_use]
    pub fn indicator(mut self, indicator: Indicator) -> Self {
        self.indicators.push(indicator);
        self
    }

    /// Operator-facing instruction.
    #[must_use]
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Precondition.
    #[must_use]
    pub const fn gate(&self) -> &Gate {
        &self.gate
    }

    /// Indicators driven by this step.
    #[must_use]
    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }
}

/// A contiguous ordered group of steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    title: String,
    steps: Vec<Step>,
}

impl Phase {
    /// Creates a phase.
    #[must_use]
    pub fn new(title: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            title: title.into(),
            steps,
        }
    }

    /// Phase title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Steps in order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// An ordered, validated sequence of phases.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureLibrary {
    phases: Vec<Phase>,
}

impl ProcedureLibrary {
    /// Creates a library from phases.
    ///
    /// # Errors
    ///
    /// Returns [`ProcedureError::NoPhases`] for an empty procedure and
    /// [`ProcedureError::EmptyPhase`] for a phase without steps, which would
    /// otherwise count as complete before anything happened.
    pub fn new(phases: Vec<Phase>) -> Result<Self, ProcedureError> {
        if phases.is_empty() {
            return Err(ProcedureError::NoPhases);
        }
        if let Some((index, phase)) = phases
            .iter()
            .enumerate()
            .find(|(_, phase)| phase.steps.is_empty())
        {
            return Err(ProcedureError::EmptyPhase {
                phase: index + 1,
                title: phase.title.clone(),
            });
        }
        Ok(Self { phases })
    }

    /// The four-phase suit ingress procedure for one suit.
    #[must_use]
    pub fn ingress(slot: EvaSlot) -> Self {
        let ev = slot.label();
        let power = UiaSignal::Power(slot);
        let waste = UiaSignal::WaterWaste(slot);

        let phases = vec![
            Phase::new(
                "Connect UIA to DCU and start depress",
                vec![
                    Step::new(format!("Connect {ev} UIA and DCU umbilical."))
                        .gated(vec![uia(power, true), dcu_batt(slot, true)])
                        .indicator(Indicator::new(ControlPoint::power(slot), power, true)),
                    Step::new(format!("Toggle {ev} EMU PWR on.")),
                    Step::new(format!("Switch {ev} DCU batt to umbilical.")),
                ],
            ),
            Phase::new(
                "Vent O2 tanks",
                vec![
                    Step::new("Open O2 vent.")
                        .gated(vec![uia(UiaSignal::OxyVent, true)])
                        .indicator(Indicator::new(ControlPoint::O2Vent, UiaSignal::OxyVent, true)),
                    Step::new(format!("Wait for {ev} O2 tanks to drop below 10."))
                        .gated(vec![oxygen_depleted(slot)]),
                    Step::new("Close O2 vent.")
                        .gated(vec![uia(UiaSignal::OxyVent, false)])
                        .indicator(Indicator::new(
                            ControlPoint::O2Vent,
                            UiaSignal::OxyVent,
                            false,
                        )),
                ],
            ),
            Phase::new(
                "Empty water tanks",
                vec![
                    Step::new(format!("Switch {ev} DCU pump to open."))
                        .gated(vec![dcu_pump(slot, true)]),
                    Step::new(format!("Open {ev} waste water."))
                        .gated(vec![uia(waste, true)])
                        .indicator(Indicator::new(ControlPoint::waste(slot), waste, true)),
                    Step::new(format!("Wait for {ev} coolant to drop below 5."))
                        .gated(vec![coolant_depleted(slot)]),
                    Step::new(format!("Close {ev} waste water."))
                        .gated(vec![uia(waste, false)])
                        .indicator(Indicator::new(ControlPoint::waste(slot), waste, false)),
                ],
            ),
            Phase::new(
                "Disconnect UIA from DCU",
                vec![
                    Step::new(format!("Toggle {ev} EMU PWR off."))
                        .gated(vec![uia(power, false)])
                        .indicator(Indicator::new(ControlPoint::power(slot), power, false)),
                    Step::new(format!("Switch {ev} DCU batt to local."))
                        .gated(vec![dcu_batt(slot, false)]),
                ],
            ),
        ];

        Self { phases }
    }

    /// Phases in order.
    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Phase by 1-based index.
    #[must_use]
    pub fn phase(&self, phase: usize) -> Option<&Phase> {
        phase.checked_sub(1).and_then(|i| self.phases.get(i))
    }

    /// Step by id.
    #[must_use]
    pub fn step(&self, id: StepId) -> Option<&Step> {
        self.phase(id.phase)
            .and_then(|phase| id.step.checked_sub(1).and_then(|i| phase.steps.get(i)))
    }

    /// Number of steps in each phase.
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        self.phases.iter().map(|phase| phase.steps.len()).collect()
    }

    /// Total number of steps.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.phases.iter().map(|phase| phase.steps.len()).sum()
    }

    /// Id of the final step of the final phase.
    #[must_use]
    pub fn last_step(&self) -> StepId {
        StepId::new(
            self.phases.len(),
            self.phases.last().map_or(0, |phase| phase.steps.len()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingress_shape() {
        let library = ProcedureLibrary::ingress(EvaSlot::Eva1);
        assert_eq!(library.shape(), vec![3, 3, 4, 2]);
        assert_eq!(library.total_steps(), 12);
        assert_eq!(library.last_step(), StepId::new(4, 2));
    }

    #[test]
    fn ingress_passes_validation() {
        let library = ProcedureLibrary::ingress(EvaSlot::Eva2);
        let rebuilt = ProcedureLibrary::new(library.phases().to_vec()).unwrap();
        assert_eq!(rebuilt, library);
    }

    #[test]
    fn ingress_text_names_the_suit() {
        let library = ProcedureLibrary::ingress(EvaSlot::Eva2);
        let first = library.step(StepId::new(1, 1)).unwrap();
        assert_eq!(first.instruction(), "Connect EV-2 UIA and DCU umbilical.");
        assert_eq!(
            first.indicators()[0].control,
            ControlPoint::Emu2Power
        );
    }

    #[test]
    fn trivial_steps_have_no_conditions() {
        let library = ProcedureLibrary::ingress(EvaSlot::Eva1);
        assert!(library.step(StepId::new(1, 2)).unwrap().gate().is_trivial());
        assert!(library.step(StepId::new(1, 3)).unwrap().gate().is_trivial());
        assert!(!library.step(StepId::new(2, 2)).unwrap().gate().is_trivial());
    }

    #[test]
    fn step_lookup_is_one_based() {
        let library = ProcedureLibrary::ingress(EvaSlot::Eva1);
        assert!(library.step(StepId::new(0, 1)).is_none());
        assert!(library.step(StepId::new(1, 0)).is_none());
        assert!(library.step(StepId::new(4, 3)).is_none());
        assert!(library.step(StepId::new(5, 1)).is_none());
        assert_eq!(
            library.step(StepId::new(2, 1)).unwrap().instruction(),
            "Open O2 vent."
        );
    }

    #[test]
    fn rejects_empty_procedure() {
        assert!(matches!(
            ProcedureLibrary::new(vec![]),
            Err(ProcedureError::NoPhases)
        ));
    }

    #[test]
    fn rejects_empty_phase() {
        let err = ProcedureLibrary::new(vec![
            Phase::new("one", vec![Step::new("a")]),
            Phase::new("two", vec![]),
        ])
        .unwrap_err();
        assert!(matches!(err, ProcedureError::EmptyPhase { phase: 2, .. }));
    }

    #[test]
    fn step_id_display() {
        assert_eq!(StepId::new(3, 4).to_string(), "3.4");
    }
}
