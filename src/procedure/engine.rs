//! Procedure engine
//!
//! The `ProcedureEngine` runs the gating algorithm once per tick: it walks
//! phases and steps in order, skips what is already complete, shows the
//! first pending step, and halts the tick at the first unmet gate. Only one
//! unmet gate is ever visible to the operator.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, trace};

use crate::observability::metrics;
use crate::observability::{Event, EventEmitter};
use crate::telemetry::TelemetryStore;

use super::display::{Panel, ProcedureDisplay};
use super::library::{ProcedureLibrary, StepId};
use super::matrix::CompletionMatrix;
use super::signal::ControlPoint;

/// Instruction shown once the final step completes.
pub const COMPLETE_MESSAGE: &str = "Ingress Complete!";

/// How a tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Evaluation stopped at this step's unmet gate.
    Halted(StepId),
    /// Every step is complete.
    Complete,
}

/// Gating engine owning the completion matrix for one procedure run.
///
/// Reads telemetry from a shared [`TelemetryStore`] and writes the
/// instruction and indicator states to a [`ProcedureDisplay`]. It never
/// writes telemetry.
pub struct ProcedureEngine<D: ProcedureDisplay = Panel> {
    library: ProcedureLibrary,
    matrix: CompletionMatrix,
    store: TelemetryStore,
    display: D,
    events: Option<Arc<EventEmitter>>,
    /// Step the previous tick halted on, for change-only logging
    waiting_on: Option<StepId>,
}

impl<D: ProcedureDisplay> ProcedureEngine<D> {
    /// Creates an engine with an all-false completion matrix.
    ///
    /// Every control point indicator is cleared on the display.
    pub fn new(library: ProcedureLibrary, store: TelemetryStore, mut display: D) -> Self {
        for control in ControlPoint::ALL {
            display.set_indicator(control, false);
        }
        let matrix = CompletionMatrix::for_library(&library);
        debug!(
            phases = matrix.phase_count(),
            steps = matrix.total(),
            "procedure engine initialized"
        );

        Self {
            library,
            matrix,
            store,
            display,
            events: None,
            waiting_on: None,
        }
    }

    /// Attaches a structured event stream for completion events.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventEmitter>) -> Self {
        self.events = Some(events);
        self
    }

    /// Runs one evaluation pass.
    ///
    /// Complete phases and steps are skipped without side effects. For the
    /// first incomplete step its indicators are refreshed from live telemetry,
    /// its gate is evaluated, and the gate prompt (or the step text) is
    /// written. An unmet gate halts the tick; a satisfied one marks the step
    /// complete and moves on within the same tick. Indicators of steps past the halt
    /// point are left untouched.
    pub fn tick(&mut self) -> TickOutcome {
        metrics::record_tick();

        if self.matrix.is_procedure_complete() {
            return TickOutcome::Complete;
        }

        let snapshot = self.store.snapshot();

        for (phase_index, phase) in self.library.phases().iter().enumerate() {
            let phase_number = phase_index + 1;
            if self.matrix.is_phase_complete(phase_number) {
                continue;
            }

            for (step_index, step) in phase.steps().iter().enumerate() {
                let id = StepId::new(phase_number, step_index + 1);
                if self.matrix.is_complete(id) {
                    continue;
                }

                for indicator in step.indicators() {
                    self.display
                        .set_indicator(indicator.control, indicator.needs_action(&snapshot));
                }

                let evaluation = step.gate().evaluate(&snapshot);
                trace!(step = %id, satisfied = evaluation.satisfied, "gate evaluated");
                // A gate prompt replaces the step text; the panel is written once per step.
                self.display
                    .set_instruction(evaluation.prompt.as_deref().unwrap_or(step.instruction()));

                if !evaluation.satisfied {
                    if self.waiting_on != Some(id) {
                        info!(step = %id, instruction = step.instruction(), "awaiting gate");
                        self.waiting_on = Some(id);
                    }
                    return TickOutcome::Halted(id);
                }

                self.matrix.mark(id);
                metrics::record_step_completed(phase_number);
                info!(step = %id, instruction = step.instruction(), "step complete");
                self.emit(Event::StepCompleted {
                    timestamp: Utc::now(),
                    phase: id.phase,
                    step: id.step,
                    instruction: step.instruction().to_string(),
                });
            }

            info!(phase = phase_number, title = phase.title(), "phase complete");
            self.emit(Event::PhaseCompleted {
                timestamp: Utc::now(),
                phase: phase_number,
                title: phase.title().to_string(),
            });
        }

        // The procedure was incomplete on entry, so the final step completed
        // during this tick.
        self.waiting_on = None;
        self.display.set_instruction(COMPLETE_MESSAGE);
        info!(steps = self.matrix.total(), "procedure complete");
        self.emit(Event::ProcedureCompleted {
            timestamp: Utc::now(),
            steps: self.matrix.total(),
        });
        TickOutcome::Complete
    }

    /// Returns whether every step of a 1-based phase is complete.
    #[must_use]
    pub fn is_phase_complete(&self, phase: usize) -> bool {
        self.matrix.is_phase_complete(phase)
    }

    /// Returns whether every step is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.matrix.is_procedure_complete()
    }

    /// Completion flags.
    #[must_use]
    pub const fn matrix(&self) -> &CompletionMatrix {
        &self.matrix
    }

    /// Step library driving this engine.
    #[must_use]
    pub const fn library(&self) -> &ProcedureLibrary {
        &self.library
    }

    /// Output sink.
    #[must_use]
    pub const fn display(&self) -> &D {
        &self.display
    }

    fn emit(&self, event: Event) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}

impl<D: ProcedureDisplay> std::fmt::Debug for ProcedureEngine<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcedureEngine")
            .field("completed", &self.matrix.completed_count())
            .field("total", &self.matrix.total())
            .field("waiting_on", &self.waiting_on)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedure::gate::predicates::uia;
    use crate::procedure::library::{Phase, Step};
    use crate::procedure::signal::UiaSignal;
    use crate::telemetry::EvaSlot;
    use crate::telemetry::schema::{DcuDocument, TelemetryDocument, UiaDocument};

    fn engine(store: &TelemetryStore) -> ProcedureEngine {
        ProcedureEngine::new(
            ProcedureLibrary::ingress(EvaSlot::Eva1),
            store.clone(),
            Panel::new(),
        )
    }

    fn zeroed(store: &TelemetryStore) {
        store.replace_uia(UiaDocument::default());
        store.replace_dcu(DcuDocument::default());
        store.replace_telemetry(TelemetryDocument::default());
    }

    fn edit_uia(store: &TelemetryStore, edit: impl FnOnce(&mut UiaDocument)) {
        let mut doc = store.uia().unwrap_or_default();
        edit(&mut doc);
        store.replace_uia(doc);
    }

    fn edit_dcu(store: &TelemetryStore, edit: impl FnOnce(&mut DcuDocument)) {
        let mut doc = store.dcu().unwrap_or_default();
        edit(&mut doc);
        store.replace_dcu(doc);
    }

    #[test]
    fn new_engine_clears_every_indicator() {
        let store = TelemetryStore::new();
        let engine = engine(&store);
        for control in ControlPoint::ALL {
            assert_eq!(engine.display().indicator(control), Some(false));
        }
        assert_eq!(engine.matrix().completed_count(), 0);
    }

    #[test]
    fn absent_telemetry_halts_on_first_step() {
        let store = TelemetryStore::new();
        let mut engine = engine(&store);
        assert_eq!(engine.tick(), TickOutcome::Halted(StepId::new(1, 1)));
        assert_eq!(
            engine.display().instruction(),
            "Connect EV-1 UIA and DCU umbilical."
        );
        assert_eq!(engine.display().indicator(ControlPoint::Emu1Power), Some(true));
    }

    #[test]
    fn batt_mismatch_replaces_instruction() {
        let store = TelemetryStore::new();
        zeroed(&store);
        edit_uia(&store, |doc| doc.uia.eva1_power = true);
        let mut engine = engine(&store);

        assert_eq!(engine.tick(), TickOutcome::Halted(StepId::new(1, 1)));
        assert_eq!(
            engine.display().instruction(),
            "Switch EV-1 DCU batt to umbilical."
        );
        assert_eq!(engine.display().indicator(ControlPoint::Emu1Power), Some(false));
    }

    #[test]
    fn repeated_ticks_on_prompting_gate_leave_panel_unchanged() {
        let store = TelemetryStore::new();
        zeroed(&store);
        edit_uia(&store, |doc| doc.uia.eva1_power = true);
        let mut engine = engine(&store);

        engine.tick();
        let revision = engine.display().revision();
        for _ in 0..3 {
            assert_eq!(engine.tick(), TickOutcome::Halted(StepId::new(1, 1)));
        }
        assert_eq!(engine.display().revision(), revision);
    }

    #[test]
    fn trivial_steps_complete_in_same_tick() {
        let store = TelemetryStore::new();
        zeroed(&store);
        let mut engine = engine(&store);
        assert_eq!(engine.tick(), TickOutcome::Halted(StepId::new(1, 1)));

        edit_uia(&store, |doc| doc.uia.eva1_power = true);
        edit_dcu(&store, |doc| doc.dcu.eva1.batt = true);
        assert_eq!(engine.tick(), TickOutcome::Halted(StepId::new(2, 1)));
        assert!(engine.is_phase_complete(1));
        assert_eq!(engine.matrix().completed_count(), 3);
        assert_eq!(engine.display().instruction(), "Open O2 vent.");
        assert_eq!(engine.display().indicator(ControlPoint::O2Vent), Some(true));
    }

    #[test]
    fn completed_steps_are_not_re_evaluated() {
        let store = TelemetryStore::new();
        zeroed(&store);
        edit_uia(&store, |doc| doc.uia.eva1_power = true);
        edit_dcu(&store, |doc| doc.dcu.eva1.batt = true);
        let mut engine = engine(&store);
        engine.tick();

        // Power dropping again does not reopen step 1.1.
        edit_uia(&store, |doc| doc.uia.eva1_power = false);
        assert_eq!(engine.tick(), TickOutcome::Halted(StepId::new(2, 1)));
        assert!(engine.is_phase_complete(1));
    }

    #[test]
    fn indicators_past_halt_point_keep_last_value() {
        let store = TelemetryStore::new();
        zeroed(&store);
        let mut engine = engine(&store);
        edit_uia(&store, |doc| doc.uia.oxy_vent = true);
        engine.tick();
        // Halted at 1.1; the O2 vent belongs to phase 2 and was never written.
        assert_eq!(engine.display().indicator(ControlPoint::O2Vent), Some(false));
    }

    #[test]
    fn terminal_message_after_last_step() {
        let library = ProcedureLibrary::new(vec![Phase::new(
            "only",
            vec![
                Step::new("Open O2 vent.").gated(vec![uia(UiaSignal::OxyVent, true)]),
                Step::new("done"),
            ],
        )])
        .unwrap();
        let store = TelemetryStore::new();
        let mut engine = ProcedureEngine::new(library, store.clone(), Panel::new());

        assert_eq!(engine.tick(), TickOutcome::Halted(StepId::new(1, 1)));
        edit_uia(&store, |doc| doc.uia.oxy_vent = true);
        assert_eq!(engine.tick(), TickOutcome::Complete);
        assert_eq!(engine.display().instruction(), COMPLETE_MESSAGE);
        assert!(engine.is_complete());

        // Further ticks have no side effects.
        assert_eq!(engine.tick(), TickOutcome::Complete);
        assert_eq!(engine.display().instruction(), COMPLETE_MESSAGE);
    }

    #[test]
    fn completion_events_are_emitted() {
        use std::io::Write;
        use std::sync::Mutex;

        #[derive(Clone, Default)]
        struct Sink(Arc<Mutex<Vec<u8>>>);
        impl Write for Sink {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let sink = Sink::default();
        let emitter = Arc::new(EventEmitter::new(Box::new(sink.clone())));
        let library =
            ProcedureLibrary::new(vec![Phase::new("only", vec![Step::new("a"), Step::new("b")])])
                .unwrap();
        let mut engine = ProcedureEngine::new(library, TelemetryStore::new(), Panel::new())
            .with_events(Arc::clone(&emitter));
        engine.tick();

        let output = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        let types: Vec<String> = output
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["type"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(
            types,
            vec![
                "StepCompleted",
                "StepCompleted",
                "PhaseCompleted",
                "ProcedureCompleted"
            ]
        );
    }
}
