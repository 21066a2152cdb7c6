//! Telemetry simulator driven by advance/retreat commands.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::observability::metrics::{self, MoveDirection};
use crate::observability::{Event, EventEmitter};
use crate::telemetry::TelemetryStore;

use super::cursor::ProcedureCursor;
use super::script::SimulationScript;

/// Publishes scripted telemetry for an operator-driven cursor.
///
/// The simulator knows nothing about the engine's completion state; it only
/// rewrites the UIA, DCU and telemetry documents for its current position.
pub struct ProcedureSimulator {
    script: SimulationScript,
    cursor: ProcedureCursor,
    store: TelemetryStore,
    events: Option<Arc<EventEmitter>>,
}

impl ProcedureSimulator {
    /// Creates a simulator at step 1.1 and publishes its telemetry.
    #[must_use]
    pub fn new(script: SimulationScript, store: TelemetryStore) -> Self {
        let cursor = ProcedureCursor::starting(script.shape());
        let simulator = Self {
            script,
            cursor,
            store,
            events: None,
        };
        simulator.publish();
        simulator
    }

    /// Attaches a structured event stream for cursor moves.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventEmitter>) -> Self {
        self.events = Some(events);
        self
    }

    /// Moves to the next step and republishes telemetry.
    ///
    /// Returns `false` at the last step; the documents are still rewritten.
    pub fn advance(&mut self) -> bool {
        let moved = self.cursor.advance();
        self.after_move(MoveDirection::Advance, moved);
        moved
    }

    /// Moves to the previous step and republishes telemetry.
    ///
    /// Returns `false` at the first step; the documents are still rewritten.
    pub fn retreat(&mut self) -> bool {
        let moved = self.cursor.retreat();
        self.after_move(MoveDirection::Retreat, moved);
        moved
    }

    /// Progress percentage for the current position.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.cursor.progress()
    }

    /// Label of the action simulated at the current position.
    #[must_use]
    pub fn current_label(&self) -> &str {
        self.script
            .entry(self.cursor.position())
            .map_or("", |entry| entry.label())
    }

    /// Two-paragraph status shown next to the simulator controls.
    #[must_use]
    pub fn status_text(&self) -> String {
        format!(
            "Step {}: {}\n\nProgress: {}%",
            self.cursor.position(),
            self.current_label(),
            self.progress()
        )
    }

    /// Current cursor.
    #[must_use]
    pub const fn cursor(&self) -> &ProcedureCursor {
        &self.cursor
    }

    /// Script being replayed.
    #[must_use]
    pub const fn script(&self) -> &SimulationScript {
        &self.script
    }

    fn after_move(&self, direction: MoveDirection, moved: bool) {
        self.publish();
        metrics::record_simulator_move(direction, moved);

        let position = self.cursor.position();
        let progress = self.progress();
        if moved {
            info!(
                step = %position,
                progress,
                label = self.current_label(),
                "simulator moved"
            );
        } else {
            debug!(step = %position, ?direction, "simulator at bound");
        }

        if let Some(events) = &self.events {
            events.emit(Event::SimulatorMoved {
                timestamp: Utc::now(),
                direction: direction.label().to_owned(),
                phase: position.phase,
                step: position.step,
                progress,
            });
        }
    }

    fn publish(&self) {
        let frame = self.script.frame_at(self.cursor.position());
        self.store.replace_uia(frame.uia);
        self.store.replace_dcu(frame.dcu);
        self.store.replace_telemetry(frame.telemetry);
        metrics::set_progress(self.progress());
    }
}

impl std::fmt::Debug for ProcedureSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcedureSimulator")
            .field("position", &self.cursor.position())
            .field("slot", &self.script.slot())
            .finish_non_exhaustive()
    }
}
