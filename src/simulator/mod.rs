//! Procedure simulator
//!
//! Deterministic telemetry generator for demonstrating and testing the
//! procedure engine without hardware. An operator steps a cursor forward and
//! back through the procedure; each position publishes scripted UIA, DCU and
//! suit telemetry documents into the shared store.
//!
//! # Architecture
//!
//! - [`ProcedureCursor`]: Bounded `(phase, step)` position and progress
//! - [`SimulationScript`]: Per-position label and operator action
//! - [`ProcedureSimulator`]: Cursor commands that republish telemetry

pub mod cursor;
pub mod harness;
pub mod script;

pub use cursor::ProcedureCursor;
pub use harness::ProcedureSimulator;
pub use script::{OperatorAction, ScriptEntry, SimulationScript, TelemetryFrame};
