//! Procedure gating
//!
//! Guides an operator through a fixed multi-phase procedure by comparing
//! live telemetry against each step's required state, revealing the next
//! instruction only once every earlier gate has cleared.
//!
//! # Architecture
//!
//! - [`ProcedureLibrary`]: Ordered phases of steps (instruction, gate, indicators)
//! - [`Gate`] / [`predicates`]: Preconditions over a telemetry snapshot
//! - [`indicator`]: Per-control "needs operator action" mapping
//! - [`CompletionMatrix`]: Monotonic per-step completion flags
//! - [`ProcedureEngine`]: Per-tick gating algorithm writing to a [`ProcedureDisplay`]

pub mod display;
pub mod engine;
pub mod gate;
pub mod indicator;
pub mod library;
pub mod matrix;
pub mod signal;

pub use display::{Panel, ProcedureDisplay};
pub use engine::{COMPLETE_MESSAGE, ProcedureEngine, TickOutcome};
pub use gate::{Condition, Evaluation, Gate, predicates};
pub use indicator::{Indicator, needs_action};
pub use library::{Phase, ProcedureLibrary, Step, StepId};
pub use matrix::CompletionMatrix;
pub use signal::{ControlPoint, DcuControl, Reading, UiaSignal};
