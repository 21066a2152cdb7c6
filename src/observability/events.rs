//! Structured event stream for `suit-ingress`.
//!
//! Discrete, typed events emitted while a procedure runs. Events are
//! serialized as newline-delimited JSON (JSONL) and carry a monotonically
//! increasing sequence number.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during a procedure session.
///
/// Each variant is tagged with `"type"` when serialized to JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A guidance session has started.
    SessionStarted {
        /// When the session started.
        timestamp: DateTime<Utc>,
        /// Suit slot being guided (e.g. `"eva1"`).
        eva: String,
        /// Whether the telemetry simulator drives the store.
        simulator: bool,
    },

    /// The session has stopped.
    SessionStopped {
        /// When the session stopped.
        timestamp: DateTime<Utc>,
        /// Human-readable stop reason.
        reason: String,
    },

    /// A step's gate cleared and the step was marked complete.
    StepCompleted {
        /// When the step completed.
        timestamp: DateTime<Utc>,
        /// 1-based phase index.
        phase: usize,
        /// 1-based step index.
        step: usize,
        /// Instruction of the completed step.
        instruction: String,
    },

    /// Every step of a phase is complete.
    PhaseCompleted {
        /// When the phase completed.
        timestamp: DateTime<Utc>,
        /// 1-based phase index.
        phase: usize,
        /// Phase title.
        title: String,
    },

    /// The final step of the procedure completed.
    ProcedureCompleted {
        /// When the procedure completed.
        timestamp: DateTime<Utc>,
        /// Number of steps in the procedure.
        steps: usize,
    },

    /// The simulator cursor was commanded to move.
    SimulatorMoved {
        /// When the command was handled.
        timestamp: DateTime<Utc>,
        /// `"advance"` or `"retreat"`.
        direction: String,
        /// Cursor phase after the command.
        phase: usize,
        /// Cursor step after the command.
        step: usize,
        /// Progress percentage after the command.
        progress: u8,
    },

    /// A subsystem document was rejected.
    TelemetryRejected {
        /// When the document was rejected.
        timestamp: DateTime<Utc>,
        /// Subsystem the document was addressed to.
        subsystem: String,
        /// Deserialization error.
        error: String,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) increments the sequence counter,
/// serializes the event as a single JSON line, and flushes the writer.
/// Serialization or I/O failures are dropped; observability must never stop
/// the procedure.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug.
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that silently discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
