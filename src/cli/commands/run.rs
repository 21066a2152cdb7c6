//! Interactive guidance session
//!
//! Drives the procedure engine on a fixed tick interval and reads operator
//! commands from stdin. With the simulator enabled, `next` / `prev` step the
//! scripted telemetry; `push` injects a raw subsystem document either way.
//! Instruction and indicator changes are printed as they happen.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::cli::args::RunArgs;
use crate::config::{ConfigLoader, IngressConfig, parse_tick_interval};
use crate::error::{CommandError, ConfigError, IngressError, TelemetryError};
use crate::observability::{Event, EventEmitter, init_metrics};
use crate::procedure::{Panel, ProcedureEngine, ProcedureLibrary, TickOutcome};
use crate::simulator::{ProcedureSimulator, SimulationScript};
use crate::telemetry::TelemetryStore;

// ============================================================================
// Operator Commands
// ============================================================================

/// Canonical command words, used for typo suggestions.
const COMMANDS: [&str; 6] = ["next", "prev", "status", "push", "help", "quit"];

const HELP: &str = "\
commands:
  next | n              advance the telemetry simulator
  prev | p              retreat the telemetry simulator
  status | s            show simulator and procedure status
  push <subsystem> <json>
                        replace a subsystem document (uia, dcu, telemetry, ...)
  help | h              show this help
  quit | q              end the session";

/// A parsed line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Next,
    Prev,
    Status,
    Push { subsystem: String, json: String },
    Help,
    Quit,
}

impl OperatorCommand {
    /// Parses one line; `Ok(None)` for blank input.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] for unknown words or an incomplete `push`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let command = match word.to_ascii_lowercase().as_str() {
            "next" | "n" | "advance" => Self::Next,
            "prev" | "p" | "retreat" | "back" => Self::Prev,
            "status" | "s" => Self::Status,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            "push" => {
                let (subsystem, json) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::PushUsage)?;
                let json = json.trim();
                if json.is_empty() {
                    return Err(CommandError::PushUsage);
                }
                Self::Push {
                    subsystem: subsystem.to_string(),
                    json: json.to_string(),
                }
            }
            other => {
                let input = word.to_string();
                return Err(match suggest_command(other) {
                    Some(suggestion) => CommandError::Unknown { input, suggestion },
                    None => CommandError::Unrecognized { input },
                });
            }
        };
        Ok(Some(command))
    }
}

/// Closest command word within a Damerau-Levenshtein distance of 2.
#[must_use]
pub fn suggest_command(input: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .map(|&name| (name, strsim::damerau_levenshtein(input, name)))
        .filter(|(_, dist)| *dist <= 2)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name)
}

// ============================================================================
// Configuration
// ============================================================================

/// Loads the config file (if any) and applies command-line overrides.
///
/// # Errors
///
/// Returns a configuration error for an unreadable or invalid file, or an
/// invalid override.
pub fn resolve_config(args: &RunArgs) -> Result<IngressConfig, IngressError> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::new().load(path)?,
        None => IngressConfig::default(),
    };

    if let Some(eva) = args.eva {
        config.eva = eva;
    }
    if let Some(text) = &args.tick_interval {
        config.tick_interval = parse_tick_interval(text)?;
    }
    if args.no_simulator {
        config.simulator = false;
    }
    if let Some(path) = &args.events_file {
        config.events_file = Some(path.clone());
    }
    if let Some(port) = args.metrics_port {
        if port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "metrics_port".to_string(),
                value: "0".to_string(),
                expected: "a port between 1 and 65535".to_string(),
            }
            .into());
        }
        config.metrics_port = Some(port);
    }
    Ok(config)
}

// ============================================================================
// Session
// ============================================================================

/// Whether the session continues after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Engine, simulator and output for one guidance session.
pub struct Session<W: Write> {
    engine: ProcedureEngine<Panel>,
    simulator: Option<ProcedureSimulator>,
    store: TelemetryStore,
    events: Arc<EventEmitter>,
    out: W,
    shown_revision: Option<u64>,
}

impl<W: Write> Session<W> {
    /// Builds the engine (and simulator, when enabled) over a fresh store.
    #[must_use]
    pub fn new(config: &IngressConfig, events: Arc<EventEmitter>, out: W) -> Self {
        let store = TelemetryStore::new();
        let engine = ProcedureEngine::new(
            ProcedureLibrary::ingress(config.eva),
            store.clone(),
            Panel::new(),
        )
        .with_events(Arc::clone(&events));
        let simulator = config.simulator.then(|| {
            ProcedureSimulator::new(SimulationScript::ingress(config.eva), store.clone())
                .with_events(Arc::clone(&events))
        });

        Self {
            engine,
            simulator,
            store,
            events,
            out,
            shown_revision: None,
        }
    }

    /// Runs one engine tick and prints the panel if it changed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the output cannot be written.
    pub fn tick(&mut self) -> std::io::Result<TickOutcome> {
        let outcome = self.engine.tick();
        let panel = self.engine.display();
        if self.shown_revision != Some(panel.revision()) {
            self.shown_revision = Some(panel.revision());
            writeln!(self.out, "{}", render_panel(panel))?;
        }
        Ok(outcome)
    }

    /// Handles one line of operator input.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the output cannot be written. Bad input is
    /// reported to the operator, not returned.
    pub fn handle(&mut self, line: &str) -> std::io::Result<Flow> {
        let command = match OperatorCommand::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                writeln!(self.out, "{e}")?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            OperatorCommand::Next | OperatorCommand::Prev => {
                let Some(simulator) = self.simulator.as_mut() else {
                    writeln!(self.out, "simulator disabled")?;
                    return Ok(Flow::Continue);
                };
                let moved = if command == OperatorCommand::Next {
                    simulator.advance()
                } else {
                    simulator.retreat()
                };
                if !moved {
                    let bound = if command == OperatorCommand::Next {
                        "last"
                    } else {
                        "first"
                    };
                    writeln!(self.out, "(already at the {bound} step)")?;
                }
                let status = simulator.status_text();
                writeln!(self.out, "{status}")?;
                self.tick()?;
            }
            OperatorCommand::Status => {
                if let Some(simulator) = &self.simulator {
                    writeln!(self.out, "{}", simulator.status_text())?;
                }
                let matrix = self.engine.matrix();
                writeln!(
                    self.out,
                    "{} of {} steps complete\n{}",
                    matrix.completed_count(),
                    matrix.total(),
                    render_panel(self.engine.display())
                )?;
            }
            OperatorCommand::Push { subsystem, json } => {
                match self.store.ingest_named(&subsystem, &json) {
                    Ok(accepted) => {
                        writeln!(self.out, "{accepted} document replaced")?;
                        self.tick()?;
                    }
                    Err(e) => {
                        if let TelemetryError::Malformed { subsystem, .. } = &e {
                            self.events.emit(Event::TelemetryRejected {
                                timestamp: Utc::now(),
                                subsystem: subsystem.to_string(),
                                error: e.to_string(),
                            });
                        }
                        writeln!(self.out, "rejected: {e}")?;
                    }
                }
            }
            OperatorCommand::Help => writeln!(self.out, "{HELP}")?,
            OperatorCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Engine driving the session.
    #[must_use]
    pub const fn engine(&self) -> &ProcedureEngine<Panel> {
        &self.engine
    }
}

/// Instruction line followed by the flagged controls, if any.
#[must_use]
pub fn render_panel(panel: &Panel) -> String {
    let flagged = panel.flagged();
    if flagged.is_empty() {
        format!("> {}", panel.instruction())
    } else {
        let names: Vec<&str> = flagged.iter().map(|c| c.name()).collect();
        format!("> {}\n  flagged: {}", panel.instruction(), names.join(", "))
    }
}

// ============================================================================
// Command Entry Point
// ============================================================================

/// Run an interactive guidance session until `quit`, end of input, or Ctrl-C.
///
/// # Errors
///
/// Returns a configuration or I/O error during setup, an I/O error while
/// reading input or writing output, or [`IngressError::Interrupted`] on
/// Ctrl-C. The session stop is logged and emitted on every exit path.
pub async fn run(args: &RunArgs) -> Result<(), IngressError> {
    let config = resolve_config(args)?;

    if let Some(port) = config.metrics_port {
        init_metrics(Some(port))?;
    }
    let events = Arc::new(match &config.events_file {
        Some(path) => EventEmitter::from_file(path)?,
        None => EventEmitter::noop(),
    });

    info!(
        eva = %config.eva,
        simulator = config.simulator,
        tick_interval = ?config.tick_interval,
        "starting ingress session"
    );
    events.emit(Event::SessionStarted {
        timestamp: Utc::now(),
        eva: config.eva.to_string(),
        simulator: config.simulator,
    });

    let mut session = Session::new(&config, Arc::clone(&events), std::io::stdout());
    if let Some(simulator) = &session.simulator {
        println!("{}", simulator.status_text());
    }
    println!("type 'help' for commands");

    drive(
        &mut session,
        BufReader::new(tokio::io::stdin()),
        config.tick_interval,
        tokio::signal::ctrl_c(),
    )
    .await
}

/// Ticks the engine and feeds it operator lines until the session ends.
///
/// The stop is logged and emitted as `SessionStopped` on every exit path,
/// including I/O failures and `shutdown` resolving (reported as
/// [`IngressError::Interrupted`]).
async fn drive<R, W, S>(
    session: &mut Session<W>,
    input: R,
    tick_interval: Duration,
    shutdown: S,
) -> Result<(), IngressError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    S: Future,
{
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = input.lines();
    tokio::pin!(shutdown);

    let (reason, result) = loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = session.tick() {
                    break ("output error", Err(IngressError::from(e)));
                }
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => match session.handle(&line) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => break ("operator quit", Ok(())),
                    Err(e) => break ("output error", Err(IngressError::from(e))),
                },
                Ok(None) => break ("end of input", Ok(())),
                Err(e) => break ("input error", Err(IngressError::from(e))),
            },
            _ = &mut shutdown => {
                warn!("interrupted");
                break ("interrupted", Err(IngressError::Interrupted));
            }
        }
    };

    info!(
        reason,
        completed = session.engine().matrix().completed_count(),
        "session stopped"
    );
    session.events.emit(Event::SessionStopped {
        timestamp: Utc::now(),
        reason: reason.to_string(),
    });
    result
}
