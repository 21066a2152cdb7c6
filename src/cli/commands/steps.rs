//! Step library listing
//!
//! Prints every phase and step of the ingress procedure, marking which steps
//! wait on telemetry and which panel controls they flag.

use serde::Serialize;

use crate::cli::args::{OutputFormat, StepsArgs};
use crate::error::IngressError;
use crate::procedure::{ProcedureLibrary, StepId};

#[derive(Debug, Serialize)]
struct PhaseView<'a> {
    phase: usize,
    title: &'a str,
    steps: Vec<StepView<'a>>,
}

#[derive(Debug, Serialize)]
struct StepView<'a> {
    id: StepId,
    instruction: &'a str,
    gated: bool,
    indicators: Vec<&'static str>,
}

fn views(library: &ProcedureLibrary) -> Vec<PhaseView<'_>> {
    library
        .phases()
        .iter()
        .enumerate()
        .map(|(p, phase)| PhaseView {
            phase: p + 1,
            title: phase.title(),
            steps: phase
                .steps()
                .iter()
                .enumerate()
                .map(|(s, step)| StepView {
                    id: StepId::new(p + 1, s + 1),
                    instruction: step.instruction(),
                    gated: !step.gate().is_trivial(),
                    indicators: step.indicators().iter().map(|i| i.control.name()).collect(),
                })
                .collect(),
        })
        .collect()
}

/// Renders the library as indented human-readable text.
#[must_use]
pub fn render_human(library: &ProcedureLibrary) -> String {
    let mut out = String::new();
    for phase in views(library) {
        out.push_str(&format!("Phase {}: {}\n", phase.phase, phase.title));
        for step in phase.steps {
            let gate = if step.gated { "gated" } else { "immediate" };
            out.push_str(&format!("  {}  {} [{gate}]", step.id, step.instruction));
            if !step.indicators.is_empty() {
                out.push_str(&format!(" ({})", step.indicators.join(", ")));
            }
            out.push('\n');
        }
    }
    out
}

/// Print the step library.
///
/// # Errors
///
/// Returns `IngressError::Json` if JSON serialization fails.
pub fn run(args: &StepsArgs) -> Result<(), IngressError> {
    let library = ProcedureLibrary::ingress(args.eva);
    match args.format {
        OutputFormat::Human => print!("{}", render_human(&library)),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&views(&library))?);
        }
    }
    Ok(())
}
