//! CLI argument definitions
//!
//! All Clap derive structs for `suit-ingress` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::telemetry::EvaSlot;

// ============================================================================
// Root CLI
// ============================================================================

/// Gated suit ingress procedure with a telemetry simulator.
#[derive(Parser, Debug)]
#[command(name = "suit-ingress", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "SUIT_INGRESS_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormatChoice,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an interactive ingress guidance session.
    Run(RunArgs),

    /// Print the ingress step library.
    Steps(StepsArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `run`.
///
/// Flags override values from the configuration file.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "SUIT_INGRESS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suit to guide through ingress.
    #[arg(long)]
    pub eva: Option<EvaSlot>,

    /// Engine tick period (e.g. `100ms`, `1s`).
    #[arg(long)]
    pub tick_interval: Option<String>,

    /// Do not start the telemetry simulator.
    #[arg(long)]
    pub no_simulator: bool,

    /// Write JSONL events to this file.
    #[arg(long)]
    pub events_file: Option<PathBuf>,

    /// Serve Prometheus metrics on this port.
    #[arg(long)]
    pub metrics_port: Option<u16>,
}

/// Arguments for `steps`.
#[derive(Args, Debug)]
pub struct StepsArgs {
    /// Suit the instructions address.
    #[arg(long, default_value = "eva1")]
    pub eva: EvaSlot,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Log format choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormatChoice {
    /// Human-readable lines.
    #[default]
    Human,
    /// Newline-delimited JSON.
    Json,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_flags() {
        let cli = Cli::try_parse_from([
            "suit-ingress",
            "-vv",
            "run",
            "--eva",
            "eva2",
            "--tick-interval",
            "250ms",
            "--no-simulator",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.eva, Some(EvaSlot::Eva2));
        assert_eq!(args.tick_interval.as_deref(), Some("250ms"));
        assert!(args.no_simulator);
    }

    #[test]
    fn steps_defaults() {
        let cli = Cli::try_parse_from(["suit-ingress", "steps"]).unwrap();
        let Commands::Steps(args) = cli.command else {
            panic!("expected steps");
        };
        assert_eq!(args.eva, EvaSlot::Eva1);
        assert_eq!(args.format, OutputFormat::Human);
    }
}
