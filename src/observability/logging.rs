//! Session logging to stderr.
//!
//! Stdout belongs to the operator panel, so every log line goes to stderr.
//! Verbosity flags raise the level for this crate only; dependencies stay at
//! `warn`. `SUIT_INGRESS_LOG_LEVEL` replaces the whole filter when set.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{ColorChoice, LogFormatChoice};

/// Environment variable holding a full `EnvFilter` directive.
pub const LOG_LEVEL_ENV: &str = "SUIT_INGRESS_LOG_LEVEL";

/// Log line rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Human => Self::Human,
            LogFormatChoice::Json => Self::Json,
        }
    }
}

/// Level for `suit_ingress` targets at a given `-v` count.
#[must_use]
pub const fn crate_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Filter directive used when the environment override is absent.
#[must_use]
pub fn default_directive(verbosity: u8) -> String {
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), crate_level(verbosity))
}

/// Whether stderr output should carry ANSI colors.
///
/// `NO_COLOR` only suppresses colors in `auto` mode.
#[must_use]
pub const fn ansi_enabled(
    color: ColorChoice,
    stderr_is_terminal: bool,
    no_color: bool,
) -> bool {
    match color {
        ColorChoice::Auto => stderr_is_terminal && !no_color,
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    }
}

/// Installs the global subscriber.
///
/// A second call is a no-op (`try_init`).
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    // Module paths only help once the operator is debugging the engine.
    let show_target = verbosity >= 2;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(show_target)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Human => builder
            .with_ansi(ansi_enabled(
                color,
                std::io::stderr().is_terminal(),
                std::env::var_os("NO_COLOR").is_some(),
            ))
            .try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
