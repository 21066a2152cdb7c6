//! Error types for `suit-ingress`
//!
//! Domain errors for configuration, telemetry ingestion, procedure
//! construction and operator input, plus the exit codes the CLI maps
//! command failures to.
//!
//! Unmet gates are not errors. The procedure engine has no failure path of
//! its own; a gate that never clears simply leaves progress incomplete.

use std::path::PathBuf;
use thiserror::Error;

use crate::telemetry::Subsystem;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `suit-ingress` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `suit-ingress` operations.
#[derive(Debug, Error)]
pub enum IngressError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Session interrupted by SIGINT
    #[error("interrupted")]
    Interrupted,
}

impl IngressError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Json(_) => ExitCode::ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Interrupted => ExitCode::INTERRUPTED,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Telemetry Errors
// ============================================================================

/// Telemetry store errors.
///
/// A failed update is fatal for that single call only: the store keeps the
/// previous document for the subsystem.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The serialized document could not be deserialized
    #[error("malformed {subsystem} document: {source}")]
    Malformed {
        /// Subsystem the document was addressed to
        subsystem: Subsystem,
        /// Underlying deserialization failure
        #[source]
        source: serde_json::Error,
    },

    /// The subsystem name is not one the store knows about
    #[error("unknown subsystem '{name}'")]
    UnknownSubsystem {
        /// Name as supplied by the caller
        name: String,
    },
}

// ============================================================================
// Procedure Errors
// ============================================================================

/// Step library construction errors.
#[derive(Debug, Error)]
pub enum ProcedureError {
    /// A procedure must contain at least one phase
    #[error("procedure has no phases")]
    NoPhases,

    /// Every phase must contain at least one step
    #[error("phase {phase} ('{title}') has no steps")]
    EmptyPhase {
        /// 1-based phase index
        phase: usize,
        /// Phase title
        title: String,
    },
}

// ============================================================================
// Operator Command Errors
// ============================================================================

/// Operator input that is not a session command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Unrecognized command word, with the closest known command
    #[error("unknown command '{input}' (did you mean '{suggestion}'?)")]
    Unknown {
        /// Word as typed
        input: String,
        /// Closest command word
        suggestion: &'static str,
    },

    /// Unrecognized command word with no close match
    #[error("unknown command '{input}', type 'help' for commands")]
    Unrecognized {
        /// Word as typed
        input: String,
    },

    /// `push` without both a subsystem and a document
    #[error("usage: push <subsystem> <json>")]
    PushUsage,
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `suit-ingress` operations.
pub type Result<T> = std::result::Result<T, IngressError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::ERROR, 1);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::INTERRUPTED, 130);
    }

    #[test]
    fn test_json_error_exit_code() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: IngressError = source.into();
        assert_eq!(err.exit_code(), ExitCode::ERROR);
    }

    #[test]
    fn test_telemetry_error_display() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = TelemetryError::Malformed {
            subsystem: Subsystem::Uia,
            source,
        };
        assert!(err.to_string().starts_with("malformed UIA document"));
    }

    #[test]
    fn test_command_error_display() {
        let err = CommandError::Unknown {
            input: "stauts".to_string(),
            suggestion: "status",
        };
        assert_eq!(err.to_string(), "unknown command 'stauts' (did you mean 'status'?)");
        let err = CommandError::Unrecognized {
            input: "xyzzy".to_string(),
        };
        assert_eq!(err.to_string(), "unknown command 'xyzzy', type 'help' for commands");
        assert_eq!(CommandError::PushUsage.to_string(), "usage: push <subsystem> <json>");
    }

    #[test]
    fn test_config_error_exit_code() {
        let err: IngressError = ConfigError::MissingFile {
            path: PathBuf::from("/test"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: IngressError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_interrupted_exit_code() {
        assert_eq!(IngressError::Interrupted.exit_code(), ExitCode::INTERRUPTED);
    }

    #[test]
    fn test_empty_phase_display() {
        let err = ProcedureError::EmptyPhase {
            phase: 3,
            title: "Empty Water Tanks".to_string(),
        };
        assert_eq!(err.to_string(), "phase 3 ('Empty Water Tanks') has no steps");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ParseError {
            path: PathBuf::from("ingress.yaml"),
            line: Some(4),
            message: "unexpected token".to_string(),
        };
        assert!(err.to_string().contains("ingress.yaml"));
        assert!(err.to_string().contains("unexpected token"));
    }
}
