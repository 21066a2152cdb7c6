//! Configuration loader
//!
//! Loading pipeline:
//! 1. Environment variable expansion (`${VAR}`, `${VAR:-default}`) on raw text
//! 2. YAML parsing with unknown keys rejected
//! 3. Validation into an [`IngressConfig`]

use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::config::schema::{ConfigFile, DEFAULT_TICK_INTERVAL, IngressConfig};
use crate::error::ConfigError;

/// Loads and validates configuration files.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Creates a loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if the file cannot be read,
    /// [`ConfigError::ParseError`] for malformed YAML or unknown keys, and
    /// [`ConfigError::InvalidValue`] for values that fail validation.
    pub fn load(&self, path: &Path) -> Result<IngressConfig, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        let config = self.parse(&raw, path)?;
        debug!(path = %path.display(), ?config, "configuration loaded");
        Ok(config)
    }

    /// Parses configuration text; `path` is only used in error messages.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus the missing-file case.
    pub fn parse(&self, raw: &str, path: &Path) -> Result<IngressConfig, ConfigError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        let expanded = expand_env_vars(raw).map_err(|message| ConfigError::ParseError {
            path: path.to_path_buf(),
            line: None,
            message,
        })?;

        if expanded.trim().is_empty() {
            return Ok(IngressConfig::default());
        }

        let file: ConfigFile =
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        validate(file)
    }
}

/// Converts a parsed file into runtime settings, applying defaults.
fn validate(file: ConfigFile) -> Result<IngressConfig, ConfigError> {
    let defaults = IngressConfig::default();

    let tick_interval = match file.tick_interval {
        Some(text) => parse_tick_interval(&text)?,
        None => DEFAULT_TICK_INTERVAL,
    };

    if file.metrics_port == Some(0) {
        return Err(ConfigError::InvalidValue {
            field: "metrics_port".to_string(),
            value: "0".to_string(),
            expected: "a port between 1 and 65535".to_string(),
        });
    }

    Ok(IngressConfig {
        tick_interval,
        eva: file.eva.unwrap_or(defaults.eva),
        simulator: file.simulator.unwrap_or(defaults.simulator),
        events_file: file.events_file,
        metrics_port: file.metrics_port,
    })
}

/// Parses a humantime duration, rejecting zero.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for unparseable or zero durations.
pub fn parse_tick_interval(text: &str) -> Result<Duration, ConfigError> {
    let invalid = |expected: &str| ConfigError::InvalidValue {
        field: "tick_interval".to_string(),
        value: text.to_string(),
        expected: expected.to_string(),
    };
    let duration = humantime::parse_duration(text.trim())
        .map_err(|_| invalid("a duration such as 100ms or 1s"))?;
    if duration.is_zero() {
        return Err(invalid("a non-zero duration"));
    }
    Ok(duration)
}

/// Expands `${VAR}` and `${VAR:-default}` references.
///
/// Unset variables without a default expand to an empty string. `$$` is a
/// literal `$`.
fn expand_env_vars(raw: &str) -> Result<String, String> {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                chars.next();
                result.push('$');
            }
            Some('{') => {
                chars.next();
                let mut reference = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    reference.push(c);
                }
                if !closed {
                    return Err(format!("unclosed environment variable reference: ${{{reference}"));
                }
                let (name, default) = reference
                    .split_once(":-")
                    .map_or((reference.as_str(), None), |(n, d)| (n, Some(d)));
                match std::env::var(name) {
                    Ok(value) => result.push_str(&value),
                    Err(_) => result.push_str(default.unwrap_or_default()),
                }
            }
            _ => result.push('$'),
        }
    }

    Ok(result)
}
