//! Configuration file schema
//!
//! The on-disk YAML shape ([`ConfigFile`]) and the validated runtime
//! settings ([`IngressConfig`]) produced by the loader.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::EvaSlot;

/// Default engine tick period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Raw configuration document.
///
/// ```yaml
/// tick_interval: 250ms
/// eva: eva2
/// simulator: true
/// events_file: ingress-events.jsonl
/// metrics_port: 9464
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Tick period as a humantime string (`100ms`, `1s`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_interval: Option<String>,

    /// Suit being guided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eva: Option<EvaSlot>,

    /// Whether the telemetry simulator drives the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulator: Option<bool>,

    /// JSONL event output path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_file: Option<PathBuf>,

    /// Prometheus exporter port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}

/// Validated runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressConfig {
    /// Engine tick period (never zero).
    pub tick_interval: Duration,
    /// Suit being guided.
    pub eva: EvaSlot,
    /// Whether the telemetry simulator drives the store.
    pub simulator: bool,
    /// JSONL event output path.
    pub events_file: Option<PathBuf>,
    /// Prometheus exporter port.
    pub metrics_port: Option<u16>,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            eva: EvaSlot::default(),
            simulator: true,
            events_file: None,
            metrics_port: None,
        }
    }
}
