//! Metrics collection for `suit-ingress`.
//!
//! Prometheus-compatible counters and gauges behind the `metrics` facade.
//! Without an installed recorder every call is a no-op.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::IngressError;
use crate::telemetry::Subsystem;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Direction of a simulator move, used as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Advance,
    Retreat,
}

impl MoveDirection {
    /// Lowercase label used in metrics and events.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Retreat => "retreat",
        }
    }
}

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without an
/// HTTP endpoint.
///
/// # Errors
///
/// Returns `IngressError::Io` if the recorder or HTTP listener cannot be
/// installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), IngressError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| IngressError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!(
        "suit_ingress_ticks_total",
        "Total number of procedure engine ticks"
    );
    describe_counter!(
        "suit_ingress_steps_completed_total",
        "Steps marked complete, by phase"
    );
    describe_counter!(
        "suit_ingress_simulator_moves_total",
        "Simulator cursor commands, by direction and outcome"
    );
    describe_counter!(
        "suit_ingress_telemetry_rejected_total",
        "Subsystem documents rejected as malformed"
    );
    describe_gauge!(
        "suit_ingress_progress_percent",
        "Simulator progress through the procedure"
    );
}

/// Records one engine tick.
pub fn record_tick() {
    counter!("suit_ingress_ticks_total").increment(1);
}

/// Records a step completion in a 1-based phase.
pub fn record_step_completed(phase: usize) {
    counter!("suit_ingress_steps_completed_total", "phase" => phase.to_string()).increment(1);
}

/// Records a simulator command and whether the cursor moved.
pub fn record_simulator_move(direction: MoveDirection, moved: bool) {
    counter!(
        "suit_ingress_simulator_moves_total",
        "direction" => direction.label(),
        "moved" => if moved { "true" } else { "false" },
    )
    .increment(1);
}

/// Records a rejected subsystem document.
pub fn record_telemetry_rejected(subsystem: Subsystem) {
    counter!("suit_ingress_telemetry_rejected_total", "subsystem" => subsystem.name())
        .increment(1);
}

/// Sets the simulator progress gauge.
pub fn set_progress(percent: u8) {
    gauge!("suit_ingress_progress_percent").set(f64::from(percent));
}
