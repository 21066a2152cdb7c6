//! Telemetry store
//!
//! Typed subsystem documents and the shared store that writers replace and
//! the procedure engine reads.
//!
//! # Architecture
//!
//! - [`Subsystem`]: Names of the documents the host ingests
//! - [`schema`]: Serde mirrors of each document
//! - [`TelemetryStore`]: Shared last-write-wins store, one slot per subsystem
//! - [`TelemetrySnapshot`]: Point-in-time copy read by one engine tick

pub mod schema;
pub mod store;

pub use schema::EvaSlot;
pub use store::{TelemetrySnapshot, TelemetryStore};

use std::str::FromStr;

use crate::error::TelemetryError;

/// A named telemetry subsystem document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    /// Umbilical interface assembly switches
    Uia,
    /// Display and control unit switches
    Dcu,
    /// Suit vitals
    Telemetry,
    /// Rover position
    Rover,
    /// Spectrometer scans
    Spec,
    /// Inertial position
    Imu,
    /// Communications tower
    Comm,
}

impl Subsystem {
    /// Every subsystem, in display order.
    pub const ALL: [Self; 7] = [
        Self::Uia,
        Self::Dcu,
        Self::Telemetry,
        Self::Rover,
        Self::Spec,
        Self::Imu,
        Self::Comm,
    ];

    /// Canonical subsystem name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uia => "UIA",
            Self::Dcu => "DCU",
            Self::Telemetry => "Telemetry",
            Self::Rover => "Rover",
            Self::Spec => "Spec",
            Self::Imu => "IMU",
            Self::Comm => "Comm",
        }
    }
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Subsystem {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|subsystem| subsystem.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| TelemetryError::UnknownSubsystem { name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsystem_names_round_trip() {
        for subsystem in Subsystem::ALL {
            assert_eq!(subsystem.name().parse::<Subsystem>().unwrap(), subsystem);
        }
    }

    #[test]
    fn subsystem_parse_ignores_case() {
        assert_eq!("uia".parse::<Subsystem>().unwrap(), Subsystem::Uia);
        assert_eq!("TELEMETRY".parse::<Subsystem>().unwrap(), Subsystem::Telemetry);
        assert!("suit".parse::<Subsystem>().is_err());
    }
}
