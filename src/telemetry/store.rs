//! Shared telemetry store
//!
//! Holds the latest document per subsystem. Writers (the simulator, or a
//! sensor feed) replace documents wholesale; the procedure engine reads a
//! snapshot once per tick. Execution is single-threaded and cooperative, so
//! the store is an `Rc<RefCell<_>>` handle rather than a lock.

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::TelemetryError;
use crate::observability::metrics;

use super::Subsystem;
use super::schema::{
    CommDocument, DcuDocument, ImuDocument, RoverDocument, SpecDocument, TelemetryDocument,
    UiaDocument,
};

/// Latest document per subsystem; `None` until the first update arrives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub uia: Option<UiaDocument>,
    pub dcu: Option<DcuDocument>,
    pub telemetry: Option<TelemetryDocument>,
    pub rover: Option<RoverDocument>,
    pub spec: Option<SpecDocument>,
    pub imu: Option<ImuDocument>,
    pub comm: Option<CommDocument>,
}

impl TelemetrySnapshot {
    /// Returns whether a document has been received for `subsystem`.
    #[must_use]
    pub const fn contains(&self, subsystem: Subsystem) -> bool {
        match subsystem {
            Subsystem::Uia => self.uia.is_some(),
            Subsystem::Dcu => self.dcu.is_some(),
            Subsystem::Telemetry => self.telemetry.is_some(),
            Subsystem::Rover => self.rover.is_some(),
            Subsystem::Spec => self.spec.is_some(),
            Subsystem::Imu => self.imu.is_some(),
            Subsystem::Comm => self.comm.is_some(),
        }
    }
}

/// Cloneable handle to the shared telemetry snapshot.
///
/// Each replace is atomic with respect to the single-threaded tick loop and
/// last-write-wins per subsystem.
#[derive(Debug, Clone, Default)]
pub struct TelemetryStore {
    inner: Rc<RefCell<TelemetrySnapshot>>,
}

impl TelemetryStore {
    /// Creates an empty store (every subsystem absent).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserializes `json` and replaces the document for `subsystem`.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Malformed`] if the document does not
    /// deserialize. The previously stored document is left unchanged.
    pub fn ingest(&self, subsystem: Subsystem, json: &str) -> Result<(), TelemetryError> {
        let mut staged = self.snapshot();
        match subsystem {
            Subsystem::Uia => staged.uia = Some(parse(subsystem, json)?),
            Subsystem::Dcu => staged.dcu = Some(parse(subsystem, json)?),
            Subsystem::Telemetry => staged.telemetry = Some(parse(subsystem, json)?),
            Subsystem::Rover => staged.rover = Some(parse(subsystem, json)?),
            Subsystem::Spec => staged.spec = Some(parse(subsystem, json)?),
            Subsystem::Imu => staged.imu = Some(parse(subsystem, json)?),
            Subsystem::Comm => staged.comm = Some(parse(subsystem, json)?),
        }
        *self.inner.borrow_mut() = staged;
        debug!(%subsystem, "subsystem document replaced");
        Ok(())
    }

    /// Like [`ingest`](Self::ingest), resolving the subsystem by name.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::UnknownSubsystem`] for an unrecognized name,
    /// or [`TelemetryError::Malformed`] if the document does not deserialize.
    pub fn ingest_named(&self, name: &str, json: &str) -> Result<Subsystem, TelemetryError> {
        let subsystem: Subsystem = name.parse()?;
        self.ingest(subsystem, json)?;
        Ok(subsystem)
    }

    /// Replaces the UIA document.
    pub fn replace_uia(&self, doc: UiaDocument) {
        self.inner.borrow_mut().uia = Some(doc);
        debug!(subsystem = %Subsystem::Uia, "subsystem document replaced");
    }

    /// Replaces the DCU document.
    pub fn replace_dcu(&self, doc: DcuDocument) {
        self.inner.borrow_mut().dcu = Some(doc);
        debug!(subsystem = %Subsystem::Dcu, "subsystem document replaced");
    }

    /// Replaces the suit vitals document.
    pub fn replace_telemetry(&self, doc: TelemetryDocument) {
        self.inner.borrow_mut().telemetry = Some(doc);
        debug!(subsystem = %Subsystem::Telemetry, "subsystem document replaced");
    }

    /// Drops the document for `subsystem`, making it absent again.
    pub fn clear(&self, subsystem: Subsystem) {
        let mut snapshot = self.inner.borrow_mut();
        match subsystem {
            Subsystem::Uia => snapshot.uia = None,
            Subsystem::Dcu => snapshot.dcu = None,
            Subsystem::Telemetry => snapshot.telemetry = None,
            Subsystem::Rover => snapshot.rover = None,
            Subsystem::Spec => snapshot.spec = None,
            Subsystem::Imu => snapshot.imu = None,
            Subsystem::Comm => snapshot.comm = None,
        }
    }

    /// Returns a copy of every current document.
    #[must_use]
    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.inner.borrow().clone()
    }

    /// Returns whether a document has been received for `subsystem`.
    #[must_use]
    pub fn contains(&self, subsystem: Subsystem) -> bool {
        self.inner.borrow().contains(subsystem)
    }

    /// Latest UIA document, if any.
    #[must_use]
    pub fn uia(&self) -> Option<UiaDocument> {
        self.inner.borrow().uia.clone()
    }

    /// Latest DCU document, if any.
    #[must_use]
    pub fn dcu(&self) -> Option<DcuDocument> {
        self.inner.borrow().dcu.clone()
    }

    /// Latest suit vitals document, if any.
    #[must_use]
    pub fn telemetry(&self) -> Option<TelemetryDocument> {
        self.inner.borrow().telemetry.clone()
    }

    /// Latest rover document, if any.
    #[must_use]
    pub fn rover(&self) -> Option<RoverDocument> {
        self.inner.borrow().rover.clone()
    }

    /// Latest spectrometer document, if any.
    #[must_use]
    pub fn spec(&self) -> Option<SpecDocument> {
        self.inner.borrow().spec.clone()
    }

    /// Latest IMU document, if any.
    #[must_use]
    pub fn imu(&self) -> Option<ImuDocument> {
        self.inner.borrow().imu.clone()
    }

    /// Latest comm tower document, if any.
    #[must_use]
    pub fn comm(&self) -> Option<CommDocument> {
        self.inner.borrow().comm.clone()
    }
}

fn parse<T: DeserializeOwned>(subsystem: Subsystem, json: &str) -> Result<T, TelemetryError> {
    serde_json::from_str(json).map_err(|source| {
        warn!(%subsystem, error = %source, "rejected malformed subsystem document");
        metrics::record_telemetry_rejected(subsystem);
        TelemetryError::Malformed { subsystem, source }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const UIA_POWER_ON: &str = r#"{"uia":{"eva1_power":true,"eva1_oxy":false,
        "eva1_water_supply":false,"eva1_water_waste":false,"eva2_power":false,
        "eva2_oxy":false,"eva2_water_supply":false,"eva2_water_waste":false,
        "oxy_vent":false,"depress":false}}"#;

    #[test]
    fn new_store_is_empty() {
        let store = TelemetryStore::new();
        for subsystem in Subsystem::ALL {
            assert!(!store.contains(subsystem), "{subsystem} should be absent");
        }
        assert_eq!(store.snapshot(), TelemetrySnapshot::default());
    }

    #[test]
    fn ingest_replaces_document() {
        let store = TelemetryStore::new();
        store.ingest(Subsystem::Uia, UIA_POWER_ON).unwrap();
        assert!(store.uia().unwrap().uia.eva1_power);
        assert!(store.dcu().is_none());
    }

    #[test]
    fn malformed_update_keeps_previous_document() {
        let store = TelemetryStore::new();
        store.ingest(Subsystem::Uia, UIA_POWER_ON).unwrap();

        let err = store
            .ingest(Subsystem::Uia, r#"{"uia":{"eva1_power":"#)
            .unwrap_err();
        assert!(matches!(
            err,
            TelemetryError::Malformed {
                subsystem: Subsystem::Uia,
                ..
            }
        ));
        assert!(store.uia().unwrap().uia.eva1_power);
    }

    #[test]
    fn malformed_first_update_leaves_subsystem_absent() {
        let store = TelemetryStore::new();
        assert!(store.ingest(Subsystem::Dcu, r#"{"dcu":{}}"#).is_err());
        assert!(!store.contains(Subsystem::Dcu));
    }

    #[test]
    fn ingest_named_resolves_case_insensitively() {
        let store = TelemetryStore::new();
        let subsystem = store
            .ingest_named("comm", r#"{"comm":{"comm_tower":true}}"#)
            .unwrap();
        assert_eq!(subsystem, Subsystem::Comm);
        assert!(store.comm().unwrap().comm.comm_tower);

        let err = store.ingest_named("lidar", "{}").unwrap_err();
        assert!(matches!(err, TelemetryError::UnknownSubsystem { .. }));
    }

    #[test]
    fn clones_share_state() {
        let writer = TelemetryStore::new();
        let reader = writer.clone();
        writer.replace_uia(UiaDocument::default());
        assert!(reader.contains(Subsystem::Uia));
        writer.clear(Subsystem::Uia);
        assert!(!reader.contains(Subsystem::Uia));
    }

    #[test]
    fn snapshot_is_detached_copy() {
        let store = TelemetryStore::new();
        let before = store.snapshot();
        store.replace_dcu(DcuDocument::default());
        assert!(before.dcu.is_none());
        assert!(store.snapshot().dcu.is_some());
    }
}
