//! Telemetry subsystem documents
//!
//! Typed mirrors of the JSON documents published by the telemetry server.
//! Every document is wrapped in a single top-level key named after its
//! subsystem (`{"uia": {...}}`, `{"dcu": {...}}`, ...) and is always replaced
//! wholesale.
//!
//! Fields that a procedure gate reads are required; a document missing one
//! of them fails to deserialize instead of silently reading as `false`/`0`.
//! Vitals nothing gates on default to zero.

use serde::{Deserialize, Serialize};

/// Suit slot selecting the per-EVA record inside a document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum EvaSlot {
    /// First suit (`eva1`, shown to the operator as EV-1).
    #[default]
    Eva1,
    /// Second suit (`eva2`, shown to the operator as EV-2).
    Eva2,
}

impl EvaSlot {
    /// Operator-facing suit label (`EV-1` / `EV-2`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Eva1 => "EV-1",
            Self::Eva2 => "EV-2",
        }
    }

    /// Suit number (1 or 2).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Eva1 => 1,
            Self::Eva2 => 2,
        }
    }
}

impl std::fmt::Display for EvaSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "eva{}", self.number())
    }
}

// ============================================================================
// UIA
// ============================================================================

/// Umbilical interface assembly document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UiaDocument {
    /// Switch states.
    pub uia: UiaState,
}

/// UIA switch panel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct UiaState {
    pub eva1_power: bool,
    pub eva1_oxy: bool,
    pub eva1_water_supply: bool,
    pub eva1_water_waste: bool,
    pub eva2_power: bool,
    pub eva2_oxy: bool,
    pub eva2_water_supply: bool,
    pub eva2_water_waste: bool,
    pub oxy_vent: bool,
    pub depress: bool,
}

impl UiaState {
    /// EMU power switch for a suit.
    #[must_use]
    pub const fn power(&self, slot: EvaSlot) -> bool {
        match slot {
            EvaSlot::Eva1 => self.eva1_power,
            EvaSlot::Eva2 => self.eva2_power,
        }
    }

    /// Mutable EMU power switch for a suit.
    pub const fn power_mut(&mut self, slot: EvaSlot) -> &mut bool {
        match slot {
            EvaSlot::Eva1 => &mut self.eva1_power,
            EvaSlot::Eva2 => &mut self.eva2_power,
        }
    }

    /// Oxygen supply switch for a suit.
    #[must_use]
    pub const fn oxy(&self, slot: EvaSlot) -> bool {
        match slot {
            EvaSlot::Eva1 => self.eva1_oxy,
            EvaSlot::Eva2 => self.eva2_oxy,
        }
    }

    /// Water supply valve for a suit.
    #[must_use]
    pub const fn water_supply(&self, slot: EvaSlot) -> bool {
        match slot {
            EvaSlot::Eva1 => self.eva1_water_supply,
            EvaSlot::Eva2 => self.eva2_water_supply,
        }
    }

    /// Water waste valve for a suit.
    #[must_use]
    pub const fn water_waste(&self, slot: EvaSlot) -> bool {
        match slot {
            EvaSlot::Eva1 => self.eva1_water_waste,
            EvaSlot::Eva2 => self.eva2_water_waste,
        }
    }

    /// Mutable water waste valve for a suit.
    pub const fn water_waste_mut(&mut self, slot: EvaSlot) -> &mut bool {
        match slot {
            EvaSlot::Eva1 => &mut self.eva1_water_waste,
            EvaSlot::Eva2 => &mut self.eva2_water_waste,
        }
    }
}

// ============================================================================
// DCU
// ============================================================================

/// Display and control unit document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DcuDocument {
    /// Per-suit switch states.
    pub dcu: DcuState,
}

/// DCU switch states for both suits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DcuState {
    pub eva1: DcuEva,
    pub eva2: DcuEva,
}

impl DcuState {
    /// Switch record for a suit.
    #[must_use]
    pub const fn eva(&self, slot: EvaSlot) -> &DcuEva {
        match slot {
            EvaSlot::Eva1 => &self.eva1,
            EvaSlot::Eva2 => &self.eva2,
        }
    }

    /// Mutable switch record for a suit.
    pub const fn eva_mut(&mut self, slot: EvaSlot) -> &mut DcuEva {
        match slot {
            EvaSlot::Eva1 => &mut self.eva1,
            EvaSlot::Eva2 => &mut self.eva2,
        }
    }
}

/// DCU switches of one suit.
///
/// `batt`: umbilical (`true`) / local. `oxy`, `fan`: primary / secondary.
/// `comm`, `co2`: A / B. `pump`: open / closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct DcuEva {
    pub batt: bool,
    pub oxy: bool,
    pub comm: bool,
    pub fan: bool,
    pub pump: bool,
    pub co2: bool,
}

// ============================================================================
// Telemetry
// ============================================================================

/// Suit vitals document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TelemetryDocument {
    /// Vitals for both suits.
    pub telemetry: TelemetryState,
}

/// Vitals for both suits plus the EVA clock.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TelemetryState {
    #[serde(default)]
    pub eva_time: f64,
    pub eva1: EvaTelemetry,
    pub eva2: EvaTelemetry,
}

impl TelemetryState {
    /// Vitals for a suit.
    #[must_use]
    pub const fn eva(&self, slot: EvaSlot) -> &EvaTelemetry {
        match slot {
            EvaSlot::Eva1 => &self.eva1,
            EvaSlot::Eva2 => &self.eva2,
        }
    }

    /// Mutable vitals for a suit.
    pub const fn eva_mut(&mut self, slot: EvaSlot) -> &mut EvaTelemetry {
        match slot {
            EvaSlot::Eva1 => &mut self.eva1,
            EvaSlot::Eva2 => &mut self.eva2,
        }
    }
}

/// Vitals of one suit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaTelemetry {
    pub oxy_pri_storage: f64,
    pub oxy_sec_storage: f64,
    pub coolant_ml: f64,
    #[serde(default)]
    pub oxy_pri_pressure: f64,
    #[serde(default)]
    pub oxy_sec_pressure: f64,
    #[serde(default)]
    pub batt_time_left: f64,
    #[serde(default)]
    pub oxy_time_left: f64,
    #[serde(default)]
    pub heart_rate: f64,
    #[serde(default)]
    pub oxy_consumption: f64,
    #[serde(default)]
    pub co2_production: f64,
    #[serde(default)]
    pub suit_pressure_oxy: f64,
    #[serde(default)]
    pub suit_pressure_co2: f64,
    #[serde(default)]
    pub suit_pressure_other: f64,
    #[serde(default)]
    pub suit_pressure_total: f64,
    #[serde(default)]
    pub fan_pri_rpm: f64,
    #[serde(default)]
    pub fan_sec_rpm: f64,
    #[serde(default)]
    pub helmet_pressure_co2: f64,
    #[serde(default)]
    pub scrubber_a_co2_storage: f64,
    #[serde(default)]
    pub scrubber_b_co2_storage: f64,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub coolant_gas_pressure: f64,
    #[serde(default)]
    pub coolant_liquid_pressure: f64,
}

// ============================================================================
// Auxiliary subsystems (stored, not gated on)
// ============================================================================

/// Rover position document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoverDocument {
    pub rover: RoverState,
}

/// Rover position and last scanned marker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoverState {
    pub posx: f64,
    pub posy: f64,
    pub qr_id: i64,
}

/// Spectrometer scan document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecDocument {
    pub spec: SpecState,
}

/// Latest sample scan per suit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecState {
    pub eva1: EvaSpec,
    pub eva2: EvaSpec,
}

/// One rock sample scan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaSpec {
    pub name: String,
    pub id: i64,
    pub data: SpecComposition,
}

/// Oxide composition of a sample, in weight percent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecComposition {
    #[serde(rename = "SiO2")]
    pub sio2: f64,
    #[serde(rename = "TiO2")]
    pub tio2: f64,
    #[serde(rename = "Al2O3")]
    pub al2o3: f64,
    #[serde(rename = "FeO")]
    pub feo: f64,
    #[serde(rename = "MnO")]
    pub mno: f64,
    #[serde(rename = "MgO")]
    pub mgo: f64,
    #[serde(rename = "CaO")]
    pub cao: f64,
    #[serde(rename = "K2O")]
    pub k2o: f64,
    #[serde(rename = "P2O3")]
    pub p2o3: f64,
}

/// Inertial position document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImuDocument {
    pub imu: ImuState,
}

/// Position and heading per suit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImuState {
    pub eva1: ImuEva,
    pub eva2: ImuEva,
}

/// Position and heading of one suit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImuEva {
    pub posx: f64,
    pub posy: f64,
    pub heading: f64,
}

/// Communications tower document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommDocument {
    pub comm: CommState,
}

/// Communications tower status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommState {
    pub comm_tower: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uia_document_round_trips_wire_names() {
        let json = r#"{"uia":{"eva1_power":true,"eva1_oxy":false,"eva1_water_supply":false,
            "eva1_water_waste":true,"eva2_power":false,"eva2_oxy":false,
            "eva2_water_supply":false,"eva2_water_waste":false,"oxy_vent":true,"depress":false}}"#;
        let doc: UiaDocument = serde_json::from_str(json).unwrap();
        assert!(doc.uia.power(EvaSlot::Eva1));
        assert!(doc.uia.water_waste(EvaSlot::Eva1));
        assert!(!doc.uia.water_waste(EvaSlot::Eva2));
        assert!(doc.uia.oxy_vent);
    }

    #[test]
    fn uia_document_requires_every_switch() {
        let json = r#"{"uia":{"eva1_power":true}}"#;
        assert!(serde_json::from_str::<UiaDocument>(json).is_err());
    }

    #[test]
    fn telemetry_defaults_vitals_but_requires_gated_fields() {
        let json = r#"{"telemetry":{
            "eva1":{"oxy_pri_storage":42.0,"oxy_sec_storage":7.5,"coolant_ml":3.0},
            "eva2":{"oxy_pri_storage":0,"oxy_sec_storage":0,"coolant_ml":0}}}"#;
        let doc: TelemetryDocument = serde_json::from_str(json).unwrap();
        let eva1 = doc.telemetry.eva(EvaSlot::Eva1);
        assert!((eva1.oxy_pri_storage - 42.0).abs() < f64::EPSILON);
        assert!((eva1.heart_rate).abs() < f64::EPSILON);
        assert!((doc.telemetry.eva_time).abs() < f64::EPSILON);

        let missing = r#"{"telemetry":{"eva1":{"oxy_pri_storage":1},"eva2":{}}}"#;
        assert!(serde_json::from_str::<TelemetryDocument>(missing).is_err());
    }

    #[test]
    fn spec_composition_uses_oxide_names() {
        let json = r#"{"spec":{
            "eva1":{"name":"basalt","id":3,"data":{"SiO2":45.1,"TiO2":1.2,"Al2O3":10.0,
                "FeO":12.0,"MnO":0.2,"MgO":9.1,"CaO":10.3,"K2O":0.1,"P2O3":0.3}},
            "eva2":{"name":"","id":0,"data":{"SiO2":0,"TiO2":0,"Al2O3":0,
                "FeO":0,"MnO":0,"MgO":0,"CaO":0,"K2O":0,"P2O3":0}}}}"#;
        let doc: SpecDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.spec.eva1.name, "basalt");
        assert!((doc.spec.eva1.data.sio2 - 45.1).abs() < f64::EPSILON);
    }

    #[test]
    fn eva_slot_labels() {
        assert_eq!(EvaSlot::Eva1.label(), "EV-1");
        assert_eq!(EvaSlot::Eva2.label(), "EV-2");
        assert_eq!(EvaSlot::Eva2.to_string(), "eva2");
        assert_eq!(EvaSlot::default(), EvaSlot::Eva1);
    }
}
