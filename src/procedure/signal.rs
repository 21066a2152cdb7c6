//! Telemetry signals read by gates and indicators
//!
//! Each signal knows which subsystem document it lives in and reads as
//! `None` when that document has not been received yet.

use crate::telemetry::schema::{DcuEva, EvaTelemetry, UiaState};
use crate::telemetry::{EvaSlot, TelemetrySnapshot};

/// A boolean field of the UIA document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiaSignal {
    /// EMU power switch
    Power(EvaSlot),
    /// Oxygen supply switch
    Oxy(EvaSlot),
    /// Water supply valve
    WaterSupply(EvaSlot),
    /// Water waste valve
    WaterWaste(EvaSlot),
    /// Shared oxygen vent
    OxyVent,
    /// Depress pump
    Depress,
}

impl UiaSignal {
    /// Reads the signal, or `None` if no UIA document has arrived.
    #[must_use]
    pub fn read(self, snapshot: &TelemetrySnapshot) -> Option<bool> {
        snapshot.uia.as_ref().map(|doc| self.value(&doc.uia))
    }

    /// Reads the signal from a UIA panel.
    #[must_use]
    pub const fn value(self, uia: &UiaState) -> bool {
        match self {
            Self::Power(slot) => uia.power(slot),
            Self::Oxy(slot) => uia.oxy(slot),
            Self::WaterSupply(slot) => uia.water_supply(slot),
            Self::WaterWaste(slot) => uia.water_waste(slot),
            Self::OxyVent => uia.oxy_vent,
            Self::Depress => uia.depress,
        }
    }

    /// Writes the signal into a UIA panel.
    pub const fn set(self, uia: &mut UiaState, value: bool) {
        let field = match self {
            Self::Power(slot) => uia.power_mut(slot),
            Self::Oxy(EvaSlot::Eva1) => &mut uia.eva1_oxy,
            Self::Oxy(EvaSlot::Eva2) => &mut uia.eva2_oxy,
            Self::WaterSupply(EvaSlot::Eva1) => &mut uia.eva1_water_supply,
            Self::WaterSupply(EvaSlot::Eva2) => &mut uia.eva2_water_supply,
            Self::WaterWaste(slot) => uia.water_waste_mut(slot),
            Self::OxyVent => &mut uia.oxy_vent,
            Self::Depress => &mut uia.depress,
        };
        *field = value;
    }
}

/// A switch on a suit's DCU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DcuControl {
    /// Battery source: umbilical / local
    Batt,
    /// Oxygen source: primary / secondary
    Oxy,
    /// Comm channel: A / B
    Comm,
    /// Fan: primary / secondary
    Fan,
    /// Pump: open / closed
    Pump,
    /// CO2 scrubber bank: A / B
    Co2,
}

impl DcuControl {
    /// Switch name as printed on the DCU.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Batt => "batt",
            Self::Oxy => "oxy",
            Self::Comm => "comm",
            Self::Fan => "fan",
            Self::Pump => "pump",
            Self::Co2 => "co2",
        }
    }

    /// Name of the mode the switch is in when it reads `mode`.
    #[must_use]
    pub const fn mode_name(self, mode: bool) -> &'static str {
        match (self, mode) {
            (Self::Batt, true) => "umbilical",
            (Self::Batt, false) => "local",
            (Self::Oxy | Self::Fan, true) => "primary",
            (Self::Oxy | Self::Fan, false) => "secondary",
            (Self::Comm | Self::Co2, true) => "A",
            (Self::Comm | Self::Co2, false) => "B",
            (Self::Pump, true) => "open",
            (Self::Pump, false) => "closed",
        }
    }

    /// Reads the switch of one suit, or `None` if no DCU document has arrived.
    #[must_use]
    pub fn read(self, slot: EvaSlot, snapshot: &TelemetrySnapshot) -> Option<bool> {
        snapshot
            .dcu
            .as_ref()
            .map(|doc| self.value(doc.dcu.eva(slot)))
    }

    /// Reads the switch from a suit's DCU record.
    #[must_use]
    pub const fn value(self, dcu: &DcuEva) -> bool {
        match self {
            Self::Batt => dcu.batt,
            Self::Oxy => dcu.oxy,
            Self::Comm => dcu.comm,
            Self::Fan => dcu.fan,
            Self::Pump => dcu.pump,
            Self::Co2 => dcu.co2,
        }
    }

    /// Writes the switch into a suit's DCU record.
    pub const fn set(self, dcu: &mut DcuEva, mode: bool) {
        match self {
            Self::Batt => dcu.batt = mode,
            Self::Oxy => dcu.oxy = mode,
            Self::Comm => dcu.comm = mode,
            Self::Fan => dcu.fan = mode,
            Self::Pump => dcu.pump = mode,
            Self::Co2 => dcu.co2 = mode,
        }
    }
}

/// A numeric suit reading from the telemetry document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reading {
    /// Primary oxygen tank storage
    OxyPrimaryStorage(EvaSlot),
    /// Secondary oxygen tank storage
    OxySecondaryStorage(EvaSlot),
    /// Coolant volume
    Coolant(EvaSlot),
}

impl Reading {
    /// Short label used in operator prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OxyPrimaryStorage(_) => "O2 primary",
            Self::OxySecondaryStorage(_) => "O2 secondary",
            Self::Coolant(_) => "coolant",
        }
    }

    /// Suit the reading belongs to.
    #[must_use]
    pub const fn slot(self) -> EvaSlot {
        match self {
            Self::OxyPrimaryStorage(slot) | Self::OxySecondaryStorage(slot) | Self::Coolant(slot) => {
                slot
            }
        }
    }

    /// Reads the value, or `None` if no telemetry document has arrived.
    #[must_use]
    pub fn read(self, snapshot: &TelemetrySnapshot) -> Option<f64> {
        snapshot
            .telemetry
            .as_ref()
            .map(|doc| self.value(doc.telemetry.eva(self.slot())))
    }

    /// Reads the value from a suit's vitals.
    #[must_use]
    pub const fn value(self, eva: &EvaTelemetry) -> f64 {
        match self {
            Self::OxyPrimaryStorage(_) => eva.oxy_pri_storage,
            Self::OxySecondaryStorage(_) => eva.oxy_sec_storage,
            Self::Coolant(_) => eva.coolant_ml,
        }
    }
}

/// A named control point the operator can be directed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControlPoint {
    Emu1Power,
    Ev1Supply,
    Ev1Waste,
    Ev2Supply,
    Ev2Waste,
    Emu2Power,
    Emu1Oxy,
    Emu2Oxy,
    O2Vent,
    DepressPump,
}

impl ControlPoint {
    /// Every control point, in panel order.
    pub const ALL: [Self; 10] = [
        Self::Emu1Power,
        Self::Ev1Supply,
        Self::Ev1Waste,
        Self::Ev2Supply,
        Self::Ev2Waste,
        Self::Emu2Power,
        Self::Emu1Oxy,
        Self::Emu2Oxy,
        Self::O2Vent,
        Self::DepressPump,
    ];

    /// Panel label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Emu1Power => "EMU1_POWER",
            Self::Ev1Supply => "EV1_SUPPLY",
            Self::Ev1Waste => "EV1_WASTE",
            Self::Ev2Supply => "EV2_SUPPLY",
            Self::Ev2Waste => "EV2_WASTE",
            Self::Emu2Power => "EMU2_POWER",
            Self::Emu1Oxy => "EMU1_OXY",
            Self::Emu2Oxy => "EMU2_OXY",
            Self::O2Vent => "O2_VENT",
            Self::DepressPump => "DEPRESS_PUMP",
        }
    }

    /// EMU power switch of a suit.
    #[must_use]
    pub const fn power(slot: EvaSlot) -> Self {
        match slot {
            EvaSlot::Eva1 => Self::Emu1Power,
            EvaSlot::Eva2 => Self::Emu2Power,
        }
    }

    /// Oxygen switch of a suit.
    #[must_use]
    pub const fn oxy(slot: EvaSlot) -> Self {
        match slot {
            EvaSlot::Eva1 => Self::Emu1Oxy,
            EvaSlot::Eva2 => Self::Emu2Oxy,
        }
    }

    /// Water supply valve of a suit.
    #[must_use]
    pub const fn supply(slot: EvaSlot) -> Self {
        match slot {
            EvaSlot::Eva1 => Self::Ev1Supply,
            EvaSlot::Eva2 => Self::Ev2Supply,
        }
    }

    /// Water waste valve of a suit.
    #[must_use]
    pub const fn waste(slot: EvaSlot) -> Self {
        match slot {
            EvaSlot::Eva1 => Self::Ev1Waste,
            EvaSlot::Eva2 => Self::Ev2Waste,
        }
    }
}

impl std::fmt::Display for ControlPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
