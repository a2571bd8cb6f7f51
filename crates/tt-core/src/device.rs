//! Device records and their class-specific specification blocks.
//!
//! A [`Device`] is created once at simulation startup and persisted by the
//! retention store.  Its [`DeviceSpec`] never changes during a run; only the
//! [`DeviceStatus`] moves.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DeviceId, GeoLocation};

// ── Classification ────────────────────────────────────────────────────────────

/// The three equipment classes mounted on a tower.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Directional sector antenna.
    Antenna,
    /// Remote radio unit.
    Rru,
    /// Microwave backhaul link (one hop, modelled from the near end).
    Microwave,
}

impl DeviceClass {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceClass::Antenna => "antenna",
            DeviceClass::Rru => "rru",
            DeviceClass::Microwave => "microwave",
        }
    }

    /// Prefix used for generated names and serial numbers.
    pub fn prefix(self) -> &'static str {
        match self {
            DeviceClass::Antenna => "ANT",
            DeviceClass::Rru => "RRU",
            DeviceClass::Microwave => "MW",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational status.  The only mutable part of a device record.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    #[default]
    Active,
    /// At least one alarm is raised on the latest sample.
    Warning,
    Maintenance,
    Offline,
}

impl DeviceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceStatus::Active => "active",
            DeviceStatus::Warning => "warning",
            DeviceStatus::Maintenance => "maintenance",
            DeviceStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Modulation ────────────────────────────────────────────────────────────────

/// Microwave modulation schemes, ordered from most robust to highest order.
///
/// The derived `Ord` follows declaration order, so `Qpsk < Qam16 < … <
/// Qam4096`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Modulation {
    #[serde(rename = "QPSK")]
    Qpsk,
    #[serde(rename = "16QAM")]
    Qam16,
    #[serde(rename = "64QAM")]
    Qam64,
    #[serde(rename = "256QAM")]
    Qam256,
    #[serde(rename = "512QAM")]
    Qam512,
    #[serde(rename = "1024QAM")]
    Qam1024,
    #[serde(rename = "2048QAM")]
    Qam2048,
    #[serde(rename = "4096QAM")]
    Qam4096,
}

impl Modulation {
    /// Spectral efficiency in bits per symbol.
    pub fn bits_per_symbol(self) -> u32 {
        match self {
            Modulation::Qpsk => 2,
            Modulation::Qam16 => 4,
            Modulation::Qam64 => 6,
            Modulation::Qam256 => 8,
            Modulation::Qam512 => 9,
            Modulation::Qam1024 => 10,
            Modulation::Qam2048 => 11,
            Modulation::Qam4096 => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Modulation::Qpsk => "QPSK",
            Modulation::Qam16 => "16QAM",
            Modulation::Qam64 => "64QAM",
            Modulation::Qam256 => "256QAM",
            Modulation::Qam512 => "512QAM",
            Modulation::Qam1024 => "1024QAM",
            Modulation::Qam2048 => "2048QAM",
            Modulation::Qam4096 => "4096QAM",
        }
    }
}

impl fmt::Display for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Radio access technology generation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum RadioTechnology {
    #[serde(rename = "4G")]
    Lte,
    #[serde(rename = "5G")]
    Nr,
}

// ── Specification blocks ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AntennaSpec {
    pub model: String,
    pub frequency_bands_mhz: Vec<u32>,
    pub gain_dbi: f64,
    pub beamwidth_deg: f64,
    pub azimuth_deg: f64,
    pub mechanical_tilt_deg: f64,
    pub electrical_tilt_deg: f64,
    pub max_power_w: f64,
    pub mount_height_m: f64,
    pub weight_kg: f64,
    pub wind_area_m2: f64,
    pub drag_coefficient: f64,
}

impl AntennaSpec {
    /// Lowest band of an active (massive-MIMO) antenna, MHz.
    pub const ACTIVE_BAND_FLOOR_MHZ: u32 = 3_300;

    /// Active antennas carry their own radios; detected by band membership.
    pub fn is_active(&self) -> bool {
        self.frequency_bands_mhz
            .iter()
            .any(|&band| band >= Self::ACTIVE_BAND_FLOOR_MHZ)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioUnitSpec {
    pub model: String,
    pub technology: RadioTechnology,
    pub frequency_bands_mhz: Vec<u32>,
    pub max_tx_power_dbm: f64,
    pub rated_power_w: f64,
    /// DC bus voltage, negative by telecom convention (−48 V).
    pub nominal_voltage: f64,
    pub ports: u32,
    pub weight_kg: f64,
    #[serde(default = "default_rru_wind_area")]
    pub wind_area_m2: f64,
    #[serde(default = "default_box_drag")]
    pub drag_coefficient: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicrowaveSpec {
    pub model: String,
    pub frequency_ghz: f64,
    pub bandwidth_mhz: f64,
    pub range_km: f64,
    pub transmit_power_dbm: f64,
    pub receiver_sensitivity_dbm: f64,
    pub adaptive_modulation: bool,
    pub fixed_modulation: Modulation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub far_end_id: Option<DeviceId>,
    /// Outdoor unit plus dish.
    #[serde(default = "default_link_weight")]
    pub weight_kg: f64,
    #[serde(default = "default_link_wind_area")]
    pub wind_area_m2: f64,
    #[serde(default = "default_box_drag")]
    pub drag_coefficient: f64,
}

fn default_rru_wind_area() -> f64 {
    0.6
}

fn default_link_weight() -> f64 {
    25.0
}

fn default_link_wind_area() -> f64 {
    0.3
}

fn default_box_drag() -> f64 {
    1.0
}

/// Class-specific specification block.
///
/// Serialized untagged: the enclosing [`Device`] already carries the class in
/// its `type` field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceSpec {
    Antenna(AntennaSpec),
    Rru(RadioUnitSpec),
    Microwave(MicrowaveSpec),
}

impl DeviceSpec {
    pub fn class(&self) -> DeviceClass {
        match self {
            DeviceSpec::Antenna(_) => DeviceClass::Antenna,
            DeviceSpec::Rru(_) => DeviceClass::Rru,
            DeviceSpec::Microwave(_) => DeviceClass::Microwave,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            DeviceSpec::Antenna(s) => &s.model,
            DeviceSpec::Rru(s) => &s.model,
            DeviceSpec::Microwave(s) => &s.model,
        }
    }
}

// ── Device ────────────────────────────────────────────────────────────────────

/// A persisted device record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    #[serde(rename = "type")]
    pub class: DeviceClass,
    pub location: GeoLocation,
    pub installation_date: DateTime<Utc>,
    pub last_maintenance: DateTime<Utc>,
    pub status: DeviceStatus,
    pub firmware: String,
    pub serial_number: String,
    pub specifications: DeviceSpec,
}
