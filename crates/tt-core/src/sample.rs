//! Telemetry sample records.
//!
//! A [`Sample`] is a common envelope (`deviceId`, `timestamp`,
//! `sequenceNumber`) plus a class-specific [`Measurements`] payload.  On the
//! wire the payload's fields are flattened into the envelope next to a
//! `deviceType` tag:
//!
//! ```json
//! { "deviceId": "ANT-001", "timestamp": "2024-07-01T10:00:00Z",
//!   "sequenceNumber": 3, "deviceType": "antenna", "signalStrength": -82.4, … }
//! ```
//!
//! Samples are immutable once handed to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DeviceClass, DeviceId, Modulation};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub device_id: DeviceId,
    pub timestamp: DateTime<Utc>,
    pub sequence_number: u64,
    #[serde(flatten)]
    pub measurements: Measurements,
}

impl Sample {
    #[inline]
    pub fn class(&self) -> DeviceClass {
        self.measurements.class()
    }

    /// `true` if the payload raises any alarm.  Only radio units carry alarms.
    pub fn has_alarm(&self) -> bool {
        match &self.measurements {
            Measurements::Rru(m) => m.alarms.any(),
            _ => false,
        }
    }
}

/// Class-specific measurement payload, tagged by `deviceType`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "deviceType", rename_all = "lowercase")]
pub enum Measurements {
    Antenna(AntennaMeasurements),
    Rru(RadioUnitMeasurements),
    Microwave(MicrowaveMeasurements),
}

impl Measurements {
    pub fn class(&self) -> DeviceClass {
        match self {
            Measurements::Antenna(_) => DeviceClass::Antenna,
            Measurements::Rru(_) => DeviceClass::Rru,
            Measurements::Microwave(_) => DeviceClass::Microwave,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AntennaMeasurements {
    /// dBm, always within [−120, −50].
    pub signal_strength: f64,
    pub vswr: f64,
    /// dB.
    pub return_loss: f64,
    /// dB.
    pub snr: f64,
    pub azimuth_actual: f64,
    pub tilt_actual: f64,
    pub temperature: f64,
    pub humidity: f64,
    /// W.
    pub power_consumption: f64,
    /// N, aerodynamic force on the antenna face.
    pub wind_load_n: f64,
    pub is_active: bool,
}

/// Threshold alarms, each derived from a reported measurement.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioAlarms {
    pub over_temperature: bool,
    pub vswr: bool,
    pub power_supply: bool,
}

impl RadioAlarms {
    #[inline]
    pub fn any(&self) -> bool {
        self.over_temperature || self.vswr || self.power_supply
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioUnitMeasurements {
    /// Percent of capacity, [0, 100].
    pub traffic_load: f64,
    pub ambient_temperature: f64,
    /// °C, capped at 50.
    pub internal_temperature: f64,
    /// Power-amplifier temperature, °C, capped at 85.
    pub pa_temperature: f64,
    pub output_power_dbm: f64,
    /// W.
    pub power_consumption: f64,
    /// Magnitude of the DC input voltage, V.
    pub input_voltage: f64,
    /// A.
    pub current: f64,
    pub vswr: f64,
    pub alarms: RadioAlarms,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicrowaveMeasurements {
    /// dBm.
    pub transmit_power: f64,
    /// Free-space path loss, dB.
    pub path_loss: f64,
    /// dB.
    pub rain_attenuation: f64,
    /// Received signal level, dBm.
    pub rsl: f64,
    /// dBm.
    pub noise_floor: f64,
    /// dB.
    pub snr: f64,
    /// RSL minus receiver sensitivity, dB.
    pub link_margin: f64,
    pub modulation: Modulation,
    pub current_capacity_mbps: f64,
    pub ber: f64,
    pub temperature: f64,
    pub humidity: f64,
    /// W.
    pub power_consumption: f64,
}
