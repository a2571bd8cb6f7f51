//! Flat row form of a sample, as written by the CSV exporter.

use serde::Serialize;
use tt_core::{Measurements, Sample};

use crate::StoreResult;

/// Column names, in order.
pub const SAMPLE_COLUMNS: [&str; 10] = [
    "device_id",
    "device_type",
    "timestamp",
    "sequence_number",
    "temperature",
    "humidity",
    "power_consumption",
    "signal_level",
    "snr",
    "measurements",
];

/// One sample flattened to the columns shared across device classes.  Fields
/// a class does not report are left empty; the full payload is kept as JSON
/// in `measurements`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRow<'a> {
    pub device_id:         &'a str,
    pub device_type:       &'static str,
    /// RFC 3339.
    pub timestamp:         String,
    pub sequence_number:   u64,
    pub temperature:       Option<f64>,
    pub humidity:          Option<f64>,
    pub power_consumption: f64,
    /// dBm: antenna signal strength, radio unit output power, microwave RSL.
    pub signal_level:      Option<f64>,
    pub snr:               Option<f64>,
    pub measurements:      String,
}

impl<'a> SampleRow<'a> {
    pub fn from_sample(sample: &'a Sample) -> StoreResult<Self> {
        let (temperature, humidity, power_consumption, signal_level, snr) = match &sample.measurements {
            Measurements::Antenna(m) => (
                Some(m.temperature),
                Some(m.humidity),
                m.power_consumption,
                Some(m.signal_strength),
                Some(m.snr),
            ),
            Measurements::Rru(m) => (
                Some(m.internal_temperature),
                None,
                m.power_consumption,
                Some(m.output_power_dbm),
                None,
            ),
            Measurements::Microwave(m) => (
                Some(m.temperature),
                Some(m.humidity),
                m.power_consumption,
                Some(m.rsl),
                Some(m.snr),
            ),
        };
        Ok(Self {
            device_id: sample.device_id.as_str(),
            device_type: sample.class().as_str(),
            timestamp: sample.timestamp.to_rfc3339(),
            sequence_number: sample.sequence_number,
            temperature,
            humidity,
            power_consumption,
            signal_level,
            snr,
            measurements: serde_json::to_string(&sample.measurements)?,
        })
    }
}
