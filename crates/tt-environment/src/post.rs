//! Site-wide corrections applied to every freshly generated sample.
//!
//! | Field                                   | Correction                            |
//! |-----------------------------------------|---------------------------------------|
//! | `temperature`, `ambientTemperature`     | replaced by the snapshot temperature  |
//! | `humidity`                              | replaced by the snapshot humidity     |
//! | `signalStrength`                        | − particulate × 0.01 dB, re-clamped   |
//! | `powerConsumption`                      | × 1.15 when ambient > 35 °C           |
//! | `current` (RRU)                         | same factor, so `current = P / V`     |
//!
//! Fields a sample type does not have are left alone.  The correction is a
//! total function: no input can make it fail.

use tt_core::{Measurements, Sample};

use crate::EnvironmentSnapshot;

/// Signal penalty per unit of particulate index, dB.
pub const PARTICULATE_PENALTY_DB: f64 = 0.01;

/// Ambient temperature above which cooling load inflates power draw, °C.
pub const HEAT_THRESHOLD_C: f64 = 35.0;

/// Power multiplier applied above [`HEAT_THRESHOLD_C`].
pub const HEAT_POWER_FACTOR: f64 = 1.15;

/// Antenna signal-strength envelope, dBm.
pub const SIGNAL_MIN_DBM: f64 = -120.0;
pub const SIGNAL_MAX_DBM: f64 = -50.0;

#[derive(Copy, Clone, Debug, Default)]
pub struct PostProcessor;

impl PostProcessor {
    /// Correct every sample in `batch` against the same snapshot.
    pub fn apply_batch(&self, batch: &mut [Sample], env: &EnvironmentSnapshot) {
        for sample in batch {
            self.apply(sample, env);
        }
    }

    pub fn apply(&self, sample: &mut Sample, env: &EnvironmentSnapshot) {
        let heat_factor = if env.temperature > HEAT_THRESHOLD_C {
            HEAT_POWER_FACTOR
        } else {
            1.0
        };
        let penalty = env.particulate_index.max(0.0) * PARTICULATE_PENALTY_DB;

        match &mut sample.measurements {
            Measurements::Antenna(m) => {
                m.temperature = env.temperature;
                m.humidity = env.humidity;
                m.signal_strength =
                    (m.signal_strength - penalty).clamp(SIGNAL_MIN_DBM, SIGNAL_MAX_DBM);
                m.power_consumption *= heat_factor;
            }
            Measurements::Rru(m) => {
                m.ambient_temperature = env.temperature;
                m.power_consumption *= heat_factor;
                m.current *= heat_factor;
            }
            Measurements::Microwave(m) => {
                m.temperature = env.temperature;
                m.humidity = env.humidity;
                m.power_consumption *= heat_factor;
            }
        }
    }
}
