//! Remote radio unit: traffic-driven thermal and power model with threshold
//! alarms.
//!
//! Alarms are derived from the values that are reported, never from a second
//! independent draw:
//!
//! | Alarm             | Trigger                                                |
//! |-------------------|--------------------------------------------------------|
//! | over-temperature  | thermal estimate > 50 °C (> 45 °C for 5G radios)        |
//! | VSWR              | reported VSWR > 2.0                                    |
//! | power supply      | reported input voltage outside [43 V, 57 V]            |
//!
//! The internal temperature field is capped at 50 °C, so the over-temperature
//! alarm looks at the estimate before the cap.

use tt_core::{
    DeviceClass, DeviceId, DeviceRng, Measurements, RadioAlarms, RadioTechnology,
    RadioUnitMeasurements, RadioUnitSpec, Sample,
};

use crate::{GenContext, SampleGenerator, SequenceState};

pub const INTERNAL_TEMP_CAP_C: f64 = 50.0;
pub const PA_TEMP_CAP_C: f64 = 85.0;

pub const OVER_TEMP_LTE_C: f64 = 50.0;
pub const OVER_TEMP_NR_C: f64 = 45.0;

pub const VSWR_ALARM: f64 = 2.0;
pub const VOLTAGE_MIN: f64 = 43.0;
pub const VOLTAGE_MAX: f64 = 57.0;

const BUSY_LOAD: (f64, f64) = (0.6, 0.95);
const QUIET_LOAD: (f64, f64) = (0.1, 0.4);

/// Temperature rise at full load above ambient, °C.
const LOAD_RISE_C: f64 = 20.0;
/// PA offset above internal at idle, and extra rise at full load, °C.
const PA_OFFSET_C: f64 = 10.0;
const PA_LOAD_RISE_C: f64 = 15.0;
const THERMAL_JITTER_C: f64 = 2.0;

/// Idle share of rated power.
const IDLE_POWER_SHARE: f64 = 0.3;
const POWER_JITTER: f64 = 0.05;

const VOLTAGE_JITTER: f64 = 6.0;

/// Output backoff at zero load, dB.
const MAX_BACKOFF_DB: f64 = 3.0;

pub struct RadioUnitGenerator {
    spec:  RadioUnitSpec,
    state: SequenceState,
}

impl RadioUnitGenerator {
    pub fn new(device_id: DeviceId, spec: RadioUnitSpec) -> Self {
        Self { spec, state: SequenceState::new(device_id) }
    }

    #[inline]
    pub fn spec(&self) -> &RadioUnitSpec {
        &self.spec
    }

    fn over_temperature_threshold(&self) -> f64 {
        match self.spec.technology {
            RadioTechnology::Lte => OVER_TEMP_LTE_C,
            RadioTechnology::Nr => OVER_TEMP_NR_C,
        }
    }
}

impl SampleGenerator for RadioUnitGenerator {
    fn device_id(&self) -> &DeviceId {
        self.state.device_id()
    }

    fn class(&self) -> DeviceClass {
        DeviceClass::Rru
    }

    fn sequence(&self) -> u64 {
        self.state.sequence()
    }

    fn generate(&mut self, ctx: &GenContext<'_>, rng: &mut DeviceRng) -> Sample {
        let env = ctx.env;

        let (lo, hi) = if env.is_busy_hour() { BUSY_LOAD } else { QUIET_LOAD };
        let load = rng.gen_range(lo..=hi);

        let thermal_estimate = env.temperature + LOAD_RISE_C * load + rng.jitter(THERMAL_JITTER_C);
        let internal_temperature = thermal_estimate.min(INTERNAL_TEMP_CAP_C);
        let pa_temperature = (thermal_estimate
            + PA_OFFSET_C
            + PA_LOAD_RISE_C * load
            + rng.jitter(THERMAL_JITTER_C))
        .min(PA_TEMP_CAP_C);

        let power_consumption = self.spec.rated_power_w.max(0.0)
            * (IDLE_POWER_SHARE + (1.0 - IDLE_POWER_SHARE) * load)
            * (1.0 + rng.jitter(POWER_JITTER));

        let input_voltage = self.spec.nominal_voltage.abs() + rng.jitter(VOLTAGE_JITTER);
        let current = if input_voltage > 0.0 { power_consumption / input_voltage } else { 0.0 };

        let vswr = rng.gen_range(1.05..=2.2);
        let output_power_dbm = self.spec.max_tx_power_dbm - MAX_BACKOFF_DB * (1.0 - load);

        let alarms = RadioAlarms {
            over_temperature: thermal_estimate > self.over_temperature_threshold(),
            vswr:             vswr > VSWR_ALARM,
            power_supply:     !(VOLTAGE_MIN..=VOLTAGE_MAX).contains(&input_voltage),
        };

        let (sequence_number, timestamp) = self.state.next(ctx.now);
        Sample {
            device_id: self.state.device_id().clone(),
            timestamp,
            sequence_number,
            measurements: Measurements::Rru(RadioUnitMeasurements {
                traffic_load: load * 100.0,
                ambient_temperature: env.temperature,
                internal_temperature,
                pa_temperature,
                output_power_dbm,
                power_consumption,
                input_voltage,
                current,
                vswr,
                alarms,
            }),
        }
    }
}
