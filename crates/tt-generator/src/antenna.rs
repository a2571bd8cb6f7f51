//! Directional sector antenna.

use tt_core::{
    AntennaMeasurements, AntennaSpec, DeviceClass, DeviceId, DeviceRng, Exposure, Measurements,
    Sample,
};
use tt_environment::post::{SIGNAL_MAX_DBM, SIGNAL_MIN_DBM};

use crate::{GenContext, SampleGenerator, SequenceState, wind};

/// Urban received-signal baseline, dBm.
const BASE_SIGNAL_DBM: (f64, f64) = (-95.0, -75.0);

/// Humidity above which moisture on the radome starts to cost signal.
const HUMIDITY_KNEE: f64 = 80.0;
const HUMIDITY_DB_PER_PCT: f64 = 0.15;
const RAIN_DB_PER_MM_H: f64 = 0.05;

/// Upper bound of the load-dependent degradation, dB.
const BUSY_TRAFFIC_DB: f64 = 5.0;
const QUIET_TRAFFIC_DB: f64 = 1.5;

/// Mechanical sway per m/s of wind, degrees.
const AZIMUTH_SWAY_DEG: f64 = 0.05;
const TILT_SWAY_DEG: f64 = 0.02;

pub struct AntennaGenerator {
    spec:     AntennaSpec,
    exposure: Exposure,
    state:    SequenceState,
}

impl AntennaGenerator {
    /// Wind load is computed for exposure C until
    /// [`with_exposure`](Self::with_exposure) says otherwise.
    pub fn new(device_id: DeviceId, spec: AntennaSpec) -> Self {
        Self { spec, exposure: Exposure::default(), state: SequenceState::new(device_id) }
    }

    /// Terrain exposure of the site, from its tower description.
    pub fn with_exposure(mut self, exposure: Exposure) -> Self {
        self.exposure = exposure;
        self
    }

    #[inline]
    pub fn spec(&self) -> &AntennaSpec {
        &self.spec
    }
}

impl SampleGenerator for AntennaGenerator {
    fn device_id(&self) -> &DeviceId {
        self.state.device_id()
    }

    fn class(&self) -> DeviceClass {
        DeviceClass::Antenna
    }

    fn sequence(&self) -> u64 {
        self.state.sequence()
    }

    fn generate(&mut self, ctx: &GenContext<'_>, rng: &mut DeviceRng) -> Sample {
        let env = ctx.env;
        let spec = &self.spec;

        let base = rng.gen_range(BASE_SIGNAL_DBM.0..=BASE_SIGNAL_DBM.1);
        let humidity_loss = (env.humidity - HUMIDITY_KNEE).max(0.0) * HUMIDITY_DB_PER_PCT;
        let rain_loss = env.rain_rate.max(0.0) * RAIN_DB_PER_MM_H;
        let traffic_loss = if env.is_busy_hour() {
            rng.gen_range(0.0..=BUSY_TRAFFIC_DB)
        } else {
            rng.gen_range(0.0..=QUIET_TRAFFIC_DB)
        };
        let signal_strength =
            (base - humidity_loss - rain_loss - traffic_loss).clamp(SIGNAL_MIN_DBM, SIGNAL_MAX_DBM);

        let vswr = rng.gen_range(1.05..=1.5);
        let return_loss = rng.gen_range(14.0..=26.0);
        let snr = rng.gen_range(10.0..=30.0);

        let wind_speed = env.wind_speed.max(0.0);
        let azimuth_actual =
            (spec.azimuth_deg + rng.jitter(wind_speed * AZIMUTH_SWAY_DEG)).rem_euclid(360.0);
        let tilt_actual = spec.mechanical_tilt_deg
            + spec.electrical_tilt_deg
            + rng.jitter(wind_speed * TILT_SWAY_DEG);

        let is_active = spec.is_active();
        let power_consumption = if is_active {
            spec.max_power_w.max(0.0) * rng.gen_range(0.6..=1.0)
        } else {
            0.0
        };

        let wind_load_n = wind::wind_load_n(
            wind_speed,
            spec.mount_height_m,
            spec.drag_coefficient,
            spec.wind_area_m2,
            self.exposure,
        );

        let (sequence_number, timestamp) = self.state.next(ctx.now);
        Sample {
            device_id: self.state.device_id().clone(),
            timestamp,
            sequence_number,
            measurements: Measurements::Antenna(AntennaMeasurements {
                signal_strength,
                vswr,
                return_loss,
                snr,
                azimuth_actual,
                tilt_actual,
                temperature: env.temperature,
                humidity: env.humidity,
                power_consumption,
                wind_load_n,
                is_active,
            }),
        }
    }
}
