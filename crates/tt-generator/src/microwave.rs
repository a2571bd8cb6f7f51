//! Microwave backhaul link budget.
//!
//! ```text
//! RSL          = Ptx − FSPL − A_rain
//! noise floor  = −174 + 10·log10(B_Hz) + NF
//! SNR          = RSL − noise floor
//! link margin  = RSL − receiver sensitivity
//! modulation   = ladder(SNR)            (fixed if adaptive modulation is off)
//! capacity     = B_MHz · bits/symbol · clamp(SNR/30, 0.3, 1.0)
//! ```

use tt_core::{
    DeviceClass, DeviceId, DeviceRng, Measurements, MicrowaveMeasurements, MicrowaveSpec, Sample,
};

use crate::{GenContext, SampleGenerator, SequenceState, rf};

/// ATPC wander around the configured transmit power, dB.
const TX_JITTER_DB: f64 = 0.5;

/// Outdoor-unit draw: base plus a per-bit-per-symbol increment, W.
const ODU_BASE_W: f64 = 35.0;
const ODU_W_PER_BIT: f64 = 2.0;
const ODU_JITTER_W: f64 = 3.0;

pub struct MicrowaveGenerator {
    spec:  MicrowaveSpec,
    state: SequenceState,
}

impl MicrowaveGenerator {
    pub fn new(device_id: DeviceId, spec: MicrowaveSpec) -> Self {
        Self { spec, state: SequenceState::new(device_id) }
    }

    #[inline]
    pub fn spec(&self) -> &MicrowaveSpec {
        &self.spec
    }
}

impl SampleGenerator for MicrowaveGenerator {
    fn device_id(&self) -> &DeviceId {
        self.state.device_id()
    }

    fn class(&self) -> DeviceClass {
        DeviceClass::Microwave
    }

    fn sequence(&self) -> u64 {
        self.state.sequence()
    }

    fn generate(&mut self, ctx: &GenContext<'_>, rng: &mut DeviceRng) -> Sample {
        let env = ctx.env;
        let spec = &self.spec;

        let transmit_power = spec.transmit_power_dbm + rng.jitter(TX_JITTER_DB);
        let path_loss = rf::free_space_path_loss_db(spec.range_km, spec.frequency_ghz);
        let rain_attenuation = rf::rain_attenuation_db(env.rain_rate, spec.frequency_ghz, spec.range_km);
        let rsl = transmit_power - path_loss - rain_attenuation;

        let noise_floor = rf::noise_floor_dbm(spec.bandwidth_mhz * 1e6);
        let snr = rsl - noise_floor;
        let link_margin = rsl - spec.receiver_sensitivity_dbm;

        let modulation = if spec.adaptive_modulation {
            rf::select_modulation(snr)
        } else {
            spec.fixed_modulation
        };
        let current_capacity_mbps = rf::capacity_mbps(spec.bandwidth_mhz, modulation, snr);
        let ber = rf::bit_error_rate(snr);

        let power_consumption = ODU_BASE_W
            + ODU_W_PER_BIT * f64::from(modulation.bits_per_symbol())
            + rng.jitter(ODU_JITTER_W);

        let (sequence_number, timestamp) = self.state.next(ctx.now);
        Sample {
            device_id: self.state.device_id().clone(),
            timestamp,
            sequence_number,
            measurements: Measurements::Microwave(MicrowaveMeasurements {
                transmit_power,
                path_loss,
                rain_attenuation,
                rsl,
                noise_floor,
                snr,
                link_margin,
                modulation,
                current_capacity_mbps,
                ber,
                temperature: env.temperature,
                humidity: env.humidity,
                power_consumption,
            }),
        }
    }
}
