//! The `SampleGenerator` trait and its per-class dispatch enum.

use chrono::{DateTime, Utc};
use tt_core::{DeviceClass, DeviceId, DeviceRng, Sample};

use crate::{AntennaGenerator, GenContext, MicrowaveGenerator, RadioUnitGenerator};

/// One telemetry algorithm bound to one device.
///
/// A generator owns its device's immutable specification and a sequence
/// counter; it never keeps the samples it produces.  Randomness comes from the
/// per-device [`DeviceRng`] the scheduler passes in, so a generator is
/// deterministic for a given seed regardless of thread ordering.
pub trait SampleGenerator: Send {
    fn device_id(&self) -> &DeviceId;

    fn class(&self) -> DeviceClass;

    /// Sequence number of the most recently generated sample (0 before the
    /// first call).
    fn sequence(&self) -> u64;

    /// Produce the next sample.  Increments the sequence counter.
    fn generate(&mut self, ctx: &GenContext<'_>, rng: &mut DeviceRng) -> Sample;
}

// ── SequenceState ─────────────────────────────────────────────────────────────

/// Envelope bookkeeping shared by every generator.
///
/// Guarantees a strictly increasing sequence number starting at 1 and a
/// timestamp that never goes backwards, even if the clock does.
#[derive(Clone, Debug)]
pub struct SequenceState {
    device_id:      DeviceId,
    sequence:       u64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl SequenceState {
    pub fn new(device_id: DeviceId) -> Self {
        Self { device_id, sequence: 0, last_timestamp: None }
    }

    #[inline]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Advance the counter and stamp the next sample.
    pub fn next(&mut self, now: DateTime<Utc>) -> (u64, DateTime<Utc>) {
        self.sequence += 1;
        let timestamp = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(timestamp);
        (self.sequence, timestamp)
    }
}

// ── DeviceGenerator ───────────────────────────────────────────────────────────

/// Closed set of generators, one variant per device class.
///
/// The fleet is homogeneous in type so the scheduler can keep it in a plain
/// `Vec` and hand it to Rayon without boxing.
pub enum DeviceGenerator {
    Antenna(AntennaGenerator),
    Rru(RadioUnitGenerator),
    Microwave(MicrowaveGenerator),
}

impl SampleGenerator for DeviceGenerator {
    fn device_id(&self) -> &DeviceId {
        match self {
            DeviceGenerator::Antenna(g) => g.device_id(),
            DeviceGenerator::Rru(g) => g.device_id(),
            DeviceGenerator::Microwave(g) => g.device_id(),
        }
    }

    fn class(&self) -> DeviceClass {
        match self {
            DeviceGenerator::Antenna(_) => DeviceClass::Antenna,
            DeviceGenerator::Rru(_) => DeviceClass::Rru,
            DeviceGenerator::Microwave(_) => DeviceClass::Microwave,
        }
    }

    fn sequence(&self) -> u64 {
        match self {
            DeviceGenerator::Antenna(g) => g.sequence(),
            DeviceGenerator::Rru(g) => g.sequence(),
            DeviceGenerator::Microwave(g) => g.sequence(),
        }
    }

    #[inline]
    fn generate(&mut self, ctx: &GenContext<'_>, rng: &mut DeviceRng) -> Sample {
        match self {
            DeviceGenerator::Antenna(g) => g.generate(ctx, rng),
            DeviceGenerator::Rru(g) => g.generate(ctx, rng),
            DeviceGenerator::Microwave(g) => g.generate(ctx, rng),
        }
    }
}
