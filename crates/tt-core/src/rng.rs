//! Seeded random streams.
//!
//! A run draws from two kinds of stream, both `SmallRng` underneath:
//!
//! - [`SimRng`] is site-wide.  The builder splits it with [`SimRng::child`]
//!   into one stream for the weather and one for device bookkeeping.
//! - [`DeviceRng`] belongs to one fleet slot and is seeded from the run seed
//!   and that slot alone:
//!
//!   ```text
//!   seed = run_seed XOR (slot * SLOT_SPREAD)
//!   ```
//!
//!   A device's readings therefore do not depend on how many other devices
//!   exist, on generation order, or on which Rayon worker produced them.

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::DeviceIndex;

/// Golden-ratio multiplier; spreads neighbouring slots across the seed space.
const SLOT_SPREAD: u64 = 0x9e37_79b9_7f4a_7c15;

/// Uniform in `[-amplitude, amplitude]`; 0 for a non-positive amplitude.
fn symmetric(rng: &mut SmallRng, amplitude: f64) -> f64 {
    if amplitude > 0.0 {
        rng.gen_range(-amplitude..=amplitude)
    } else {
        0.0
    }
}

/// Random stream owned by one device's generator.
pub struct DeviceRng(SmallRng);

impl DeviceRng {
    pub fn new(run_seed: u64, slot: DeviceIndex) -> Self {
        let seed = run_seed ^ u64::from(slot.0).wrapping_mul(SLOT_SPREAD);
        DeviceRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Reading noise of at most `amplitude` either way.
    #[inline]
    pub fn jitter(&mut self, amplitude: f64) -> f64 {
        symmetric(&mut self.0, amplitude)
    }
}

/// Site-wide random stream.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Split off an independent stream.  Distinct `stream` ids give distinct
    /// sequences even when taken in the same order.
    pub fn child(&mut self, stream: u64) -> SimRng {
        let seed = self.0.r#gen::<u64>() ^ stream.wrapping_mul(SLOT_SPREAD);
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn jitter(&mut self, amplitude: f64) -> f64 {
        symmetric(&mut self.0, amplitude)
    }

    /// `true` with probability `p`, clamped to [0, 1].
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
