//! Wind pressure on a tower and its equipment (ASCE 7 style).
//!
//! ```text
//! qz = 0.613 · Kz · Kzt · Kd · V²      (N/m², V in m/s)
//! F  = qz · Cf · A                     (N)
//! ```
//!
//! `Kz` is stepwise below the last breakpoint of the terrain exposure and a
//! power law above it.

use tt_core::Exposure;

/// Topographic factor (flat terrain).
pub const KZT: f64 = 1.0;

/// Wind directionality factor.
pub const KD: f64 = 0.95;

/// `Kz` table for one exposure category.
struct ExposureProfile {
    /// `(height limit m, Kz)`, ascending.
    steps: &'static [(f64, f64)],
    base:  f64,
    alpha: f64,
}

const EXPOSURE_B: ExposureProfile = ExposureProfile {
    steps: &[(9.1, 0.57), (12.2, 0.62), (15.2, 0.66)],
    base:  0.57,
    alpha: 7.0,
};

const EXPOSURE_C: ExposureProfile = ExposureProfile {
    steps: &[(4.6, 0.85), (6.1, 0.90), (9.1, 0.98), (12.2, 1.04), (15.2, 1.09)],
    base:  0.85,
    alpha: 9.5,
};

const EXPOSURE_D: ExposureProfile = ExposureProfile {
    steps: &[(4.6, 1.03), (6.1, 1.08), (9.1, 1.16)],
    base:  1.03,
    alpha: 11.5,
};

fn profile(exposure: Exposure) -> &'static ExposureProfile {
    match exposure {
        Exposure::B => &EXPOSURE_B,
        Exposure::C => &EXPOSURE_C,
        Exposure::D => &EXPOSURE_D,
    }
}

/// Velocity pressure exposure coefficient at `height_m` above ground.
pub fn velocity_pressure_coefficient(height_m: f64, exposure: Exposure) -> f64 {
    let profile = profile(exposure);
    if let Some(&(_, kz)) = profile.steps.iter().find(|&&(limit, _)| height_m < limit) {
        return kz;
    }
    let first_limit = profile.steps[0].0;
    profile.base * (height_m / first_limit).powf(2.0 / profile.alpha)
}

/// Velocity pressure `qz`, N/m².
pub fn velocity_pressure(wind_speed_ms: f64, height_m: f64, exposure: Exposure) -> f64 {
    0.613 * velocity_pressure_coefficient(height_m, exposure) * KZT * KD * wind_speed_ms.powi(2)
}

/// Aerodynamic force on a body of projected area `area_m2`, N.
pub fn wind_load_n(
    wind_speed_ms:    f64,
    height_m:         f64,
    drag_coefficient: f64,
    area_m2:          f64,
    exposure:         Exposure,
) -> f64 {
    velocity_pressure(wind_speed_ms, height_m, exposure)
        * drag_coefficient.max(0.0)
        * area_m2.max(0.0)
}
