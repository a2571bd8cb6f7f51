//! Closed-form RF link-budget helpers.
//!
//! Units follow the usual microwave-planning conventions: distance in km,
//! frequency in GHz, powers in dBm, losses in dB.

use tt_core::Modulation;

/// Smallest hop length / carrier frequency fed into a logarithm.  Keeps the
/// budget finite for degenerate specs.
const MIN_DISTANCE_KM: f64 = 0.01;
const MIN_FREQUENCY_GHZ: f64 = 0.1;

/// Fraction of the hop assumed to be inside the rain cell.
pub const RAIN_PATH_FACTOR: f64 = 0.5;

/// Thermal noise density at 290 K, dBm/Hz.
pub const THERMAL_NOISE_DBM_HZ: f64 = -174.0;

/// Receiver front-end noise figure, dB.
pub const NOISE_FIGURE_DB: f64 = 5.0;

/// Free-space path loss: `20·log10(d_km) + 20·log10(f_GHz) + 32.45`.
pub fn free_space_path_loss_db(distance_km: f64, frequency_ghz: f64) -> f64 {
    let d = distance_km.max(MIN_DISTANCE_KM);
    let f = frequency_ghz.max(MIN_FREQUENCY_GHZ);
    20.0 * d.log10() + 20.0 * f.log10() + 32.45
}

/// Power-law rain coefficients `(k, α)`: one pair below 10 GHz, one at or
/// above.
pub fn rain_coefficients(frequency_ghz: f64) -> (f64, f64) {
    if frequency_ghz < 10.0 {
        (0.0035, 1.30)
    } else {
        (0.10, 1.06)
    }
}

/// Rain attenuation over the hop: `k·R^α × d × 0.5`.
///
/// Zero for a dry link; strictly increasing in rain rate and in distance
/// otherwise.
pub fn rain_attenuation_db(rain_rate_mm_h: f64, frequency_ghz: f64, distance_km: f64) -> f64 {
    if rain_rate_mm_h <= 0.0 || distance_km <= 0.0 {
        return 0.0;
    }
    let (k, alpha) = rain_coefficients(frequency_ghz);
    k * rain_rate_mm_h.powf(alpha) * distance_km * RAIN_PATH_FACTOR
}

/// Receiver noise floor: `−174 + 10·log10(B_Hz) + NF`.
pub fn noise_floor_dbm(bandwidth_hz: f64) -> f64 {
    THERMAL_NOISE_DBM_HZ + 10.0 * bandwidth_hz.max(1.0).log10() + NOISE_FIGURE_DB
}

/// Descending SNR ladder.  Each threshold is strict: SNR exactly 35 dB
/// selects 2048QAM, not 4096QAM.
const MODULATION_LADDER: [(f64, Modulation); 7] = [
    (35.0, Modulation::Qam4096),
    (30.0, Modulation::Qam2048),
    (25.0, Modulation::Qam1024),
    (20.0, Modulation::Qam512),
    (15.0, Modulation::Qam256),
    (12.0, Modulation::Qam64),
    (10.0, Modulation::Qam16),
];

/// Adaptive modulation: highest scheme whose threshold the SNR exceeds,
/// QPSK otherwise.
pub fn select_modulation(snr_db: f64) -> Modulation {
    MODULATION_LADDER
        .iter()
        .find(|(threshold, _)| snr_db > *threshold)
        .map(|&(_, m)| m)
        .unwrap_or(Modulation::Qpsk)
}

/// Link-quality factor `clamp(SNR / 30, 0.3, 1.0)`.
pub fn quality_factor(snr_db: f64) -> f64 {
    (snr_db / 30.0).clamp(0.3, 1.0)
}

/// Throughput: bandwidth × bits/symbol × quality factor.
pub fn capacity_mbps(bandwidth_mhz: f64, modulation: Modulation, snr_db: f64) -> f64 {
    bandwidth_mhz.max(0.0) * f64::from(modulation.bits_per_symbol()) * quality_factor(snr_db)
}

/// Coarse bit error rate, `10^(−SNR/4)`, clamped to [1e−12, 1e−3].
pub fn bit_error_rate(snr_db: f64) -> f64 {
    10f64.powf(-snr_db / 4.0).clamp(1e-12, 1e-3)
}
