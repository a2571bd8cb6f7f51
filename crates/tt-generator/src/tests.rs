//! Unit and property tests for tt-generator.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tt_core::{
    AntennaSpec, DeviceId, DeviceIndex, DeviceRng, MicrowaveSpec, Modulation, RadioTechnology,
    RadioUnitSpec, SimRng, Tick,
};
use tt_environment::{EnvironmentModel, EnvironmentSnapshot, SiteProfile};

use crate::{
    AntennaGenerator, GenContext, MicrowaveGenerator, RadioUnitGenerator, SampleGenerator,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap()
}

fn antenna_spec(bands: Vec<u32>) -> AntennaSpec {
    AntennaSpec {
        model:               "TEST-ANT".into(),
        frequency_bands_mhz: bands,
        gain_dbi:            17.5,
        beamwidth_deg:       65.0,
        azimuth_deg:         120.0,
        mechanical_tilt_deg: 2.0,
        electrical_tilt_deg: 4.0,
        max_power_w:         250.0,
        mount_height_m:      14.0,
        weight_kg:           40.0,
        wind_area_m2:        1.5,
        drag_coefficient:    1.2,
    }
}

fn rru_spec(technology: RadioTechnology) -> RadioUnitSpec {
    RadioUnitSpec {
        model:               "TEST-RRU".into(),
        technology,
        frequency_bands_mhz: vec![1800],
        max_tx_power_dbm:    46.0,
        rated_power_w:       400.0,
        nominal_voltage:     -48.0,
        ports:               4,
        weight_kg:           30.0,
        wind_area_m2:        0.6,
        drag_coefficient:    1.0,
    }
}

/// 23 GHz, 15 km, 20 dBm, −88 dBm sensitivity.
fn mw_spec(adaptive: bool) -> MicrowaveSpec {
    MicrowaveSpec {
        model:                    "TEST-MW".into(),
        frequency_ghz:            23.0,
        bandwidth_mhz:            56.0,
        range_km:                 15.0,
        transmit_power_dbm:       20.0,
        receiver_sensitivity_dbm: -88.0,
        adaptive_modulation:      adaptive,
        fixed_modulation:         Modulation::Qam16,
        far_end_id:               None,
        weight_kg:                25.0,
        wind_area_m2:             0.3,
        drag_coefficient:         1.0,
    }
}

/// Yields `n` environment snapshots one simulated minute apart, drawn from
/// the real model so the full range of seasons and weather is covered.
fn weather_series(n: usize, seed: u64) -> Vec<EnvironmentSnapshot> {
    let model = EnvironmentModel::new(SiteProfile {
        utc_offset_minutes: 330,
        particulate_base:   150.0,
        particulate_jitter: 60.0,
    });
    let mut rng = SimRng::new(seed);
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            // Step ~53 minutes so 10,000 ticks sweep the whole year.
            let now = start + TimeDelta::minutes(i as i64 * 53);
            let mut snap = model.snapshot(now, &mut rng);
            // Push some ticks into extreme heat to exercise the thermal caps.
            if i % 7 == 0 {
                snap.temperature += 15.0;
            }
            snap
        })
        .collect()
}

// ── RF helpers ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rf_tests {
    use crate::rf::*;
    use tt_core::Modulation;

    #[test]
    fn fspl_matches_formula() {
        let expected = 20.0 * 15f64.log10() + 20.0 * 23f64.log10() + 32.45;
        assert!((free_space_path_loss_db(15.0, 23.0) - expected).abs() < 1e-12);
        assert!((free_space_path_loss_db(15.0, 23.0) - 83.2).abs() < 0.1);
    }

    #[test]
    fn fspl_finite_for_degenerate_inputs() {
        assert!(free_space_path_loss_db(0.0, 0.0).is_finite());
    }

    #[test]
    fn dry_link_has_no_rain_loss() {
        assert_eq!(rain_attenuation_db(0.0, 23.0, 15.0), 0.0);
        assert_eq!(rain_attenuation_db(0.0, 7.0, 30.0), 0.0);
    }

    #[test]
    fn rain_loss_grows_with_rate_and_distance() {
        for f in [7.0, 23.0] {
            let mut prev = 0.0;
            for r in [0.5, 1.0, 5.0, 20.0, 60.0] {
                let a = rain_attenuation_db(r, f, 10.0);
                assert!(a > prev, "f={f} r={r}");
                prev = a;
            }
            assert!(rain_attenuation_db(10.0, f, 20.0) > rain_attenuation_db(10.0, f, 10.0));
        }
    }

    #[test]
    fn rain_regimes_differ_at_10ghz() {
        assert_ne!(rain_coefficients(9.99), rain_coefficients(10.0));
        assert_eq!(rain_coefficients(10.0), rain_coefficients(38.0));
    }

    #[test]
    fn noise_floor_56mhz() {
        // −174 + 10·log10(56e6) + 5 ≈ −91.52
        assert!((noise_floor_dbm(56e6) - (-91.52)).abs() < 0.01);
    }

    #[test]
    fn ladder_thresholds_are_strict() {
        assert_eq!(select_modulation(35.1), Modulation::Qam4096);
        assert_eq!(select_modulation(35.0), Modulation::Qam2048);
        assert_eq!(select_modulation(30.5), Modulation::Qam2048);
        assert_eq!(select_modulation(25.5), Modulation::Qam1024);
        assert_eq!(select_modulation(20.5), Modulation::Qam512);
        assert_eq!(select_modulation(15.5), Modulation::Qam256);
        assert_eq!(select_modulation(12.5), Modulation::Qam64);
        assert_eq!(select_modulation(10.5), Modulation::Qam16);
        assert_eq!(select_modulation(10.0), Modulation::Qpsk);
        assert_eq!(select_modulation(-20.0), Modulation::Qpsk);
    }

    #[test]
    fn quality_factor_clamped() {
        assert_eq!(quality_factor(0.0), 0.3);
        assert_eq!(quality_factor(60.0), 1.0);
        assert!((quality_factor(15.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn capacity_uses_bits_per_symbol() {
        // 56 MHz × 8 bits × 1.0
        assert!((capacity_mbps(56.0, Modulation::Qam256, 40.0) - 448.0).abs() < 1e-9);
    }

    #[test]
    fn ber_bounded() {
        assert_eq!(bit_error_rate(100.0), 1e-12);
        assert_eq!(bit_error_rate(-10.0), 1e-3);
        assert!(bit_error_rate(20.0) < bit_error_rate(10.0));
    }
}

// ── Wind load ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod wind_tests {
    use tt_core::Exposure;

    use crate::wind::*;

    #[test]
    fn exposure_c_breakpoints() {
        assert_eq!(velocity_pressure_coefficient(3.0, Exposure::C), 0.85);
        assert_eq!(velocity_pressure_coefficient(5.0, Exposure::C), 0.90);
        assert_eq!(velocity_pressure_coefficient(7.5, Exposure::C), 0.98);
        assert_eq!(velocity_pressure_coefficient(11.0, Exposure::C), 1.04);
        assert_eq!(velocity_pressure_coefficient(14.0, Exposure::C), 1.09);
    }

    #[test]
    fn exposure_b_and_d_tables() {
        assert_eq!(velocity_pressure_coefficient(5.0, Exposure::B), 0.57);
        assert_eq!(velocity_pressure_coefficient(14.0, Exposure::B), 0.66);
        let kz = velocity_pressure_coefficient(20.0, Exposure::B);
        assert!((kz - 0.713_815).abs() < 1e-5, "got {kz}");

        assert_eq!(velocity_pressure_coefficient(3.0, Exposure::D), 1.03);
        assert_eq!(velocity_pressure_coefficient(7.5, Exposure::D), 1.16);
        let kz = velocity_pressure_coefficient(14.0, Exposure::D);
        assert!((kz - 1.249_976).abs() < 1e-5, "got {kz}");
    }

    #[test]
    fn rougher_terrain_means_less_pressure() {
        for h in [3.0, 8.0, 14.0, 25.0] {
            let b = velocity_pressure(20.0, h, Exposure::B);
            let c = velocity_pressure(20.0, h, Exposure::C);
            let d = velocity_pressure(20.0, h, Exposure::D);
            assert!(b < c && c < d, "h = {h}: {b} {c} {d}");
        }
    }

    #[test]
    fn power_law_is_continuous_above_last_breakpoint() {
        let kz = velocity_pressure_coefficient(15.2, Exposure::C);
        assert!((kz - 1.09).abs() < 0.01, "got {kz}");
        assert!(velocity_pressure_coefficient(30.0, Exposure::C) > kz);
    }

    #[test]
    fn calm_air_no_load() {
        assert_eq!(wind_load_n(0.0, 14.0, 1.2, 1.5, Exposure::C), 0.0);
    }

    #[test]
    fn sector_antenna_at_20ms() {
        // 0.613 × 1.09 × 0.95 × 400 × 1.2 × 1.5 ≈ 457 N
        let f = wind_load_n(20.0, 14.0, 1.2, 1.5, Exposure::C);
        assert!((f - 457.0).abs() < 1.0, "got {f}");
    }
}

// ── Tower structure ───────────────────────────────────────────────────────────

#[cfg(test)]
mod structure_tests {
    use super::*;
    use crate::structure::*;
    use crate::{Fleet, wind};
    use tt_core::{
        AnchorBolts, DeviceClass, DeviceEntry, EquipmentLoad, Exposure, GeoLocation, Platform,
        PoleSection, SiteConfig, SteelGrade, TowerConfig,
    };

    fn close(actual: f64, expected: f64) {
        let tolerance = 1e-6 * expected.abs().max(1.0);
        assert!((actual - expected).abs() < tolerance, "expected {expected}, got {actual}");
    }

    fn items(n: usize, weight_kg: f64, wind_area_m2: f64, drag_coefficient: f64) -> Vec<EquipmentLoad> {
        (0..n)
            .map(|i| EquipmentLoad {
                label: format!("item-{i}"),
                weight_kg,
                wind_area_m2,
                drag_coefficient,
            })
            .collect()
    }

    fn platform(height_m: f64, weight_kg: f64, wind_area_m2: f64) -> Platform {
        Platform { height_m, weight_kg, wind_area_m2, drag_coefficient: 1.5, equipment: Vec::new() }
    }

    /// 15 m S355 monopole, 628 → 250 mm, 5 mm wall, 16 × M22 grade-420
    /// anchors on a 750 mm circle, crown platform at 14 m and a second at 11 m.
    fn fifteen_metre_tower() -> TowerConfig {
        TowerConfig {
            sections:        vec![PoleSection {
                height_mm:          15_000.0,
                diameter_bottom_mm: 628.0,
                diameter_top_mm:    250.0,
                thickness_mm:       5.0,
            }],
            exposure:        Exposure::C,
            steel_grade:     SteelGrade::S355,
            foundation:      Some(AnchorBolts {
                bolt_circle_diameter_mm: 750.0,
                bolt_count:              16,
                bolt_diameter_mm:        22.0,
                bolt_grade_mpa:          420.0,
            }),
            platforms:       vec![platform(14.0, 150.0, 1.5), platform(11.0, 120.0, 1.3)],
            applied_load_kg: 0.0,
        }
    }

    /// The tower with its full load listed on the platforms: 6 + 4 sector
    /// antennas, 8 + 8 RRUs, one microwave ODU each.
    fn loaded_tower() -> TowerConfig {
        let mut tower = fifteen_metre_tower();
        for (platform, antennas) in tower.platforms.iter_mut().zip([6, 4]) {
            platform.equipment.extend(items(antennas, 40.0, 1.5, 1.2));
            platform.equipment.extend(items(8, 30.0, 0.6, 1.0));
            platform.equipment.extend(items(1, 25.0, 0.3, 1.0));
        }
        tower
    }

    #[test]
    fn section_capacities() {
        let tower = fifteen_metre_tower();
        close(pole_weight_kg(&tower.sections), 802.731_900_863_631);
        close(pole_moment_capacity_nm(&tower.sections[0], SteelGrade::S355), 536_810.136_174_248);
        close(section_modulus_m3(628.0, 5.0), 0.001_512_141_228_659_854);
        close(anchor_moment_capacity_nm(&tower.foundation.unwrap()), 2.0 * 179_612.705_987_362);
    }

    #[test]
    fn bare_pole_wind_by_exposure() {
        let mut tower = fifteen_metre_tower();
        tower.platforms.clear();
        for (exposure, force, moment) in [
            (Exposure::C, 751.615_851, 5_637.118_882_5),
            (Exposure::B, 437.164_321_5, 3_278.732_411_25),
            (Exposure::D, 889.667_742, 6_672.508_065),
        ] {
            tower.exposure = exposure;
            let (f, m) = TowerModel::new(&tower).wind_load(20.0);
            close(f, force);
            close(m, moment);
        }
    }

    #[test]
    fn loaded_tower_at_20ms_is_critical() {
        let report = TowerModel::new(&loaded_tower()).analyze(20.0);

        close(report.pole_weight_kg, 802.731_900_863_631);
        close(report.equipment_weight_kg, 1_200.0);
        close(report.dead_load_kg(), 2_002.731_900_863_631);
        close(report.wind_force_n, 8_663.306_481);
        close(report.wind_moment_nm, 106_262.307_142_5);
        close(report.capacity_nm, 179_612.705_987_362);
        assert_eq!(report.governing_element, GoverningElement::Foundation);

        assert_eq!(report.governing_combination, LoadCombination::Lrfd12D16W);
        close(report.max_utilization, 0.946_590_557_128_863);
        close(report.max_load_capacity_kg, 1_220.609_622_747_961);
        close(report.remaining_capacity_kg, 65.192_079_914_117);
        assert_eq!(report.status, StructuralStatus::Critical);

        let asd = report.check(LoadCombination::Asd06D06W).unwrap();
        close(asd.utilization, 0.354_971_458_923_324);
        assert_eq!(report.check(LoadCombination::AsdD).unwrap().moment_nm, 0.0);
        assert_eq!(report.check(LoadCombination::Lrfd14D).unwrap().utilization, 0.0);
    }

    #[test]
    fn terrain_changes_the_verdict() {
        let mut tower = loaded_tower();
        tower.exposure = Exposure::B;
        let open_suburb = TowerModel::new(&tower).analyze(20.0);
        close(open_suburb.max_utilization, 0.568_869_661_465_871);
        assert_eq!(open_suburb.status, StructuralStatus::Conservative);

        tower.exposure = Exposure::D;
        let coast = TowerModel::new(&tower).analyze(20.0);
        close(coast.max_utilization, 1.089_281_456_337_976);
        assert_eq!(coast.status, StructuralStatus::Fail);
        assert!(coast.remaining_capacity_kg < 0.0);
    }

    #[test]
    fn pole_governs_without_a_foundation() {
        let mut tower = loaded_tower();
        tower.foundation = None;
        let report = TowerModel::new(&tower).analyze(20.0);
        assert_eq!(report.governing_element, GoverningElement::Pole);
        close(report.max_utilization, 0.633_444_415_337_239);
        assert_eq!(report.status, StructuralStatus::Good);
    }

    #[test]
    fn applied_top_load_adds_moment() {
        let mut tower = loaded_tower();
        tower.applied_load_kg = 50.0;
        let report = TowerModel::new(&tower).analyze(20.0);
        close(report.applied_moment_nm, 50.0 * GRAVITY_MS2 * 15.0);
        close(report.max_utilization, 0.987_553_694_784_156);
        close(report.remaining_capacity_kg, 15.192_079_914_117);
    }

    #[test]
    fn calm_air_leaves_full_reserve() {
        let report = TowerModel::new(&loaded_tower()).analyze(0.0);
        assert_eq!(report.wind_force_n, 0.0);
        assert_eq!(report.max_utilization, 0.0);
        assert_eq!(report.governing_combination, LoadCombination::Lrfd14D);
        assert_eq!(report.status, StructuralStatus::Conservative);
        close(report.remaining_capacity_kg, report.max_load_capacity_kg);
    }

    #[test]
    fn status_bands() {
        assert_eq!(StructuralStatus::from_utilization(0.6), StructuralStatus::Conservative);
        assert_eq!(StructuralStatus::from_utilization(0.61), StructuralStatus::Good);
        assert_eq!(StructuralStatus::from_utilization(0.8), StructuralStatus::Good);
        assert_eq!(StructuralStatus::from_utilization(0.85), StructuralStatus::Warning);
        assert_eq!(StructuralStatus::from_utilization(1.0), StructuralStatus::Critical);
        assert_eq!(StructuralStatus::from_utilization(1.01), StructuralStatus::Fail);
        assert!(StructuralStatus::Warning < StructuralStatus::Fail);
    }

    #[test]
    fn simulated_devices_load_the_platforms() {
        let mut devices = Vec::new();
        for (height, antennas) in [(14.0, 6), (11.0, 4)] {
            let here = GeoLocation::new(19.076, 72.877, height);
            for i in 0..antennas {
                devices.push(DeviceEntry::new(format!("ANT-{height}-{i}"), DeviceClass::Antenna, here));
            }
            for i in 0..8 {
                devices.push(DeviceEntry::new(format!("RRU-{height}-{i}"), DeviceClass::Rru, here));
            }
            devices.push(DeviceEntry::new(format!("MW-{height}"), DeviceClass::Microwave, here));
        }
        let config = SiteConfig { devices, tower: Some(fifteen_metre_tower()), ..SiteConfig::default() };
        let fleet = Fleet::build(&config, &mut SimRng::new(1), t0());
        assert_eq!(fleet.len(), 28);

        let from_fleet = TowerModel::with_devices(&fifteen_metre_tower(), &fleet.devices).analyze(20.0);
        let listed = TowerModel::new(&loaded_tower()).analyze(20.0);
        close(from_fleet.equipment_weight_kg, listed.equipment_weight_kg);
        close(from_fleet.wind_moment_nm, listed.wind_moment_nm);
        close(from_fleet.max_utilization, listed.max_utilization);
    }

    #[test]
    fn equipment_without_height_sits_at_the_top() {
        let mut tower = fifteen_metre_tower();
        tower.platforms.clear();
        let mut model = TowerModel::new(&tower);
        let bare = model.wind_load(20.0);
        model.mount(0.0, items(1, 30.0, 0.6, 1.0).remove(0));
        let (force, moment) = model.wind_load(20.0);
        let item = wind::wind_load_n(20.0, 15.0, 1.0, 0.6, Exposure::C);
        close(force - bare.0, item);
        close(moment - bare.1, item * 15.0);
        close(model.equipment_weight_kg(), 30.0);
    }

    #[test]
    fn site_exposure_reaches_antenna_wind_load() {
        let here = GeoLocation::new(19.076, 72.877, 14.0);
        let mut tower = fifteen_metre_tower();
        tower.exposure = Exposure::D;
        let config = SiteConfig {
            devices: vec![DeviceEntry::new("ANT-1", DeviceClass::Antenna, here)],
            tower: Some(tower),
            ..SiteConfig::default()
        };
        let mut fleet = Fleet::build(&config, &mut SimRng::new(1), t0());
        let mut env = EnvironmentSnapshot::calm(t0(), 12);
        env.wind_speed = 20.0;
        let ctx = GenContext::new(Tick(0), t0(), &env);
        let sample = fleet.generators[0].generate(&ctx, &mut DeviceRng::new(1, DeviceIndex(0)));
        match sample.measurements {
            tt_core::Measurements::Antenna(m) => {
                close(m.wind_load_n, wind::wind_load_n(20.0, 14.0, 1.2, 1.5, Exposure::D));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    proptest::proptest! {
        #[test]
        fn utilization_grows_with_wind(a in 0.0f64..70.0, b in 0.0f64..70.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let model = TowerModel::new(&loaded_tower());
            proptest::prop_assert!(
                model.analyze(lo).max_utilization <= model.analyze(hi).max_utilization
            );
        }
    }
}

// ── Sequence / timestamp envelope ─────────────────────────────────────────────

#[cfg(test)]
mod sequence_tests {
    use super::*;

    #[test]
    fn sequence_starts_at_one_and_increments() {
        let mut g = AntennaGenerator::new(DeviceId::from("ANT-1"), antenna_spec(vec![1800]));
        let mut rng = DeviceRng::new(1, DeviceIndex(0));
        assert_eq!(g.sequence(), 0);
        for i in 1..=5u64 {
            let env = EnvironmentSnapshot::calm(t0(), 10);
            let now = t0() + TimeDelta::seconds(i as i64);
            let s = g.generate(&GenContext::new(Tick(i - 1), now, &env), &mut rng);
            assert_eq!(s.sequence_number, i);
            assert_eq!(s.timestamp, now);
        }
        assert_eq!(g.sequence(), 5);
    }

    #[test]
    fn timestamp_never_goes_backwards() {
        let mut g = RadioUnitGenerator::new(DeviceId::from("RRU-1"), rru_spec(RadioTechnology::Lte));
        let mut rng = DeviceRng::new(1, DeviceIndex(0));
        let env = EnvironmentSnapshot::calm(t0(), 10);

        let late = t0() + TimeDelta::hours(1);
        let a = g.generate(&GenContext::new(Tick(0), late, &env), &mut rng);
        let b = g.generate(&GenContext::new(Tick(1), t0(), &env), &mut rng);
        assert_eq!(b.timestamp, a.timestamp);
        assert!(b.sequence_number > a.sequence_number);
    }

    #[test]
    fn same_seed_same_samples() {
        let env = EnvironmentSnapshot::calm(t0(), 10);
        let ctx = GenContext::new(Tick(0), t0(), &env);
        let mut a = MicrowaveGenerator::new(DeviceId::from("MW-1"), mw_spec(true));
        let mut b = MicrowaveGenerator::new(DeviceId::from("MW-1"), mw_spec(true));
        let sa = a.generate(&ctx, &mut DeviceRng::new(9, DeviceIndex(2)));
        let sb = b.generate(&ctx, &mut DeviceRng::new(9, DeviceIndex(2)));
        assert_eq!(sa, sb);
    }
}

// ── Antenna ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod antenna_tests {
    use super::*;
    use tt_core::Measurements;

    fn measure(g: &mut AntennaGenerator, env: &EnvironmentSnapshot, rng: &mut DeviceRng) -> tt_core::AntennaMeasurements {
        match g.generate(&GenContext::new(Tick(0), env.timestamp, env), rng).measurements {
            Measurements::Antenna(m) => m,
            other => panic!("expected antenna payload, got {other:?}"),
        }
    }

    #[test]
    fn envelopes_hold_over_10k_ticks() {
        let mut g = AntennaGenerator::new(DeviceId::from("ANT-1"), antenna_spec(vec![1800, 3500]));
        let mut rng = DeviceRng::new(77, DeviceIndex(0));
        for env in weather_series(10_000, 3) {
            let m = measure(&mut g, &env, &mut rng);
            assert!((-120.0..=-50.0).contains(&m.signal_strength), "signal {}", m.signal_strength);
            assert!((1.05..=1.5).contains(&m.vswr));
            assert!((14.0..=26.0).contains(&m.return_loss));
            assert!((10.0..=30.0).contains(&m.snr));
            assert!((0.0..360.0).contains(&m.azimuth_actual));
            assert!(m.wind_load_n >= 0.0);
        }
    }

    #[test]
    fn storm_pushes_signal_to_floor_but_not_past_it() {
        let mut g = AntennaGenerator::new(DeviceId::from("ANT-1"), antenna_spec(vec![1800]));
        let mut rng = DeviceRng::new(1, DeviceIndex(0));
        let mut env = EnvironmentSnapshot::calm(t0(), 12);
        env.humidity = 95.0;
        env.rain_rate = 2_000.0;
        let m = measure(&mut g, &env, &mut rng);
        assert_eq!(m.signal_strength, -120.0);
    }

    #[test]
    fn passive_antenna_draws_no_power() {
        let mut g = AntennaGenerator::new(DeviceId::from("ANT-P"), antenna_spec(vec![700, 1800]));
        let mut rng = DeviceRng::new(1, DeviceIndex(0));
        let m = measure(&mut g, &EnvironmentSnapshot::calm(t0(), 10), &mut rng);
        assert!(!m.is_active);
        assert_eq!(m.power_consumption, 0.0);
    }

    #[test]
    fn active_antenna_power_in_band() {
        let mut g = AntennaGenerator::new(DeviceId::from("ANT-A"), antenna_spec(vec![3500]));
        let mut rng = DeviceRng::new(1, DeviceIndex(0));
        for _ in 0..500 {
            let m = measure(&mut g, &EnvironmentSnapshot::calm(t0(), 10), &mut rng);
            assert!(m.is_active);
            assert!((150.0..=250.0).contains(&m.power_consumption));
        }
    }

    #[test]
    fn still_air_leaves_mechanics_untouched() {
        let mut g = AntennaGenerator::new(DeviceId::from("ANT-1"), antenna_spec(vec![1800]));
        let mut rng = DeviceRng::new(1, DeviceIndex(0));
        let m = measure(&mut g, &EnvironmentSnapshot::calm(t0(), 10), &mut rng);
        assert_eq!(m.azimuth_actual, 120.0);
        assert_eq!(m.tilt_actual, 6.0);
        assert_eq!(m.wind_load_n, 0.0);
    }
}

// ── Radio unit ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod radio_unit_tests {
    use super::*;
    use crate::radio_unit::{OVER_TEMP_NR_C, VOLTAGE_MAX, VOLTAGE_MIN, VSWR_ALARM};
    use tt_core::{Measurements, RadioUnitMeasurements};

    fn measure(g: &mut RadioUnitGenerator, env: &EnvironmentSnapshot, rng: &mut DeviceRng) -> RadioUnitMeasurements {
        match g.generate(&GenContext::new(Tick(0), env.timestamp, env), rng).measurements {
            Measurements::Rru(m) => m,
            other => panic!("expected rru payload, got {other:?}"),
        }
    }

    #[test]
    fn thermal_caps_hold_over_10k_ticks() {
        let mut g = RadioUnitGenerator::new(DeviceId::from("RRU-1"), rru_spec(RadioTechnology::Lte));
        let mut rng = DeviceRng::new(5, DeviceIndex(1));
        for env in weather_series(10_000, 11) {
            let m = measure(&mut g, &env, &mut rng);
            assert!(m.internal_temperature <= 50.0, "internal {}", m.internal_temperature);
            assert!(m.pa_temperature <= 85.0, "pa {}", m.pa_temperature);
            assert!((0.0..=100.0).contains(&m.traffic_load));
        }
    }

    #[test]
    fn alarms_follow_reported_values() {
        let mut g = RadioUnitGenerator::new(DeviceId::from("RRU-1"), rru_spec(RadioTechnology::Lte));
        let mut rng = DeviceRng::new(5, DeviceIndex(1));
        for env in weather_series(5_000, 12) {
            let m = measure(&mut g, &env, &mut rng);
            assert_eq!(m.alarms.vswr, m.vswr > VSWR_ALARM);
            assert_eq!(
                m.alarms.power_supply,
                !(VOLTAGE_MIN..=VOLTAGE_MAX).contains(&m.input_voltage)
            );
            if m.internal_temperature < 50.0 {
                assert!(!m.alarms.over_temperature);
            }
        }
    }

    #[test]
    fn busy_hours_load_higher() {
        let mut g = RadioUnitGenerator::new(DeviceId::from("RRU-1"), rru_spec(RadioTechnology::Lte));
        let mut rng = DeviceRng::new(5, DeviceIndex(1));
        for _ in 0..200 {
            let busy = measure(&mut g, &EnvironmentSnapshot::calm(t0(), 14), &mut rng);
            let quiet = measure(&mut g, &EnvironmentSnapshot::calm(t0(), 3), &mut rng);
            assert!((60.0..=95.0).contains(&busy.traffic_load));
            assert!((10.0..=40.0).contains(&quiet.traffic_load));
        }
    }

    #[test]
    fn power_scales_with_load_and_current_follows() {
        let mut g = RadioUnitGenerator::new(DeviceId::from("RRU-1"), rru_spec(RadioTechnology::Lte));
        let mut rng = DeviceRng::new(5, DeviceIndex(1));
        for _ in 0..200 {
            let m = measure(&mut g, &EnvironmentSnapshot::calm(t0(), 14), &mut rng);
            let load = m.traffic_load / 100.0;
            let nominal = 400.0 * (0.3 + 0.7 * load);
            assert!((m.power_consumption - nominal).abs() <= nominal * 0.05 + 1e-9);
            assert!((m.current - m.power_consumption / m.input_voltage).abs() < 1e-9);
        }
    }

    #[test]
    fn nr_radio_alarms_earlier() {
        // 48 °C ambient at night: the estimate never drops below 48 °C.
        let mut g = RadioUnitGenerator::new(DeviceId::from("RRU-5G"), rru_spec(RadioTechnology::Nr));
        let mut rng = DeviceRng::new(5, DeviceIndex(1));
        let mut env = EnvironmentSnapshot::calm(t0(), 3);
        env.temperature = OVER_TEMP_NR_C + 3.0;
        for _ in 0..100 {
            assert!(measure(&mut g, &env, &mut rng).alarms.over_temperature);
        }
    }

    #[test]
    fn cool_lte_radio_never_over_temperature() {
        let mut g = RadioUnitGenerator::new(DeviceId::from("RRU-1"), rru_spec(RadioTechnology::Lte));
        let mut rng = DeviceRng::new(5, DeviceIndex(1));
        let mut env = EnvironmentSnapshot::calm(t0(), 14);
        env.temperature = 20.0;
        for _ in 0..100 {
            assert!(!measure(&mut g, &env, &mut rng).alarms.over_temperature);
        }
    }
}

// ── Microwave ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod microwave_tests {
    use super::*;
    use crate::rf;
    use tt_core::{Measurements, MicrowaveMeasurements};

    fn measure(g: &mut MicrowaveGenerator, env: &EnvironmentSnapshot, rng: &mut DeviceRng) -> MicrowaveMeasurements {
        match g.generate(&GenContext::new(Tick(0), env.timestamp, env), rng).measurements {
            Measurements::Microwave(m) => m,
            other => panic!("expected microwave payload, got {other:?}"),
        }
    }

    #[test]
    fn dry_23ghz_15km_link_has_positive_margin() {
        let mut g = MicrowaveGenerator::new(DeviceId::from("MW-1"), mw_spec(true));
        let mut rng = DeviceRng::new(3, DeviceIndex(0));
        let env = EnvironmentSnapshot::calm(t0(), 10);
        for _ in 0..100 {
            let m = measure(&mut g, &env, &mut rng);
            assert_eq!(m.rain_attenuation, 0.0);
            assert!((m.link_margin - (m.rsl - (-88.0))).abs() < 1e-9);
            assert!(m.link_margin > 0.0, "margin {}", m.link_margin);
            assert!((m.rsl - (-63.2)).abs() < 0.6, "rsl {}", m.rsl);
        }
    }

    #[test]
    fn budget_is_internally_consistent() {
        let mut g = MicrowaveGenerator::new(DeviceId::from("MW-1"), mw_spec(true));
        let mut rng = DeviceRng::new(3, DeviceIndex(0));
        for env in weather_series(2_000, 21) {
            let m = measure(&mut g, &env, &mut rng);
            assert!((m.rsl - (m.transmit_power - m.path_loss - m.rain_attenuation)).abs() < 1e-9);
            assert!((m.snr - (m.rsl - m.noise_floor)).abs() < 1e-9);
            assert_eq!(m.modulation, rf::select_modulation(m.snr));
            assert!(m.current_capacity_mbps > 0.0);
            assert!((1e-12..=1e-3).contains(&m.ber));
        }
    }

    #[test]
    fn heavy_rain_costs_margin() {
        let mut g = MicrowaveGenerator::new(DeviceId::from("MW-1"), mw_spec(true));
        let mut rng = DeviceRng::new(3, DeviceIndex(0));
        let dry = EnvironmentSnapshot::calm(t0(), 10);
        let mut wet = dry.clone();
        wet.rain_rate = 50.0;
        let a = measure(&mut g, &dry, &mut rng);
        let b = measure(&mut g, &wet, &mut rng);
        assert!(b.rain_attenuation > 0.0);
        // tx jitter is at most ±0.5 dB each side
        assert!(b.link_margin < a.link_margin - b.rain_attenuation + 1.0 + 1e-9);
    }

    #[test]
    fn fixed_modulation_when_not_adaptive() {
        let mut g = MicrowaveGenerator::new(DeviceId::from("MW-1"), mw_spec(false));
        let mut rng = DeviceRng::new(3, DeviceIndex(0));
        for env in weather_series(500, 4) {
            assert_eq!(measure(&mut g, &env, &mut rng).modulation, Modulation::Qam16);
        }
    }
}

// ── Fleet construction ────────────────────────────────────────────────────────

#[cfg(test)]
mod fleet_tests {
    use super::*;
    use crate::{ConfigWarning, Fleet, VendorCatalog};
    use tt_core::{DeviceClass, DeviceEntry, DeviceSpec, GeoLocation, SiteConfig};

    fn loc(lat: f64, lng: f64, alt: f64) -> GeoLocation {
        GeoLocation::new(lat, lng, alt)
    }

    #[test]
    fn default_models_resolve() {
        let config = SiteConfig {
            devices: vec![
                DeviceEntry::new("ANT-1", DeviceClass::Antenna, loc(19.0, 72.8, 0.0)),
                DeviceEntry::new("RRU-1", DeviceClass::Rru, loc(19.0, 72.8, 0.0)),
                DeviceEntry::new("MW-1", DeviceClass::Microwave, loc(19.0, 72.8, 0.0)),
            ],
            ..SiteConfig::default()
        };
        let fleet = Fleet::build(&config, &mut SimRng::new(1), t0());
        assert!(fleet.warnings.is_empty());
        assert_eq!(fleet.len(), 3);
        for (device, generator) in fleet.devices.iter().zip(&fleet.generators) {
            assert_eq!(&device.id, generator.device_id());
            assert_eq!(device.class, generator.class());
            assert_eq!(device.class, device.specifications.class());
            assert!(device.installation_date <= device.last_maintenance);
            assert!(device.last_maintenance < t0());
        }
    }

    #[test]
    fn unknown_model_skipped_with_warning() {
        let config = SiteConfig {
            devices: vec![
                DeviceEntry::new("ANT-1", DeviceClass::Antenna, loc(0.0, 0.0, 0.0)).with_model("NOPE-9000"),
                DeviceEntry::new("ANT-2", DeviceClass::Antenna, loc(0.0, 0.0, 0.0)),
            ],
            ..SiteConfig::default()
        };
        let fleet = Fleet::build(&config, &mut SimRng::new(1), t0());
        assert_eq!(fleet.len(), 1);
        assert_eq!(fleet.devices[0].id, DeviceId::from("ANT-2"));
        assert_eq!(
            fleet.warnings,
            vec![ConfigWarning::UnknownModel {
                device: DeviceId::from("ANT-1"),
                model:  "NOPE-9000".into(),
            }]
        );
    }

    #[test]
    fn class_mismatch_skipped() {
        let config = SiteConfig {
            devices: vec![DeviceEntry::new("RRU-1", DeviceClass::Rru, loc(0.0, 0.0, 0.0)).with_model("AIR-6449")],
            ..SiteConfig::default()
        };
        let fleet = Fleet::build(&config, &mut SimRng::new(1), t0());
        assert!(fleet.is_empty());
        assert!(matches!(fleet.warnings[0], ConfigWarning::ClassMismatch { .. }));
    }

    #[test]
    fn vendor_override_replaces_builtin() {
        let mut custom = mw_spec(true);
        custom.model = "RTN-950A-23G".into();
        custom.transmit_power_dbm = 25.0;
        let mut config = SiteConfig {
            devices: vec![DeviceEntry::new("MW-1", DeviceClass::Microwave, loc(0.0, 0.0, 0.0))],
            ..SiteConfig::default()
        };
        config.vendor_specs.insert(custom.model.clone(), DeviceSpec::Microwave(custom));

        let fleet = Fleet::build(&config, &mut SimRng::new(1), t0());
        match &fleet.devices[0].specifications {
            DeviceSpec::Microwave(m) => assert_eq!(m.transmit_power_dbm, 25.0),
            other => panic!("unexpected spec {other:?}"),
        }
    }

    #[test]
    fn site_fields_applied() {
        let mut ant = DeviceEntry::new("ANT-1", DeviceClass::Antenna, loc(19.0, 72.8, 22.0));
        ant.azimuth_deg = Some(-30.0);
        let near = DeviceEntry::new("MW-A", DeviceClass::Microwave, loc(19.0, 72.8, 0.0));
        let mut far = DeviceEntry::new("MW-B", DeviceClass::Microwave, loc(19.1, 72.8, 0.0));
        far.far_end_id = Some(DeviceId::from("MW-A"));
        let mut explicit = DeviceEntry::new("MW-C", DeviceClass::Microwave, loc(19.0, 72.8, 0.0));
        explicit.range_km = Some(4.0);

        let config = SiteConfig { devices: vec![ant, near, far, explicit], ..SiteConfig::default() };
        let fleet = Fleet::build(&config, &mut SimRng::new(1), t0());

        match &fleet.devices[0].specifications {
            DeviceSpec::Antenna(a) => {
                assert_eq!(a.azimuth_deg, 330.0);
                assert_eq!(a.mount_height_m, 22.0);
            }
            other => panic!("unexpected spec {other:?}"),
        }
        match &fleet.devices[2].specifications {
            DeviceSpec::Microwave(m) => {
                assert!((m.range_km - 11.12).abs() < 0.1, "range {}", m.range_km);
                assert_eq!(m.far_end_id, Some(DeviceId::from("MW-A")));
            }
            other => panic!("unexpected spec {other:?}"),
        }
        match &fleet.devices[3].specifications {
            DeviceSpec::Microwave(m) => assert_eq!(m.range_km, 4.0),
            other => panic!("unexpected spec {other:?}"),
        }
    }

    #[test]
    fn builtin_catalog_covers_defaults() {
        let catalog = VendorCatalog::builtin();
        for class in [DeviceClass::Antenna, DeviceClass::Rru, DeviceClass::Microwave] {
            let spec = catalog.get(VendorCatalog::default_model(class)).unwrap();
            assert_eq!(spec.class(), class);
        }
        assert!(VendorCatalog::empty().is_empty());
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use crate::rf;

    proptest! {
        #[test]
        fn modulation_monotone_in_snr(a in -50.0f64..80.0, b in -50.0f64..80.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(rf::select_modulation(lo) <= rf::select_modulation(hi));
        }

        #[test]
        fn rain_strictly_increasing_in_rate(
            f in 1.0f64..80.0,
            d in 0.5f64..50.0,
            r in 0.1f64..100.0,
            dr in 0.1f64..50.0,
        ) {
            prop_assert!(rf::rain_attenuation_db(r + dr, f, d) > rf::rain_attenuation_db(r, f, d));
        }

        #[test]
        fn rain_strictly_increasing_in_distance(
            f in 1.0f64..80.0,
            d in 0.5f64..50.0,
            dd in 0.1f64..20.0,
            r in 0.1f64..100.0,
        ) {
            prop_assert!(rf::rain_attenuation_db(r, f, d + dd) > rf::rain_attenuation_db(r, f, d));
        }
    }
}
