//! Build device records and their generators from a site topology.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::warn;
use tt_core::{
    Device, DeviceEntry, DeviceId, DeviceSpec, DeviceStatus, Exposure, GeoLocation, SimRng,
    SiteConfig,
};

use crate::{
    AntennaGenerator, ConfigWarning, DeviceGenerator, MicrowaveGenerator, RadioUnitGenerator,
    VendorCatalog,
};

/// Shortest hop accepted when the range is derived from link-end positions.
const MIN_DERIVED_RANGE_KM: f64 = 0.1;

/// Devices, their generators (same order), and any topology warnings.
///
/// `devices[i]` and `generators[i]` always describe the same device.
pub struct Fleet {
    pub devices:    Vec<Device>,
    pub generators: Vec<DeviceGenerator>,
    pub warnings:   Vec<ConfigWarning>,
}

impl Fleet {
    /// Resolve every topology entry against the built-in catalog layered with
    /// `config.vendor_specs`.
    ///
    /// Entries whose model cannot be resolved are skipped with a
    /// [`ConfigWarning`]; the rest of the fleet is still built.  `rng` only
    /// decides bookkeeping fields (serial number, firmware, dates), never a
    /// specification value.
    pub fn build(config: &SiteConfig, rng: &mut SimRng, now: DateTime<Utc>) -> Fleet {
        let catalog = VendorCatalog::builtin().with_overrides(&config.vendor_specs);
        Self::build_with_catalog(config, &catalog, rng, now)
    }

    pub fn build_with_catalog(
        config:  &SiteConfig,
        catalog: &VendorCatalog,
        rng:     &mut SimRng,
        now:     DateTime<Utc>,
    ) -> Fleet {
        let locations: HashMap<&DeviceId, GeoLocation> =
            config.devices.iter().map(|e| (&e.id, e.location)).collect();
        let exposure = config.tower.as_ref().map(|t| t.exposure).unwrap_or_default();

        let mut fleet = Fleet {
            devices:    Vec::with_capacity(config.devices.len()),
            generators: Vec::with_capacity(config.devices.len()),
            warnings:   Vec::new(),
        };

        for entry in &config.devices {
            match resolve_spec(entry, catalog, &locations) {
                Ok(spec) => {
                    let device = make_device(entry, spec, rng, now);
                    fleet.generators.push(make_generator(&device, exposure));
                    fleet.devices.push(device);
                }
                Err(warning) => {
                    warn!(device = %entry.id, "{warning}");
                    fleet.warnings.push(warning);
                }
            }
        }
        fleet
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// Pick the catalog spec for `entry` and apply its site-specific fields.
fn resolve_spec(
    entry:     &DeviceEntry,
    catalog:   &VendorCatalog,
    locations: &HashMap<&DeviceId, GeoLocation>,
) -> Result<DeviceSpec, ConfigWarning> {
    let model = entry
        .model
        .as_deref()
        .unwrap_or_else(|| VendorCatalog::default_model(entry.class));

    let mut spec = catalog
        .get(model)
        .cloned()
        .ok_or_else(|| ConfigWarning::UnknownModel {
            device: entry.id.clone(),
            model:  model.to_owned(),
        })?;

    if spec.class() != entry.class {
        return Err(ConfigWarning::ClassMismatch {
            device:   entry.id.clone(),
            model:    model.to_owned(),
            expected: entry.class,
            found:    spec.class(),
        });
    }

    match &mut spec {
        DeviceSpec::Antenna(a) => {
            if let Some(azimuth) = entry.azimuth_deg {
                a.azimuth_deg = azimuth.rem_euclid(360.0);
            }
            if entry.location.alt > 0.0 {
                a.mount_height_m = entry.location.alt;
            }
        }
        DeviceSpec::Rru(_) => {}
        DeviceSpec::Microwave(m) => {
            m.far_end_id = entry.far_end_id.clone();
            if let Some(range) = entry.range_km {
                m.range_km = range;
            } else if let Some(far) = entry.far_end_id.as_ref().and_then(|id| locations.get(id)) {
                m.range_km = entry.location.distance_km(*far).max(MIN_DERIVED_RANGE_KM);
            }
        }
    }
    Ok(spec)
}

fn make_device(entry: &DeviceEntry, spec: DeviceSpec, rng: &mut SimRng, now: DateTime<Utc>) -> Device {
    let installed_days_ago: i64 = rng.gen_range(365..=1_825);
    let maintained_days_ago: i64 = rng.gen_range(1..=180);
    let installation_date = now - TimeDelta::days(installed_days_ago);
    let last_maintenance = (now - TimeDelta::days(maintained_days_ago)).max(installation_date);

    let firmware = format!(
        "{}.{}.{}",
        rng.gen_range(1..=5u32),
        rng.gen_range(0..=9u32),
        rng.gen_range(0..=20u32),
    );
    let serial_number = format!("{}{:010}", entry.class.prefix(), rng.gen_range(0..10_000_000_000u64));

    let name = entry
        .name
        .clone()
        .unwrap_or_else(|| format!("{} {}", spec.model(), entry.id));

    Device {
        id: entry.id.clone(),
        name,
        class: entry.class,
        location: entry.location,
        installation_date,
        last_maintenance,
        status: DeviceStatus::Active,
        firmware,
        serial_number,
        specifications: spec,
    }
}

fn make_generator(device: &Device, exposure: Exposure) -> DeviceGenerator {
    let id = device.id.clone();
    match &device.specifications {
        DeviceSpec::Antenna(s) => DeviceGenerator::Antenna(
            AntennaGenerator::new(id, s.clone()).with_exposure(exposure),
        ),
        DeviceSpec::Rru(s) => DeviceGenerator::Rru(RadioUnitGenerator::new(id, s.clone())),
        DeviceSpec::Microwave(s) => DeviceGenerator::Microwave(MicrowaveGenerator::new(id, s.clone())),
    }
}
