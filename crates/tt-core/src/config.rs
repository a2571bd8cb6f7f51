//! Site configuration: tick period, retention cap, topology, vendor overrides,
//! tower structure.
//!
//! Typically loaded from a JSON file by the application crate and passed to
//! the scheduler builder.  Every field except `devices` has a default, so a
//! minimal file only lists the topology.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, DeviceClass, DeviceId, DeviceSpec, GeoLocation, TowerConfig};

/// One device in the site topology.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceEntry {
    pub id: DeviceId,
    #[serde(rename = "type")]
    pub class: DeviceClass,
    #[serde(default)]
    pub name: Option<String>,
    /// Vendor model.  Looked up in the built-in catalog and `vendorSpecs`;
    /// `None` assigns a class default.
    #[serde(default)]
    pub model: Option<String>,
    pub location: GeoLocation,
    /// Antenna boresight, degrees from north.
    #[serde(default)]
    pub azimuth_deg: Option<f64>,
    /// Microwave hop length.  Falls back to the distance to `farEndId`.
    #[serde(default)]
    pub range_km: Option<f64>,
    #[serde(default)]
    pub far_end_id: Option<DeviceId>,
}

impl DeviceEntry {
    pub fn new(id: impl Into<DeviceId>, class: DeviceClass, location: GeoLocation) -> Self {
        Self {
            id: id.into(),
            class,
            name: None,
            model: None,
            location,
            azimuth_deg: None,
            range_km: None,
            far_end_id: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Top-level site configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub name: String,

    /// Master RNG seed.  The same seed always produces identical samples.
    pub seed: u64,

    /// Tick period in milliseconds.  Must be positive.
    pub interval_ms: u64,

    /// Retention cap on stored samples.  Must be positive.
    pub max_samples: u64,

    /// Stop after this many ticks.  `None` runs until stopped.
    pub max_ticks: Option<u64>,

    /// Local-time offset of the site, used for season and time-of-day.
    pub utc_offset_minutes: i32,

    /// Site baseline particulate index (AQI-like).
    pub particulate_base: f64,

    /// Amplitude of the per-tick particulate jitter.
    pub particulate_jitter: f64,

    pub devices: Vec<DeviceEntry>,

    /// Vendor specification overrides keyed by model name.  Entries replace
    /// built-in catalog models with the same name.
    pub vendor_specs: BTreeMap<String, DeviceSpec>,

    /// Monopole the devices are mounted on.  `None` skips the structural
    /// check.
    pub tower: Option<TowerConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name:               "site".to_owned(),
            seed:               42,
            interval_ms:        5_000,
            max_samples:        5_000,
            max_ticks:          None,
            utc_offset_minutes: 330,
            particulate_base:   120.0,
            particulate_jitter: 40.0,
            devices:            Vec::new(),
            vendor_specs:       BTreeMap::new(),
            tower:              None,
        }
    }
}

impl SiteConfig {
    /// Parse a JSON document.  Does not validate.
    pub fn from_json(text: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> CoreResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let file = std::fs::File::open(path)?;
        let config = Self::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the scheduler cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.interval_ms == 0 {
            return Err(CoreError::Config("intervalMs must be a positive integer".into()));
        }
        if self.max_samples == 0 {
            return Err(CoreError::Config("maxSamples must be a positive integer".into()));
        }
        let mut seen = HashSet::with_capacity(self.devices.len());
        for entry in &self.devices {
            if !seen.insert(&entry.id) {
                return Err(CoreError::DuplicateDevice(entry.id.clone()));
            }
        }
        if let Some(tower) = &self.tower {
            tower.validate()?;
        }
        Ok(())
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
