//! `tt-core` — foundational types for the TeleTwin tower telemetry simulator.
//!
//! This crate is a dependency of every other `tt-*` crate.  It has no `tt-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `DeviceId` (stable string id), `DeviceIndex` (fleet slot) |
//! | [`geo`]         | `GeoLocation` (lat / lng / altitude)                      |
//! | [`time`]        | `Tick`, `Clock`, `VirtualClock`, `SystemClock`, stop      |
//! | [`rng`]         | `DeviceRng` (per-device), `SimRng` (site-wide)            |
//! | [`device`]      | `Device`, `DeviceClass`, `DeviceStatus`, spec blocks      |
//! | [`sample`]      | `Sample` envelope and per-class `Measurements`            |
//! | [`tower`]       | `TowerConfig`: pole sections, platforms, anchor bolts     |
//! | [`config`]      | `SiteConfig`, topology entries                            |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! All record types serialize with `serde` using the camelCase wire shape
//! that query-serving layers depend on.

pub mod config;
pub mod device;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod sample;
pub mod time;
pub mod tower;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DeviceEntry, SiteConfig};
pub use device::{
    AntennaSpec, Device, DeviceClass, DeviceSpec, DeviceStatus, MicrowaveSpec, Modulation,
    RadioTechnology, RadioUnitSpec,
};
pub use error::{CoreError, CoreResult};
pub use geo::GeoLocation;
pub use ids::{DeviceId, DeviceIndex};
pub use rng::{DeviceRng, SimRng};
pub use sample::{
    AntennaMeasurements, Measurements, MicrowaveMeasurements, RadioAlarms,
    RadioUnitMeasurements, Sample,
};
pub use time::{Clock, StopHandle, SystemClock, Tick, VirtualClock};
pub use tower::{AnchorBolts, EquipmentLoad, Exposure, Platform, PoleSection, SteelGrade, TowerConfig};
