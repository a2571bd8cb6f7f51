//! `tt-generator` — telemetry sample generators for the TeleTwin simulator.
//!
//! # Module overview
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`generator`]  | `SampleGenerator` trait, `DeviceGenerator` dispatch enum    |
//! | [`context`]    | `GenContext`: read-only per-tick inputs                     |
//! | [`antenna`]    | directional antenna model                                   |
//! | [`radio_unit`] | remote radio unit thermal/power/alarm model                 |
//! | [`microwave`]  | microwave link budget and adaptive modulation               |
//! | [`rf`]         | path loss, rain attenuation, noise floor, modulation ladder |
//! | [`wind`]       | velocity pressure and wind load, exposure B / C / D         |
//! | [`structure`]  | monopole dead load, wind moment, capacity, utilization      |
//! | [`catalog`]    | built-in vendor specifications, overridable per site        |
//! | [`fleet`]      | builds device records + generators from a site topology     |
//! | [`error`]      | `ConfigWarning`                                             |
//!
//! Generators never fail.  Every formula is closed-form over bounded random
//! draws and every reported value is clamped to its documented envelope.

pub mod antenna;
pub mod catalog;
pub mod context;
pub mod error;
pub mod fleet;
pub mod generator;
pub mod microwave;
pub mod radio_unit;
pub mod rf;
pub mod structure;
pub mod wind;

#[cfg(test)]
mod tests;

pub use antenna::AntennaGenerator;
pub use catalog::VendorCatalog;
pub use context::GenContext;
pub use error::ConfigWarning;
pub use fleet::Fleet;
pub use generator::{DeviceGenerator, SampleGenerator, SequenceState};
pub use microwave::MicrowaveGenerator;
pub use radio_unit::RadioUnitGenerator;
pub use structure::{
    GoverningElement, LoadCombination, StructuralReport, StructuralStatus, TowerModel,
};
