//! `tt-environment` — site-wide weather and pollution for the TeleTwin simulator.
//!
//! Two pieces, both infallible and free of I/O:
//!
//! - [`EnvironmentModel`] turns a wall-clock instant into an
//!   [`EnvironmentSnapshot`] (season, temperature, humidity, particulates,
//!   wind, rain).  Recomputed once per scheduler tick.
//! - [`PostProcessor`] applies that snapshot uniformly to a freshly generated
//!   batch of samples before it is persisted.

pub mod model;
pub mod post;


pub use model::{EnvironmentModel, EnvironmentSnapshot, Season, SiteProfile};
pub use post::PostProcessor;
