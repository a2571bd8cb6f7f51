//! `tt-sim` — tick scheduler for the TeleTwin simulator.
//!
//! # Tick loop
//!
//! ```text
//! first tick immediately, then every config.interval_ms:
//!   ① Environment  — one EnvironmentSnapshot for the site at clock.now()
//!   ② Generate     — one Sample per device from its own DeviceRng
//!                    (parallel with the `parallel` feature)
//!   ③ Post-process — overlay temperature/humidity/particulates/heat
//!   ④ Store        — RetentionStore::put_samples (append + evict, atomic)
//!   ⑤ Status       — active ⇄ warning on alarm changes (stored batches only)
//!   ⑥ Structure    — tower utilization at the snapshot's wind speed
//!                    (sites with a tower description)
//! until the StopHandle fires or config.max_ticks ticks have run;
//! then statistics + close.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                        |
//! |------------|-----------------------------------------------|
//! | `parallel` | Runs generation on Rayon's thread pool.       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tt_core::SiteConfig;
//! use tt_sim::{SchedulerBuilder, TracingObserver};
//! use tt_store::MemoryStore;
//!
//! let config = SiteConfig::from_path("site.json".as_ref())?;
//! let store = Arc::new(MemoryStore::new(config.max_samples));
//! let (mut scheduler, _warnings) = SchedulerBuilder::new(config, store).build()?;
//! scheduler.run(&mut TracingObserver::default())?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod scheduler;


pub use builder::SchedulerBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TracingObserver};
pub use scheduler::{Scheduler, TickReport};
pub use tt_core::StopHandle;
