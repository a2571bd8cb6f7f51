//! Read-only per-tick inputs passed to every generator.

use chrono::{DateTime, Utc};
use tt_core::Tick;
use tt_environment::EnvironmentSnapshot;

/// Built once per tick by the scheduler and shared immutably across all
/// generators, so generation order cannot influence any reading.
pub struct GenContext<'a> {
    pub tick: Tick,

    /// Timestamp assigned to samples generated this tick.
    pub now: DateTime<Utc>,

    /// Site weather for this tick.
    pub env: &'a EnvironmentSnapshot,
}

impl<'a> GenContext<'a> {
    #[inline]
    pub fn new(tick: Tick, now: DateTime<Utc>, env: &'a EnvironmentSnapshot) -> Self {
        Self { tick, now, env }
    }
}
