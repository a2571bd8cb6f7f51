//! Scheduler observer trait for progress reporting and failure handling.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use tt_core::{DeviceId, DeviceStatus, Tick};
use tt_generator::{StructuralReport, StructuralStatus};
use tt_store::{StoreError, StoreStats};

/// Callbacks invoked by the [`Scheduler`][crate::Scheduler] at key points in
/// the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: counting failed writes
///
/// ```rust,ignore
/// struct FailureCounter(usize);
///
/// impl SimObserver for FailureCounter {
///     fn on_store_error(&mut self, _tick: Tick, _error: &StoreError) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the start of each tick, before the environment snapshot.
    fn on_tick_start(&mut self, _tick: Tick, _now: DateTime<Utc>) {}

    /// Called after a batch was appended.  `evicted` samples were dropped to
    /// stay within the retention cap.
    fn on_batch_stored(&mut self, _tick: Tick, _samples: usize, _evicted: usize) {}

    /// Called when a store operation failed.  The tick loop carries on.
    fn on_store_error(&mut self, _tick: Tick, _error: &StoreError) {}

    /// Called when a device moved between `active` and `warning`.
    fn on_status_change(&mut self, _tick: Tick, _device: &DeviceId, _status: DeviceStatus) {}

    /// Called after the tower was checked against this tick's wind.  Only
    /// for sites with a tower description.
    fn on_structural_check(&mut self, _tick: Tick, _report: &StructuralReport) {}

    /// Called once after the store was closed.
    fn on_shutdown(&mut self, _ticks: u64, _stats: &StoreStats) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Logs scheduler progress through `tracing`.
///
/// Batches are logged at `info` every `every` ticks (and always for the
/// first).  Store failures and a tower at `Warning` or worse go to `warn`.
pub struct TracingObserver {
    every: u64,
}

impl TracingObserver {
    pub fn new(every: u64) -> Self {
        Self { every: every.max(1) }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SimObserver for TracingObserver {
    fn on_batch_stored(&mut self, tick: Tick, samples: usize, evicted: usize) {
        if tick.0.is_multiple_of(self.every) {
            info!(%tick, samples, evicted, "batch stored");
        }
    }

    fn on_store_error(&mut self, tick: Tick, error: &StoreError) {
        warn!(%tick, %error, "store operation failed");
    }

    fn on_status_change(&mut self, tick: Tick, device: &DeviceId, status: DeviceStatus) {
        info!(%tick, %device, ?status, "device status changed");
    }

    fn on_structural_check(&mut self, tick: Tick, report: &StructuralReport) {
        if report.status >= StructuralStatus::Warning {
            warn!(
                %tick,
                wind_speed = report.wind_speed_ms,
                utilization = report.max_utilization,
                combination = %report.governing_combination,
                status = %report.status,
                "tower utilization high"
            );
        }
    }

    fn on_shutdown(&mut self, ticks: u64, stats: &StoreStats) {
        info!(
            ticks,
            devices = stats.total_devices,
            records = stats.total_records,
            "simulation finished"
        );
    }
}
