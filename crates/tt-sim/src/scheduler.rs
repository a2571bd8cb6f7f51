//! The `Scheduler` and its tick loop.

use std::sync::Arc;

use tracing::{debug, info, warn};
use tt_core::{Clock, DeviceRng, DeviceStatus, Sample, SimRng, SiteConfig, StopHandle, Tick};
use tt_environment::{EnvironmentModel, PostProcessor};
use tt_generator::{DeviceGenerator, GenContext, SampleGenerator, StructuralStatus, TowerModel};
use tt_store::{RetentionStore, StoreStats};

use crate::{SimObserver, SimResult};

// ── Tick report ───────────────────────────────────────────────────────────────

/// What one tick did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub tick:              Tick,
    pub generated:         usize,
    /// `None` if the batch could not be stored.
    pub evicted:           Option<usize>,
    pub status_changes:    usize,
    /// `None` for a site without a tower description.
    pub structural_status: Option<StructuralStatus>,
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Simulation context and tick loop.
///
/// Each tick:
///
/// 1. **Environment**: one snapshot for the whole site at `clock.now()`.
/// 2. **Generate**: one sample per device, each from its own RNG
///    (parallel with the `parallel` feature).
/// 3. **Post-process**: overlay the snapshot on every sample.
/// 4. **Store**: one `put_samples` call; failures go to the observer.
/// 5. **Status**: devices whose alarm state flipped move between `active`
///    and `warning`.  Skipped when the batch was not stored.
/// 6. **Structure**: the tower, if configured, is checked against the
///    snapshot's wind speed.
///
/// Create via [`SchedulerBuilder`][crate::SchedulerBuilder].
pub struct Scheduler<S: RetentionStore + ?Sized> {
    pub(crate) config:      SiteConfig,
    pub(crate) store:       Arc<S>,
    pub(crate) clock:       Box<dyn Clock>,
    pub(crate) environment: EnvironmentModel,
    pub(crate) post:        PostProcessor,
    pub(crate) env_rng:     SimRng,
    pub(crate) structure:   Option<TowerModel>,

    /// Parallel vectors indexed by fleet slot.
    pub(crate) generators:  Vec<DeviceGenerator>,
    pub(crate) rngs:        Vec<DeviceRng>,
    pub(crate) statuses:    Vec<DeviceStatus>,

    /// Ticks completed so far; also the id of the next tick.
    pub(crate) next_tick:   Tick,
    pub(crate) stop:        StopHandle,
}

impl<S: RetentionStore + ?Sized> Scheduler<S> {
    // ── Public API ────────────────────────────────────────────────────────

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// The store shared with readers.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Structural model of the site's tower, if one is configured.
    pub fn tower(&self) -> Option<&TowerModel> {
        self.structure.as_ref()
    }

    pub fn device_count(&self) -> usize {
        self.generators.len()
    }

    /// Ticks completed so far.
    pub fn ticks_run(&self) -> u64 {
        self.next_tick.0
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Tick until stopped or until `max_ticks` ticks have run, then
    /// [`shutdown`](Self::shutdown).
    ///
    /// The first tick runs immediately; the clock waits one interval before
    /// each later tick.  Stopping cuts a wait on the system clock short.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<StoreStats> {
        info!(
            site = %self.config.name,
            devices = self.generators.len(),
            interval_ms = self.config.interval_ms,
            max_ticks = ?self.config.max_ticks,
            "scheduler started"
        );
        while !self.finished() {
            if self.next_tick > Tick::ZERO {
                self.clock.wait_unless_stopped(self.config.interval(), &self.stop);
                if self.finished() {
                    break;
                }
            }
            self.tick(observer);
        }
        let stats = self.shutdown()?;
        observer.on_shutdown(self.next_tick.0, &stats);
        Ok(stats)
    }

    /// Run exactly `n` ticks, waiting one interval between ticks as
    /// [`run`](Self::run) does.  Ignores `max_ticks` and the stop handle and
    /// leaves the store open.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> Vec<TickReport> {
        (0..n)
            .map(|_| {
                if self.next_tick > Tick::ZERO {
                    self.clock.wait(self.config.interval());
                }
                self.tick(observer)
            })
            .collect()
    }

    /// Read final statistics and close the store.  The store is closed even
    /// when reading the statistics fails.
    pub fn shutdown(&mut self) -> SimResult<StoreStats> {
        let stats = self.store.statistics();
        let closed = self.store.close();
        let stats = stats?;
        closed?;
        info!(
            ticks = self.next_tick.0,
            records = stats.total_records,
            devices = stats.total_devices,
            "scheduler shut down"
        );
        Ok(stats)
    }

    /// Execute one tick at the clock's current time.
    ///
    /// Never fails: store errors are handed to `observer` and logged, and
    /// the next tick proceeds normally.
    pub fn tick<O: SimObserver>(&mut self, observer: &mut O) -> TickReport {
        let tick = self.next_tick;
        let now = self.clock.now();
        observer.on_tick_start(tick, now);

        // ── Environment ───────────────────────────────────────────────────
        let env = self.environment.snapshot(now, &mut self.env_rng);

        // ── Generate + post-process ───────────────────────────────────────
        let ctx = GenContext::new(tick, now, &env);
        let mut batch = self.generate(&ctx);
        self.post.apply_batch(&mut batch, &env);

        // ── Store ─────────────────────────────────────────────────────────
        let evicted = match self.store.put_samples(&batch) {
            Ok(evicted) => {
                debug!(%tick, samples = batch.len(), evicted, "batch stored");
                observer.on_batch_stored(tick, batch.len(), evicted);
                Some(evicted)
            }
            Err(e) => {
                warn!(%tick, error = %e, "failed to store batch");
                observer.on_store_error(tick, &e);
                None
            }
        };

        // ── Status transitions ────────────────────────────────────────────
        // Unstored readings must not move a device's recorded status.
        let status_changes = match evicted {
            Some(_) => self.update_statuses(tick, &batch, observer),
            None => 0,
        };

        // ── Structural check ──────────────────────────────────────────────
        let structural_status = self.structure.as_ref().map(|tower| {
            let report = tower.analyze(env.wind_speed);
            debug!(
                %tick,
                wind_speed = report.wind_speed_ms,
                utilization = report.max_utilization,
                status = %report.status,
                "structural check"
            );
            observer.on_structural_check(tick, &report);
            report.status
        });

        self.next_tick = tick.next();
        TickReport {
            tick,
            generated: batch.len(),
            evicted,
            status_changes,
            structural_status,
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn finished(&self) -> bool {
        self.stop.is_stopped()
            || self.config.max_ticks.is_some_and(|max| self.next_tick.0 >= max)
    }

    /// One sample per device, in fleet order.
    fn generate(&mut self, ctx: &GenContext<'_>) -> Vec<Sample> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let generators = &mut self.generators;
        let rngs = &mut self.rngs;

        #[cfg(not(feature = "parallel"))]
        {
            generators
                .iter_mut()
                .zip(rngs.iter_mut())
                .map(|(generator, rng)| generator.generate(ctx, rng))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            generators
                .par_iter_mut()
                .zip(rngs.par_iter_mut())
                .map(|(generator, rng)| generator.generate(ctx, rng))
                .collect()
        }
    }

    /// Move devices between `active` and `warning` from their latest alarm
    /// state.  `maintenance` and `offline` are left alone.
    fn update_statuses<O: SimObserver>(
        &mut self,
        tick:     Tick,
        batch:    &[Sample],
        observer: &mut O,
    ) -> usize {
        let mut changes = 0;
        for (slot, sample) in batch.iter().enumerate() {
            let current = self.statuses[slot];
            let wanted = match (current, sample.has_alarm()) {
                (DeviceStatus::Active, true) => DeviceStatus::Warning,
                (DeviceStatus::Warning, false) => DeviceStatus::Active,
                _ => continue,
            };
            match self.store.update_status(&sample.device_id, wanted) {
                Ok(_) => {
                    self.statuses[slot] = wanted;
                    changes += 1;
                    observer.on_status_change(tick, &sample.device_id, wanted);
                }
                Err(e) => {
                    warn!(%tick, device = %sample.device_id, error = %e, "failed to update status");
                    observer.on_store_error(tick, &e);
                }
            }
        }
        changes
    }
}
