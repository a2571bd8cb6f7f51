//! Fluent builder for constructing a [`Scheduler`].

use std::sync::Arc;

use tracing::info;
use tt_core::{
    Clock, CoreError, DeviceIndex, DeviceRng, SimRng, SiteConfig, StopHandle, SystemClock, Tick,
};
use tt_environment::{EnvironmentModel, PostProcessor, SiteProfile};
use tt_generator::{ConfigWarning, Fleet, TowerModel, VendorCatalog};
use tt_store::RetentionStore;

use crate::{Scheduler, SimResult};

/// Offsets fed to [`SimRng::child`] so the environment stream and the
/// bookkeeping stream never overlap.
const ENV_STREAM: u64 = 1;
const FLEET_STREAM: u64 = 2;

/// Fluent builder for [`Scheduler<S>`].
///
/// # Required inputs
///
/// - [`SiteConfig`]: seed, interval, retention cap, topology, …
/// - `Arc<S>` where `S: RetentionStore`: shared with any readers
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                     |
/// |-----------------|---------------------------------------------|
/// | `.clock(c)`     | [`SystemClock`]                             |
/// | `.catalog(c)`   | built-in catalog + `config.vendor_specs`    |
///
/// # Example
///
/// ```rust,ignore
/// let store = Arc::new(MemoryStore::new(config.max_samples));
/// let (mut scheduler, warnings) = SchedulerBuilder::new(config, store)
///     .clock(VirtualClock::from_unix_secs(1_720_000_000))
///     .build()?;
/// scheduler.run(&mut TracingObserver::default())?;
/// ```
pub struct SchedulerBuilder<S: RetentionStore + ?Sized> {
    config:  SiteConfig,
    store:   Arc<S>,
    clock:   Option<Box<dyn Clock>>,
    catalog: Option<VendorCatalog>,
}

impl<S: RetentionStore + ?Sized> SchedulerBuilder<S> {
    pub fn new(config: SiteConfig, store: Arc<S>) -> Self {
        Self { config, store, clock: None, catalog: None }
    }

    /// Use `clock` for timestamps and inter-tick waits.
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Resolve models against `catalog` alone.  `config.vendor_specs` is not
    /// layered on top.
    pub fn catalog(mut self, catalog: VendorCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Validate the configuration, build the fleet, register its devices
    /// with the store and return a ready-to-run [`Scheduler`].
    ///
    /// Topology entries that cannot be resolved are skipped and returned as
    /// warnings; they never fail the build.
    pub fn build(self) -> SimResult<(Scheduler<S>, Vec<ConfigWarning>)> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));
        let now = clock.now();

        let mut root = SimRng::new(self.config.seed);
        let env_rng = root.child(ENV_STREAM);
        let mut fleet_rng = root.child(FLEET_STREAM);

        let fleet = match &self.catalog {
            Some(catalog) => Fleet::build_with_catalog(&self.config, catalog, &mut fleet_rng, now),
            None => Fleet::build(&self.config, &mut fleet_rng, now),
        };

        self.store.put_devices(&fleet.devices)?;

        let rngs = (0..fleet.devices.len())
            .map(|slot| Ok(DeviceRng::new(self.config.seed, slot_index(slot)?)))
            .collect::<SimResult<Vec<_>>>()?;
        let statuses = fleet.devices.iter().map(|d| d.status).collect();

        let structure = self.config.tower.as_ref().map(|tower| {
            let model = TowerModel::with_devices(tower, &fleet.devices);
            info!(
                height_m = model.height_m(),
                exposure = ?model.exposure(),
                equipment_kg = model.equipment_weight_kg(),
                "tower model loaded"
            );
            model
        });

        info!(
            site = %self.config.name,
            devices = fleet.len(),
            skipped = fleet.warnings.len(),
            "scheduler built"
        );

        let scheduler = Scheduler {
            environment: EnvironmentModel::new(SiteProfile::from(&self.config)),
            post:        PostProcessor,
            env_rng,
            structure,
            generators:  fleet.generators,
            rngs,
            statuses,
            next_tick:   Tick::ZERO,
            stop:        StopHandle::default(),
            clock,
            store:       self.store,
            config:      self.config,
        };
        Ok((scheduler, fleet.warnings))
    }
}

/// Fleet slot as a [`DeviceIndex`]; a fleet larger than `u32` slots is a
/// configuration error.
pub(crate) fn slot_index(slot: usize) -> SimResult<DeviceIndex> {
    DeviceIndex::try_from(slot).map_err(|_| {
        CoreError::Config(format!("fleet slot {slot} does not fit a device index")).into()
    })
}
