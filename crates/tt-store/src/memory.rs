//! In-process backend.
//!
//! Samples live in one `Vec` kept sorted by timestamp, with equal timestamps
//! in insertion order.  Eviction drains from the front; queries walk from the
//! back.  A single `RwLock` covers devices and samples, so a batch and its
//! eviction are published together.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use tt_core::{Device, DeviceId, DeviceStatus, Sample};

use crate::{RetentionStore, StoreError, StoreResult, StoreStats};

#[derive(Default)]
struct Inner {
    devices: BTreeMap<DeviceId, Device>,
    samples: Vec<Sample>,
    closed:  bool,
}

impl Inner {
    fn insert(&mut self, sample: Sample) {
        // Common case: the batch is newer than everything stored.
        let at = match self.samples.last() {
            Some(last) if last.timestamp > sample.timestamp => self
                .samples
                .partition_point(|s| s.timestamp <= sample.timestamp),
            _ => self.samples.len(),
        };
        self.samples.insert(at, sample);
    }

    fn evict(&mut self, max_samples: u64) -> usize {
        let excess = (self.samples.len() as u64).saturating_sub(max_samples) as usize;
        if excess > 0 {
            self.samples.drain(..excess);
        }
        excess
    }

    /// Newest-first walk over samples matching `keep`.
    fn newest<F>(&self, limit: usize, keep: F) -> Vec<Sample>
    where
        F: Fn(&Sample) -> bool,
    {
        self.samples
            .iter()
            .rev()
            .filter(|s| keep(s))
            .take(limit)
            .cloned()
            .collect()
    }
}

/// Thread-safe in-memory retention store.
pub struct MemoryStore {
    max_samples: u64,
    inner:       RwLock<Inner>,
}

impl MemoryStore {
    pub fn new(max_samples: u64) -> Self {
        Self { max_samples, inner: RwLock::new(Inner::default()) }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        let guard = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        if guard.closed {
            return Err(StoreError::Closed);
        }
        Ok(guard)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        let guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        if guard.closed {
            return Err(StoreError::Closed);
        }
        Ok(guard)
    }
}

impl RetentionStore for MemoryStore {
    fn put_devices(&self, devices: &[Device]) -> StoreResult<()> {
        let mut inner = self.write()?;
        for device in devices {
            inner.devices.insert(device.id.clone(), device.clone());
        }
        Ok(())
    }

    fn put_samples(&self, samples: &[Sample]) -> StoreResult<usize> {
        let mut inner = self.write()?;
        for sample in samples {
            inner.insert(sample.clone());
        }
        let evicted = inner.evict(self.max_samples);
        debug!(
            appended = samples.len(),
            evicted,
            stored = inner.samples.len(),
            "memory store batch"
        );
        Ok(evicted)
    }

    fn latest(&self, limit: usize) -> StoreResult<Vec<Sample>> {
        Ok(self.read()?.newest(limit, |_| true))
    }

    fn by_device(&self, device: &DeviceId, limit: usize) -> StoreResult<Vec<Sample>> {
        Ok(self.read()?.newest(limit, |s| &s.device_id == device))
    }

    fn in_range(
        &self,
        start: DateTime<Utc>,
        end:   DateTime<Utc>,
        limit: usize,
    ) -> StoreResult<Vec<Sample>> {
        let inner = self.read()?;
        if start > end {
            return Ok(Vec::new());
        }
        let hi = inner.samples.partition_point(|s| s.timestamp <= end);
        let lo = inner.samples[..hi].partition_point(|s| s.timestamp < start);
        Ok(inner.samples[lo..hi].iter().rev().take(limit).cloned().collect())
    }

    fn all_devices(&self) -> StoreResult<Vec<Device>> {
        Ok(self.read()?.devices.values().cloned().collect())
    }

    fn statistics(&self) -> StoreResult<StoreStats> {
        let inner = self.read()?;
        let mut per_device: BTreeMap<DeviceId, u64> =
            inner.devices.keys().map(|id| (id.clone(), 0)).collect();
        for sample in &inner.samples {
            *per_device.entry(sample.device_id.clone()).or_insert(0) += 1;
        }
        Ok(StoreStats {
            total_devices: inner.devices.len() as u64,
            total_records: inner.samples.len() as u64,
            max_samples:   self.max_samples,
            per_device,
        })
    }

    fn manual_cleanup(&self) -> usize {
        match self.write() {
            Ok(mut inner) => inner.evict(self.max_samples),
            Err(e) => {
                warn!(error = %e, "manual cleanup failed");
                0
            }
        }
    }

    fn update_status(&self, device: &DeviceId, status: DeviceStatus) -> StoreResult<bool> {
        let mut inner = self.write()?;
        match inner.devices.get_mut(device) {
            Some(d) => {
                d.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn close(&self) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        if !inner.closed {
            inner.closed = true;
            inner.samples = Vec::new();
            inner.devices.clear();
        }
        Ok(())
    }

    #[inline]
    fn max_samples(&self) -> u64 {
        self.max_samples
    }
}
