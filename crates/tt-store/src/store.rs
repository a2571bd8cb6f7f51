//! The `RetentionStore` trait implemented by every backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tt_core::{Device, DeviceId, DeviceStatus, Sample};

use crate::StoreResult;

/// Snapshot of store occupancy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_devices: u64,
    pub total_records: u64,
    pub max_samples:   u64,
    /// Stored sample count per device.  Registered devices with no samples
    /// appear with a count of 0.
    pub per_device:    BTreeMap<DeviceId, u64>,
}

/// Bounded-retention persistence for device records and telemetry samples.
///
/// One writer, many readers: every method takes `&self` so a store can sit
/// behind an `Arc` shared by the scheduler and any number of query threads.
///
/// Query results are ordered by timestamp descending; samples with equal
/// timestamps come newest-inserted first.
pub trait RetentionStore: Send + Sync {
    /// Upsert device records by id.  Idempotent.
    fn put_devices(&self, devices: &[Device]) -> StoreResult<()>;

    /// Append a batch and enforce the retention cap in one atomic step.
    ///
    /// Once this returns, the stored count is `<= max_samples()`: the oldest
    /// samples by timestamp (insertion order on ties) are evicted first.
    /// Readers never observe the batch without its eviction.  Returns the
    /// number of samples evicted.
    fn put_samples(&self, samples: &[Sample]) -> StoreResult<usize>;

    /// Newest `limit` samples across all devices.
    fn latest(&self, limit: usize) -> StoreResult<Vec<Sample>>;

    /// Newest `limit` samples of one device.  Unknown ids yield an empty list.
    fn by_device(&self, device: &DeviceId, limit: usize) -> StoreResult<Vec<Sample>>;

    /// Samples with `start <= timestamp <= end`, newest first, at most
    /// `limit`.  An inverted range yields an empty list.
    fn in_range(
        &self,
        start: DateTime<Utc>,
        end:   DateTime<Utc>,
        limit: usize,
    ) -> StoreResult<Vec<Sample>>;

    /// Every registered device, ordered by id.
    fn all_devices(&self) -> StoreResult<Vec<Device>>;

    fn statistics(&self) -> StoreResult<StoreStats>;

    /// Run an eviction pass outside the write path.
    ///
    /// Idempotent: on a compliant store nothing changes.  Errors are logged
    /// and swallowed; the return value is the number of samples evicted
    /// (0 on error).
    fn manual_cleanup(&self) -> usize;

    /// Move a device to `status`.  Returns `false` if the id is unknown.
    fn update_status(&self, device: &DeviceId, status: DeviceStatus) -> StoreResult<bool>;

    /// Flush and release the backend.  Later calls to any other method fail
    /// with [`StoreError::Closed`](crate::StoreError::Closed).
    ///
    /// Idempotent: closing a closed store succeeds.
    fn close(&self) -> StoreResult<()>;

    /// The retention cap this store enforces.
    fn max_samples(&self) -> u64;
}

impl<S: RetentionStore + ?Sized> RetentionStore for Arc<S> {
    fn put_devices(&self, devices: &[Device]) -> StoreResult<()> {
        (**self).put_devices(devices)
    }

    fn put_samples(&self, samples: &[Sample]) -> StoreResult<usize> {
        (**self).put_samples(samples)
    }

    fn latest(&self, limit: usize) -> StoreResult<Vec<Sample>> {
        (**self).latest(limit)
    }

    fn by_device(&self, device: &DeviceId, limit: usize) -> StoreResult<Vec<Sample>> {
        (**self).by_device(device, limit)
    }

    fn in_range(
        &self,
        start: DateTime<Utc>,
        end:   DateTime<Utc>,
        limit: usize,
    ) -> StoreResult<Vec<Sample>> {
        (**self).in_range(start, end, limit)
    }

    fn all_devices(&self) -> StoreResult<Vec<Device>> {
        (**self).all_devices()
    }

    fn statistics(&self) -> StoreResult<StoreStats> {
        (**self).statistics()
    }

    fn manual_cleanup(&self) -> usize {
        (**self).manual_cleanup()
    }

    fn update_status(&self, device: &DeviceId, status: DeviceStatus) -> StoreResult<bool> {
        (**self).update_status(device, status)
    }

    fn close(&self) -> StoreResult<()> {
        (**self).close()
    }

    fn max_samples(&self) -> u64 {
        (**self).max_samples()
    }
}
