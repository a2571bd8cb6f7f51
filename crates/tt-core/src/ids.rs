//! Device identifiers.
//!
//! Two kinds of id exist side by side:
//!
//! - [`DeviceId`] is the stable, human-assigned string (`"ANT-001"`) taken
//!   from the topology.  It is what gets persisted and queried.
//! - [`DeviceIndex`] is the device's slot in the scheduler's fleet `Vec`.  It
//!   is dense, `Copy`, and seeds that device's RNG.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable device identity, unchanged across restarts.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        DeviceId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        DeviceId(s.to_owned())
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        DeviceId(s)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Slot of a device in the scheduler's fleet.  Seeds the device's RNG.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct DeviceIndex(pub u32);

/// Fails for fleets larger than `u32::MAX` devices.
impl TryFrom<usize> for DeviceIndex {
    type Error = std::num::TryFromIntError;
    fn try_from(slot: usize) -> Result<DeviceIndex, Self::Error> {
        u32::try_from(slot).map(DeviceIndex)
    }
}
