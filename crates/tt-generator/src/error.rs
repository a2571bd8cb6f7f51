use thiserror::Error;
use tt_core::{DeviceClass, DeviceId};

/// Non-fatal topology problems.  The affected device is skipped and the
/// warning is handed back to whoever built the fleet.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigWarning {
    #[error("device {device}: unknown model {model:?}, device skipped")]
    UnknownModel { device: DeviceId, model: String },

    #[error("device {device}: model {model:?} is a {found} spec but the device is a {expected}, device skipped")]
    ClassMismatch {
        device:   DeviceId,
        model:    String,
        expected: DeviceClass,
        found:    DeviceClass,
    },
}
