//! Core error type.
//!
//! Sub-crates define their own error enums (`StoreError`, `SimError`) and wrap
//! `CoreError` as one variant where configuration problems can surface.

use thiserror::Error;

use crate::DeviceId;

/// Errors raised while loading or validating site configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("duplicate device id {0} in topology")]
    DuplicateDevice(DeviceId),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `tt-core`.
pub type CoreResult<T> = Result<T, CoreError>;
