use thiserror::Error;
use tt_core::CoreError;
use tt_store::StoreError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type SimResult<T> = Result<T, SimError>;
