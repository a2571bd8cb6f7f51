//! `tt-store` — bounded-retention persistence for the TeleTwin simulator.
//!
//! | Backend       | Feature    | Storage                                   |
//! |---------------|------------|-------------------------------------------|
//! | `MemoryStore` | *(none)*   | process memory, one `RwLock`              |
//! | `SqliteStore` | `sqlite`   | single database file, WAL journal         |
//!
//! Both implement [`RetentionStore`].  After every `put_samples` call the
//! stored sample count is at most `max_samples`; the oldest samples by
//! timestamp go first.
//!
//! [`CsvExporter`] writes stored samples as one flat CSV file.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tt_store::{MemoryStore, RetentionStore};
//!
//! let store = MemoryStore::new(5_000);
//! store.put_samples(&batch)?;
//! let newest = store.latest(10)?;
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod row;
pub mod store;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvExporter;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use row::{SAMPLE_COLUMNS, SampleRow};
pub use store::{RetentionStore, StoreStats};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
