//! SQLite backend (feature `sqlite`).
//!
//! Two tables, both holding the JSON form of the record next to the columns
//! queries filter and sort on:
//!
//! - `devices (id, record)`
//! - `samples (id, device_id, timestamp_ns, sequence_number, record)`
//!
//! `timestamp_ns` keeps the full nanosecond precision of the record, so range
//! bounds and eviction order agree with the in-memory backend.  `samples.id`
//! is an AUTOINCREMENT rowid and doubles as the insertion-order tie-breaker.  Append and eviction share one transaction behind the
//! connection mutex; freed pages are returned with `incremental_vacuum` once
//! the transaction commits.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Params, params};
use tracing::{debug, warn};
use tt_core::{Device, DeviceId, DeviceStatus, Sample};

use crate::{RetentionStore, StoreError, StoreResult, StoreStats};

const SCHEMA: &str = "
    PRAGMA auto_vacuum  = INCREMENTAL;
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous  = NORMAL;
    CREATE TABLE IF NOT EXISTS devices (
        id     TEXT PRIMARY KEY,
        record TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS samples (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        device_id       TEXT    NOT NULL,
        timestamp_ns    INTEGER NOT NULL,
        sequence_number INTEGER NOT NULL,
        record          TEXT    NOT NULL
    );
    CREATE INDEX IF NOT EXISTS samples_by_time   ON samples (timestamp_ns, id);
    CREATE INDEX IF NOT EXISTS samples_by_device ON samples (device_id, timestamp_ns, id);
";

/// Retention store persisted to an SQLite database file.
pub struct SqliteStore {
    max_samples: u64,
    conn:        Mutex<Option<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and initialise the schema.
    pub fn open(path: &Path, max_samples: u64) -> StoreResult<Self> {
        Self::from_connection(Connection::open(path)?, max_samples)
    }

    /// Private in-memory database, mostly for tests.
    pub fn open_in_memory(max_samples: u64) -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, max_samples)
    }

    fn from_connection(conn: Connection, max_samples: u64) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { max_samples, conn: Mutex::new(Some(conn)) })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Option<Connection>>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Run `f` on the open connection.
    fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> StoreResult<T>,
    {
        let mut guard = self.lock()?;
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        f(conn)
    }

    fn evict_excess(conn: &Connection, max_samples: u64) -> rusqlite::Result<usize> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM samples", [], |row| row.get(0))?;
        let excess = count.saturating_sub(i64::try_from(max_samples).unwrap_or(i64::MAX));
        if excess <= 0 {
            return Ok(0);
        }
        conn.execute(
            "DELETE FROM samples WHERE id IN \
             (SELECT id FROM samples ORDER BY timestamp_ns ASC, id ASC LIMIT ?1)",
            [excess],
        )
    }

    /// Hand freed pages back to the filesystem.  Failure only costs disk
    /// space, so it is logged rather than returned.
    fn compact(conn: &Connection) {
        if let Err(e) = Self::incremental_vacuum(conn) {
            warn!(error = %e, "sqlite compaction failed");
        }
    }

    /// The pragma frees pages as it is stepped, so drain it.
    fn incremental_vacuum(conn: &Connection) -> rusqlite::Result<()> {
        let mut stmt = conn.prepare_cached("PRAGMA incremental_vacuum")?;
        let mut rows = stmt.query([])?;
        while rows.next()?.is_some() {}
        Ok(())
    }

    fn cleanup(&self) -> StoreResult<usize> {
        let max_samples = self.max_samples;
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let evicted = Self::evict_excess(&tx, max_samples)?;
            tx.commit()?;
            if evicted > 0 {
                Self::compact(conn);
            }
            Ok(evicted)
        })
    }
}

/// Nanoseconds since the epoch.  Instants outside 1677–2262 saturate, which
/// keeps them ordered at the ends of the range.
fn nanos(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_nanos_opt()
        .unwrap_or(if ts.timestamp() < 0 { i64::MIN } else { i64::MAX })
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn query_samples<P: Params>(conn: &Connection, sql: &str, params: P) -> StoreResult<Vec<Sample>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(params, |row| row.get::<_, String>(0))?;
    let mut out = Vec::new();
    for json in rows {
        out.push(serde_json::from_str(&json?)?);
    }
    Ok(out)
}

impl RetentionStore for SqliteStore {
    fn put_devices(&self, devices: &[Device]) -> StoreResult<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT INTO devices (id, record) VALUES (?1, ?2) \
                     ON CONFLICT(id) DO UPDATE SET record = excluded.record",
                )?;
                for device in devices {
                    stmt.execute(params![device.id.as_str(), serde_json::to_string(device)?])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    fn put_samples(&self, samples: &[Sample]) -> StoreResult<usize> {
        let max_samples = self.max_samples;
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT INTO samples (device_id, timestamp_ns, sequence_number, record) \
                     VALUES (?1, ?2, ?3, ?4)",
                )?;
                for sample in samples {
                    stmt.execute(params![
                        sample.device_id.as_str(),
                        nanos(sample.timestamp),
                        i64::try_from(sample.sequence_number).unwrap_or(i64::MAX),
                        serde_json::to_string(sample)?,
                    ])?;
                }
            }
            let evicted = Self::evict_excess(&tx, max_samples)?;
            tx.commit()?;
            if evicted > 0 {
                Self::compact(conn);
            }
            debug!(appended = samples.len(), evicted, "sqlite store batch");
            Ok(evicted)
        })
    }

    fn latest(&self, limit: usize) -> StoreResult<Vec<Sample>> {
        self.with_conn(|conn| {
            query_samples(
                conn,
                "SELECT record FROM samples ORDER BY timestamp_ns DESC, id DESC LIMIT ?1",
                [sql_limit(limit)],
            )
        })
    }

    fn by_device(&self, device: &DeviceId, limit: usize) -> StoreResult<Vec<Sample>> {
        self.with_conn(|conn| {
            query_samples(
                conn,
                "SELECT record FROM samples WHERE device_id = ?1 \
                 ORDER BY timestamp_ns DESC, id DESC LIMIT ?2",
                params![device.as_str(), sql_limit(limit)],
            )
        })
    }

    fn in_range(
        &self,
        start: DateTime<Utc>,
        end:   DateTime<Utc>,
        limit: usize,
    ) -> StoreResult<Vec<Sample>> {
        self.with_conn(|conn| {
            if start > end {
                return Ok(Vec::new());
            }
            query_samples(
                conn,
                "SELECT record FROM samples WHERE timestamp_ns BETWEEN ?1 AND ?2 \
                 ORDER BY timestamp_ns DESC, id DESC LIMIT ?3",
                params![nanos(start), nanos(end), sql_limit(limit)],
            )
        })
    }

    fn all_devices(&self) -> StoreResult<Vec<Device>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached("SELECT record FROM devices ORDER BY id")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            let mut out = Vec::new();
            for json in rows {
                out.push(serde_json::from_str(&json?)?);
            }
            Ok(out)
        })
    }

    fn statistics(&self) -> StoreResult<StoreStats> {
        let max_samples = self.max_samples;
        self.with_conn(|conn| {
            let mut per_device = BTreeMap::new();
            {
                let mut stmt = conn.prepare_cached("SELECT id FROM devices")?;
                for id in stmt.query_map([], |row| row.get::<_, String>(0))? {
                    per_device.insert(DeviceId::new(id?), 0u64);
                }
            }
            let mut stmt =
                conn.prepare_cached("SELECT device_id, COUNT(*) FROM samples GROUP BY device_id")?;
            let counts = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            let mut total_records = 0u64;
            for row in counts {
                let (id, count) = row?;
                let count = count.max(0) as u64;
                total_records += count;
                per_device.insert(DeviceId::new(id), count);
            }
            let total_devices: i64 =
                conn.query_row("SELECT COUNT(*) FROM devices", [], |row| row.get(0))?;

            Ok(StoreStats {
                total_devices: total_devices.max(0) as u64,
                total_records,
                max_samples,
                per_device,
            })
        })
    }

    fn manual_cleanup(&self) -> usize {
        match self.cleanup() {
            Ok(evicted) => evicted,
            Err(e) => {
                warn!(error = %e, "manual cleanup failed");
                0
            }
        }
    }

    fn update_status(&self, device: &DeviceId, status: DeviceStatus) -> StoreResult<bool> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let json: Option<String> = tx
                .query_row(
                    "SELECT record FROM devices WHERE id = ?1",
                    [device.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(json) = json else {
                return Ok(false);
            };
            let mut record: Device = serde_json::from_str(&json)?;
            record.status = status;
            tx.execute(
                "UPDATE devices SET record = ?2 WHERE id = ?1",
                params![device.as_str(), serde_json::to_string(&record)?],
            )?;
            tx.commit()?;
            Ok(true)
        })
    }

    fn close(&self) -> StoreResult<()> {
        let mut guard = self.lock()?;
        if let Some(conn) = guard.take() {
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
            conn.close().map_err(|(_, e)| e)?;
        }
        Ok(())
    }

    #[inline]
    fn max_samples(&self) -> u64 {
        self.max_samples
    }
}
