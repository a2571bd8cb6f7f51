//! CSV export of stored samples.
//!
//! One row per sample, oldest first, with the columns listed in
//! [`SAMPLE_COLUMNS`](crate::row::SAMPLE_COLUMNS).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use crate::row::{SAMPLE_COLUMNS, SampleRow};
use crate::{RetentionStore, StoreError, StoreResult};

/// Writes samples to a CSV sink.
pub struct CsvExporter<W: Write> {
    writer:   Writer<W>,
    rows:     u64,
    finished: bool,
}

impl CsvExporter<File> {
    /// Create (or truncate) the file at `path` and write the header row.
    pub fn create(path: &Path) -> StoreResult<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvExporter<W> {
    pub fn from_writer(sink: W) -> StoreResult<Self> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(sink);
        writer.write_record(SAMPLE_COLUMNS)?;
        Ok(Self { writer, rows: 0, finished: false })
    }

    pub fn write_samples(&mut self, samples: &[tt_core::Sample]) -> StoreResult<()> {
        for sample in samples {
            self.writer.serialize(SampleRow::from_sample(sample)?)?;
            self.rows += 1;
        }
        Ok(())
    }

    /// Dump the whole content of `store`, oldest first.  Returns the number
    /// of rows written.
    pub fn write_store<S: RetentionStore + ?Sized>(&mut self, store: &S) -> StoreResult<usize> {
        let mut samples = store.latest(usize::MAX)?;
        samples.reverse();
        self.write_samples(&samples)?;
        Ok(samples.len())
    }

    /// Rows written so far, header excluded.
    #[inline]
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush the underlying sink.  Idempotent.
    pub fn finish(&mut self) -> StoreResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and hand back the sink.
    pub fn into_inner(self) -> StoreResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error()))
    }
}
