//! Append-only sinks for the record stream.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::output::OutputRecord;

/// Column headers of the record stream, in write order.
pub const RECORD_COLUMNS: [&str; 6] = [
    "Frame",
    "ObjectID",
    "Class",
    "TrafficStatus",
    "MovementDirection",
    "EntryExitStatus",
];

/// Destination for output records.
///
/// Records must be persisted in the order they are appended. Write failures
/// are returned to the caller, never dropped.
///
/// # Example
///
/// ```ignore
/// use traffic_analytics::{OutputRecord, OutputSink, Result};
///
/// struct Printer;
///
/// impl OutputSink for Printer {
///     fn append(&mut self, record: &OutputRecord) -> Result<()> {
///         println!("{:?}", record);
///         Ok(())
///     }
/// }
/// ```
pub trait OutputSink {
    /// Append a single record.
    fn append(&mut self, record: &OutputRecord) -> Result<()>;

    /// Flush anything buffered. Called once the run is over.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl OutputSink for Vec<OutputRecord> {
    fn append(&mut self, record: &OutputRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes records as CSV rows, header first.
pub struct CsvRecordSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvRecordSink<File> {
    /// Create (or truncate) a CSV file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> CsvRecordSink<W> {
    /// Wrap a writer and emit the header row.
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(RECORD_COLUMNS)?;
        Ok(Self { writer })
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| e.into_error().into())
    }
}

impl<W: Write> OutputSink for CsvRecordSink<W> {
    fn append(&mut self, record: &OutputRecord) -> Result<()> {
        self.writer.serialize(record)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
