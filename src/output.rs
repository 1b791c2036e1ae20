//! Output side of the analytics: the per-object record stream, the
//! per-frame metrics stream and the closing summary report.

mod metrics;
mod record;
mod report;
mod sink;

pub use metrics::MetricsCsvWriter;
pub use record::{OutputRecord, VEHICLE_CLASS};
pub use report::SummaryReport;
pub use sink::{CsvRecordSink, OutputSink};
