//! Per-frame metrics stream, the data behind the live traffic overlay.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::analytics::{CongestionLevel, FrameMetrics};
use crate::error::Result;

#[derive(Serialize)]
struct MetricsRow {
    #[serde(rename = "Frame")]
    frame: u64,
    #[serde(rename = "ObjectCount")]
    object_count: usize,
    #[serde(rename = "LeftLane")]
    left_lane: usize,
    #[serde(rename = "RightLane")]
    right_lane: usize,
    #[serde(rename = "TrafficStatus")]
    congestion: CongestionLevel,
}

impl From<&FrameMetrics> for MetricsRow {
    fn from(m: &FrameMetrics) -> Self {
        Self {
            frame: m.frame,
            object_count: m.object_count,
            left_lane: m.left_lane,
            right_lane: m.right_lane,
            congestion: m.congestion,
        }
    }
}

/// Writes one CSV row of [`FrameMetrics`] per aggregated frame.
pub struct MetricsCsvWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl MetricsCsvWriter<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> MetricsCsvWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    pub fn write(&mut self, metrics: &FrameMetrics) -> Result<()> {
        self.writer.serialize(MetricsRow::from(metrics))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| e.into_error().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_rows() {
        let mut writer = MetricsCsvWriter::new(Vec::new());
        writer
            .write(&FrameMetrics {
                frame: 3,
                object_count: 12,
                left_lane: 4,
                right_lane: 5,
                congestion: CongestionLevel::Heavy,
            })
            .unwrap();

        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "Frame,ObjectCount,LeftLane,RightLane,TrafficStatus\n3,12,4,5,Heavy\n"
        );
    }
}
