//! Closing summary report.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::analytics::{CongestionLevel, Thresholds, TrackId, TrackStateStore};
use crate::error::Result;

/// One-shot summary computed from the final state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryReport {
    pub frames: u64,
    pub congestion: CongestionLevel,
    pub thresholds: Thresholds,
    /// Last known center per track, in first-seen order
    pub final_positions: Vec<(TrackId, (i64, i64))>,
}

impl SummaryReport {
    /// Snapshot everything the report needs. Does not touch the store.
    pub fn finalize(
        frames: u64,
        congestion: CongestionLevel,
        thresholds: Thresholds,
        store: &TrackStateStore,
    ) -> Self {
        Self {
            frames,
            congestion,
            thresholds,
            final_positions: store
                .iter()
                .map(|record| (record.track_id, record.last_center))
                .collect(),
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.render())?;
        Ok(())
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Traffic Analysis Report")?;
        writeln!(f, "----------------------------")?;
        writeln!(f, "Total Frames Processed: {}", self.frames)?;
        writeln!(f, "Final Traffic Status: {} Traffic", self.congestion)?;
        writeln!(
            f,
            "Heavy Traffic Threshold: {} vehicles",
            self.thresholds.heavy
        )?;
        writeln!(
            f,
            "Moderate Traffic Threshold: {} vehicles",
            self.thresholds.moderate
        )?;

        writeln!(f, "\nMovement Trends:")?;
        for (id, (x, y)) in &self.final_positions {
            writeln!(f, "Object {} final position: ({}, {})", id, x, y)?;
        }

        writeln!(f, "\nRecommendations:")?;
        if let Some(line) = self.congestion.recommendation() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
