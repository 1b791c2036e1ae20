//! Per-frame aggregation driving the track state store.

use std::collections::HashSet;

use tracing::debug;

use crate::analytics::congestion::{CongestionLevel, Thresholds};
use crate::analytics::region::{Lane, RegionBounds, RegionClassifier};
use crate::analytics::track_state::TrackStateStore;
use crate::analytics::tracked_object::TrackedObject;
use crate::error::{AnalyticsError, Result};
use crate::output::OutputRecord;

/// Frame-level counts, computed once per frame and not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMetrics {
    pub frame: u64,
    /// Number of confirmed tracks in the frame
    pub object_count: usize,
    pub left_lane: usize,
    pub right_lane: usize,
    pub congestion: CongestionLevel,
}

/// Result of aggregating a single frame.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub metrics: FrameMetrics,
    /// One record per confirmed track, in encounter order
    pub records: Vec<OutputRecord>,
}

/// Turns each frame's tracked objects into metrics and output records.
///
/// Frames must be fed strictly in order: movement direction is derived from
/// the position stored for the previous frame.
#[derive(Debug, Clone)]
pub struct FrameAggregator {
    thresholds: Thresholds,
    classifier: RegionClassifier,
    store: TrackStateStore,
    frame_count: u64,
    last_congestion: CongestionLevel,
}

impl FrameAggregator {
    pub fn new(thresholds: Thresholds, bounds: RegionBounds) -> Self {
        Self {
            thresholds,
            classifier: RegionClassifier::new(bounds),
            store: TrackStateStore::new(),
            frame_count: 0,
            last_congestion: CongestionLevel::default(),
        }
    }

    /// Aggregate the next frame.
    ///
    /// The frame is counted even when its input is rejected. Rejection happens
    /// before any state is touched, so a failed frame emits no records and
    /// leaves the track store unchanged.
    pub fn process_frame(&mut self, tracks: &[TrackedObject]) -> Result<FrameOutput> {
        self.frame_count += 1;
        let frame = self.frame_count;

        let confirmed: Vec<&TrackedObject> = tracks.iter().filter(|t| t.confirmed).collect();
        check_unique_ids(&confirmed)?;

        let object_count = confirmed.len();
        let congestion = self.thresholds.classify(object_count);
        let bounds = *self.classifier.bounds();

        let mut left_lane = 0;
        let mut right_lane = 0;
        let mut records = Vec::with_capacity(object_count);

        for track in confirmed {
            let center = track.center();
            let direction = self.store.update_position(track.track_id, center);
            let status = self
                .store
                .update_entry_exit(track.track_id, center.0, &bounds);

            match self.classifier.classify_x(center.0) {
                Lane::Left => left_lane += 1,
                Lane::Right => right_lane += 1,
                Lane::Middle => {}
            }

            records.push(OutputRecord::vehicle(
                frame,
                track.track_id,
                congestion,
                direction,
                status,
            ));
        }

        self.last_congestion = congestion;

        let metrics = FrameMetrics {
            frame,
            object_count,
            left_lane,
            right_lane,
            congestion,
        };
        debug!(
            frame,
            object_count,
            left_lane,
            right_lane,
            congestion = %congestion,
            "frame aggregated"
        );

        Ok(FrameOutput { metrics, records })
    }

    /// Count a frame whose tracks never arrived, e.g. a malformed tracker row.
    pub fn skip_frame(&mut self) -> u64 {
        self.frame_count += 1;
        self.frame_count
    }

    /// Frames pulled so far, including rejected ones.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Classification of the most recent successfully aggregated frame.
    pub fn last_congestion(&self) -> CongestionLevel {
        self.last_congestion
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn bounds(&self) -> &RegionBounds {
        self.classifier.bounds()
    }

    pub fn store(&self) -> &TrackStateStore {
        &self.store
    }
}

fn check_unique_ids(confirmed: &[&TrackedObject]) -> Result<()> {
    let mut seen = HashSet::with_capacity(confirmed.len());
    for track in confirmed {
        if !seen.insert(track.track_id) {
            return Err(AnalyticsError::DuplicateTrack(track.track_id));
        }
    }
    Ok(())
}
