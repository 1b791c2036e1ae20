//! Traffic analytics over tracked vehicle detections.
//!
//! Consumes the per-frame output of an external detector and tracker and
//! produces lane counts, movement direction, entry/exit status and a
//! congestion classification per frame, written as a CSV record stream
//! and summarized in a closing report.

pub mod analytics;
pub mod config;
pub mod error;
pub mod integration;
pub mod output;

pub use analytics::{
    BBox, CongestionLevel, EntryExitStatus, FrameAggregator, FrameMetrics, FrameOutput, Lane,
    MovementDirection, RegionBounds, RegionClassifier, Thresholds, TrackId, TrackRecord,
    TrackStateStore, TrackedObject,
};
pub use config::AnalyticsConfig;
pub use error::{AnalyticsError, Result};
pub use integration::{
    DetectAndTrack, Detection, DetectionSource, Frame, FrameObserver, FrameSource,
    IntoTrackedObjects, ObjectTracker, RunOutcome, StopReason, StopSignal, TrackFeed,
    TrackLogReplay, TrackedObjectBuilder, TrafficPipeline,
};
pub use output::{CsvRecordSink, MetricsCsvWriter, OutputRecord, OutputSink, SummaryReport};
