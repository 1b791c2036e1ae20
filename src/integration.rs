//! Integration module for connecting frame sources, detectors and trackers
//! with the traffic analytics.
//!
//! Detection and tracking are external: this module only defines the traits
//! they plug into and the driver loop that feeds their output to the
//! [`FrameAggregator`](crate::analytics::FrameAggregator).

mod builder;
mod pipeline;
mod replay;
mod signal;
mod source;

pub use builder::TrackedObjectBuilder;
pub use pipeline::{FrameObserver, RunOutcome, StopReason, TrafficPipeline};
pub use replay::TrackLogReplay;
pub use signal::StopSignal;
pub use source::{
    DetectAndTrack, Detection, DetectionSource, Frame, FrameSource, IntoTrackedObjects,
    ObjectTracker, TrackFeed,
};
