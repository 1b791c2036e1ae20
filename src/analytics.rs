//! Stateful aggregation of tracked vehicles into traffic analytics.
//!
//! The external tracker hands over a list of tracked objects per frame;
//! [`FrameAggregator`] turns it into lane counts, a congestion level and one
//! [`OutputRecord`](crate::output::OutputRecord) per confirmed track, keeping
//! per-track history in a [`TrackStateStore`].

mod aggregator;
mod congestion;
mod region;
mod track_state;
mod tracked_object;

pub use aggregator::{FrameAggregator, FrameMetrics, FrameOutput};
pub use congestion::{CongestionLevel, Thresholds};
pub use region::{Lane, RegionBounds, RegionClassifier};
pub use track_state::{EntryExitStatus, MovementDirection, TrackRecord, TrackStateStore};
pub use tracked_object::{BBox, TrackId, TrackedObject};

pub(crate) use tracked_object::pixel_from_f32;
