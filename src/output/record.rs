use serde::Serialize;

use crate::analytics::{CongestionLevel, EntryExitStatus, MovementDirection, TrackId};

/// Class label written for every tracked object.
pub const VEHICLE_CLASS: &str = "Vehicle";

/// One row of the record stream: a confirmed track in a given frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    #[serde(rename = "Frame")]
    pub frame: u64,
    #[serde(rename = "ObjectID")]
    pub track_id: TrackId,
    #[serde(rename = "Class")]
    pub class: &'static str,
    #[serde(rename = "TrafficStatus")]
    pub congestion: CongestionLevel,
    #[serde(rename = "MovementDirection")]
    pub direction: MovementDirection,
    #[serde(rename = "EntryExitStatus")]
    pub entry_exit: EntryExitStatus,
}

impl OutputRecord {
    pub fn vehicle(
        frame: u64,
        track_id: TrackId,
        congestion: CongestionLevel,
        direction: MovementDirection,
        entry_exit: EntryExitStatus,
    ) -> Self {
        Self {
            frame,
            track_id,
            class: VEHICLE_CLASS,
            congestion,
            direction,
            entry_exit,
        }
    }
}
