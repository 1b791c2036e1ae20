//! Per-track history kept across the whole run.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::analytics::region::RegionBounds;
use crate::analytics::tracked_object::TrackId;

/// Horizontal movement since the previous frame the track was seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MovementDirection {
    Left,
    Right,
}

impl fmt::Display for MovementDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("Left"),
            Self::Right => f.write_str("Right"),
        }
    }
}

/// Presence of a track within the monitored corridor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum EntryExitStatus {
    /// Never reported by the tracker
    #[default]
    NotSeen,
    /// First seen before the right boundary
    Entered,
    /// Seen past the exit boundary after having entered
    Exited,
    /// Seen, but never satisfied the entry condition
    InZone,
}

impl fmt::Display for EntryExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSeen => f.write_str("NotSeen"),
            Self::Entered => f.write_str("Entered"),
            Self::Exited => f.write_str("Exited"),
            Self::InZone => f.write_str("InZone"),
        }
    }
}

/// Position history for a single track id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    pub track_id: TrackId,
    /// Center from the most recent frame the track was confirmed
    pub last_center: (i64, i64),
    pub direction: MovementDirection,
}

/// Owns the track id → history mapping for the whole run.
///
/// Entries are never removed: a track that stops appearing keeps its last
/// known state until the store is dropped, and shows up in the final report.
/// Iteration follows first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TrackStateStore {
    records: Vec<TrackRecord>,
    index: HashMap<TrackId, usize>,
    entry_exit: HashMap<TrackId, EntryExitStatus>,
}

impl TrackStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: TrackId) -> Option<&TrackRecord> {
        self.index.get(&id).map(|&i| &self.records[i])
    }

    /// Records in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackRecord> {
        self.records.iter()
    }

    /// Status as seen by a query: the recorded status if any, `InZone` for
    /// known ids that never entered, `NotSeen` for unknown ids.
    pub fn status(&self, id: TrackId) -> EntryExitStatus {
        match self.entry_exit.get(&id) {
            Some(&status) => status,
            None if self.index.contains_key(&id) => EntryExitStatus::InZone,
            None => EntryExitStatus::NotSeen,
        }
    }

    /// Store the new center and return the direction relative to the
    /// previous one.
    ///
    /// An unseen id has no previous center; it is compared against itself,
    /// which always yields [`MovementDirection::Right`].
    pub fn update_position(&mut self, id: TrackId, center: (i64, i64)) -> MovementDirection {
        let record = self.record_mut(id, center);
        let previous_x = record.last_center.0;
        let direction = if center.0 < previous_x {
            MovementDirection::Left
        } else {
            MovementDirection::Right
        };
        record.last_center = center;
        record.direction = direction;
        direction
    }

    /// Apply the entry/exit rules for this frame's center x and return the
    /// resulting status.
    ///
    /// No recorded status and `center_x < right` records `Entered`. A recorded
    /// status and `center_x > exit` records `Exited`, including over an
    /// earlier `Exited`. Otherwise nothing changes.
    pub fn update_entry_exit(
        &mut self,
        id: TrackId,
        center_x: i64,
        bounds: &RegionBounds,
    ) -> EntryExitStatus {
        let recorded = self.entry_exit.get(&id).copied();
        let status = match recorded {
            None if center_x < bounds.right => {
                debug!(track_id = %id, center_x, "track entered");
                EntryExitStatus::Entered
            }
            Some(previous) if center_x > bounds.exit => {
                if previous != EntryExitStatus::Exited {
                    debug!(track_id = %id, center_x, "track exited");
                }
                EntryExitStatus::Exited
            }
            Some(previous) => return previous,
            None => return EntryExitStatus::InZone,
        };

        self.entry_exit.insert(id, status);
        status
    }

    fn record_mut(&mut self, id: TrackId, center: (i64, i64)) -> &mut TrackRecord {
        let i = match self.index.get(&id) {
            Some(&i) => i,
            None => {
                self.records.push(TrackRecord {
                    track_id: id,
                    last_center: center,
                    direction: MovementDirection::Right,
                });
                self.index.insert(id, self.records.len() - 1);
                self.records.len() - 1
            }
        };
        &mut self.records[i]
    }
}
