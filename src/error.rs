//! Error types for the traffic analytics crate.

use thiserror::Error;

use crate::analytics::TrackId;

/// Boxed error raised by an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for the analytics library.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur while aggregating tracks or writing output.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid track data: {0}")]
    InvalidTrack(String),

    #[error("Track {0} reported more than once in a single frame")]
    DuplicateTrack(TrackId),

    #[error("Detector or tracker failed: {0}")]
    Collaborator(#[source] BoxError),

    #[error("Frame source failed: {0}")]
    Source(#[source] BoxError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyticsError {
    pub fn invalid_track<S: Into<String>>(msg: S) -> Self {
        Self::InvalidTrack(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error only invalidates the frame it was raised for.
    ///
    /// Input errors skip the frame; everything else is surfaced to the caller.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTrack(_)
                | Self::DuplicateTrack(_)
                | Self::Collaborator(_)
                | Self::Json(_)
        )
    }
}
