use serde::{Deserialize, Serialize};

/// Lane a horizontal position falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// Left of the left boundary
    Left,
    /// Right of the right boundary
    Right,
    /// Between the two boundaries; counted in neither lane
    Middle,
}

/// Pixel x-coordinates delimiting the monitored regions.
///
/// Expected to satisfy `left < right <= exit`, see
/// [`AnalyticsConfig::validate`](crate::config::AnalyticsConfig::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionBounds {
    #[serde(default = "default_left")]
    pub left: i64,
    #[serde(default = "default_right")]
    pub right: i64,
    #[serde(default = "default_exit")]
    pub exit: i64,
}

fn default_left() -> i64 {
    400
}

fn default_right() -> i64 {
    800
}

fn default_exit() -> i64 {
    1000
}

impl Default for RegionBounds {
    fn default() -> Self {
        Self {
            left: default_left(),
            right: default_right(),
            exit: default_exit(),
        }
    }
}

/// Maps a horizontal pixel coordinate to a lane.
#[derive(Debug, Clone, Copy)]
pub struct RegionClassifier {
    bounds: RegionBounds,
}

impl RegionClassifier {
    pub fn new(bounds: RegionBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &RegionBounds {
        &self.bounds
    }

    #[inline]
    pub fn classify_x(&self, x: i64) -> Lane {
        if x < self.bounds.left {
            Lane::Left
        } else if x > self.bounds.right {
            Lane::Right
        } else {
            Lane::Middle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_x() {
        let classifier = RegionClassifier::new(RegionBounds::default());

        assert_eq!(classifier.classify_x(399), Lane::Left);
        assert_eq!(classifier.classify_x(801), Lane::Right);
        assert_eq!(classifier.classify_x(600), Lane::Middle);
    }

    #[test]
    fn test_boundaries_are_middle() {
        let classifier = RegionClassifier::new(RegionBounds::default());

        // Both boundaries are exclusive
        assert_eq!(classifier.classify_x(400), Lane::Middle);
        assert_eq!(classifier.classify_x(800), Lane::Middle);
        assert_eq!(classifier.classify_x(-5), Lane::Left);
    }
}
