use std::fmt;

use serde::{Deserialize, Serialize};

/// Frame-level congestion classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CongestionLevel {
    #[default]
    Light,
    Moderate,
    Heavy,
}

impl CongestionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Moderate => "Moderate",
            Self::Heavy => "Heavy",
        }
    }

    /// Suggested action for the summary report, if any.
    pub fn recommendation(&self) -> Option<&'static str> {
        match self {
            Self::Heavy => Some("Suggest increasing green light duration in congested areas."),
            Self::Moderate => Some(
                "Monitor traffic flow and consider signal adjustments if congestion increases.",
            ),
            Self::Light => None,
        }
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object-count thresholds for congestion classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_heavy")]
    pub heavy: usize,
    #[serde(default = "default_moderate")]
    pub moderate: usize,
}

fn default_heavy() -> usize {
    10
}

fn default_moderate() -> usize {
    5
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            heavy: default_heavy(),
            moderate: default_moderate(),
        }
    }
}

impl Thresholds {
    /// Classify an object count. Both comparisons are strict, so a count
    /// equal to a threshold falls into the lower class.
    pub fn classify(&self, object_count: usize) -> CongestionLevel {
        if object_count > self.heavy {
            CongestionLevel::Heavy
        } else if object_count > self.moderate {
            CongestionLevel::Moderate
        } else {
            CongestionLevel::Light
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_counts() {
        let thresholds = Thresholds::default();

        assert_eq!(thresholds.classify(11), CongestionLevel::Heavy);
        assert_eq!(thresholds.classify(10), CongestionLevel::Moderate);
        assert_eq!(thresholds.classify(6), CongestionLevel::Moderate);
        assert_eq!(thresholds.classify(5), CongestionLevel::Light);
        assert_eq!(thresholds.classify(0), CongestionLevel::Light);
    }

    #[test]
    fn test_recommendation_lookup() {
        assert!(CongestionLevel::Heavy.recommendation().is_some());
        assert!(CongestionLevel::Moderate.recommendation().is_some());
        assert_ne!(
            CongestionLevel::Heavy.recommendation(),
            CongestionLevel::Moderate.recommendation()
        );
        assert_eq!(CongestionLevel::Light.recommendation(), None);
    }
}
