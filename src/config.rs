//! Run configuration: congestion thresholds and region boundaries.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analytics::{RegionBounds, Thresholds};
use crate::error::{AnalyticsError, Result};

/// Process-wide analytics settings, fixed for the duration of a run.
///
/// ```yaml
/// thresholds:
///   heavy: 10
///   moderate: 5
/// regions:
///   left: 400
///   right: 800
///   exit: 1000
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub regions: RegionBounds,
}

impl AnalyticsConfig {
    /// Read and validate a YAML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: AnalyticsConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the entry/exit and congestion rules cannot work with.
    pub fn validate(&self) -> Result<()> {
        let RegionBounds { left, right, exit } = self.regions;
        if left >= right {
            return Err(AnalyticsError::config(format!(
                "left region ({left}) must be less than right region ({right})"
            )));
        }
        if right > exit {
            return Err(AnalyticsError::config(format!(
                "right region ({right}) must not exceed exit region ({exit})"
            )));
        }

        let Thresholds { heavy, moderate } = self.thresholds;
        if moderate > heavy {
            return Err(AnalyticsError::config(format!(
                "moderate threshold ({moderate}) must not exceed heavy threshold ({heavy})"
            )));
        }
        Ok(())
    }
}
