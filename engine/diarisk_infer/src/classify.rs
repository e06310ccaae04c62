use std::fmt;

use diarisk_membership::Domain;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds of the Moderate and High bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub moderate: f64,
    pub high: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            moderate: 35.0,
            high: 60.0,
        }
    }
}

/// Maps a defuzzified score onto a [`RiskLevel`].
///
/// The bands are `[min, moderate)`, `[moderate, high)` and `[high, max]`.
/// Scores outside the domain fall into the nearest outer band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    thresholds: Thresholds,
    domain: Domain,
}

impl Classifier {
    pub fn new(thresholds: Thresholds, domain: Domain) -> Result<Self, ConfigError> {
        let Thresholds { moderate, high } = thresholds;
        let ordered = moderate.is_finite()
            && high.is_finite()
            && domain.min < moderate
            && moderate < high
            && high <= domain.max;
        if !ordered {
            return Err(ConfigError::InvalidThresholds {
                moderate,
                high,
                min: domain.min,
                max: domain.max,
            });
        }
        Ok(Self { thresholds, domain })
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn classify(&self, score: f64) -> RiskLevel {
        if score >= self.thresholds.high {
            RiskLevel::High
        } else if score >= self.thresholds.moderate {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    /// Half-open crisp interval of each level, in ascending order.
    pub fn bands(&self) -> [(RiskLevel, f64, f64); 3] {
        [
            (RiskLevel::Low, self.domain.min, self.thresholds.moderate),
            (
                RiskLevel::Moderate,
                self.thresholds.moderate,
                self.thresholds.high,
            ),
            (RiskLevel::High, self.thresholds.high, self.domain.max),
        ]
    }
}
