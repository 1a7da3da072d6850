//! GPS accuracy classification

use crate::config::defaults::DEFAULT_ACCURACY_THRESHOLDS;
use serde::{Deserialize, Serialize};

/// Quality tier of a reported GPS accuracy radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyLevel {
    /// At or under the first threshold (10 m by default)
    Excellent,
    Good,
    Fair,
    Poor,
    /// Above the last threshold, negative or not a number
    Invalid,
    /// No accuracy reported
    Unknown,
}

impl AccuracyLevel {
    /// Whether this level should produce a validation warning
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Poor | Self::Invalid | Self::Unknown)
    }
}

impl std::fmt::Display for AccuracyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::Poor => write!(f, "poor"),
            Self::Invalid => write!(f, "invalid"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for AccuracyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            "invalid" => Ok(Self::Invalid),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Unknown accuracy level: {}", s)),
        }
    }
}

/// Maps an accuracy radius in meters to an [`AccuracyLevel`]
///
/// Thresholds are inclusive upper bounds for Excellent, Good, Fair and Poor.
#[derive(Debug, Clone, Copy)]
pub struct AccuracyClassifier {
    thresholds: [f64; 4],
}

impl AccuracyClassifier {
    pub fn new(thresholds: [f64; 4]) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> [f64; 4] {
        self.thresholds
    }

    pub fn classify(&self, accuracy_meters: Option<f64>) -> AccuracyLevel {
        let Some(meters) = accuracy_meters else {
            return AccuracyLevel::Unknown;
        };
        if meters.is_nan() || meters < 0.0 {
            return AccuracyLevel::Invalid;
        }

        let [excellent, good, fair, poor] = self.thresholds;
        if meters <= excellent {
            AccuracyLevel::Excellent
        } else if meters <= good {
            AccuracyLevel::Good
        } else if meters <= fair {
            AccuracyLevel::Fair
        } else if meters <= poor {
            AccuracyLevel::Poor
        } else {
            AccuracyLevel::Invalid
        }
    }
}

impl Default for AccuracyClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_ACCURACY_THRESHOLDS)
    }
}
