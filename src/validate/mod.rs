//! Single-coordinate validation
//!
//! Only the country bounds check is a hard failure. Accuracy, region
//! consistency and plausibility degrade the quality score and add warnings
//! but leave `valid` set.

pub mod accuracy;
pub mod bounds;
pub mod quality;
pub mod region;

use crate::config::ValidationConfig;
use crate::coord::Coordinate;
use crate::store::RegionDirectory;
use accuracy::{AccuracyClassifier, AccuracyLevel};
use bounds::{BoundsChecker, Plausibility};
use quality::QualityScorer;
use region::{RegionConsistency, RegionConsistencyChecker};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Result of validating one coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub coordinate: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    pub valid: bool,
    pub accuracy_level: AccuracyLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_consistency: Option<RegionConsistency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plausibility: Option<Plausibility>,
    pub quality_score: f64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Entry point for single-point validation
#[derive(Debug, Clone)]
pub struct CoordinateValidator {
    bounds: BoundsChecker,
    accuracy: AccuracyClassifier,
    region: RegionConsistencyChecker,
    scorer: QualityScorer,
}

impl CoordinateValidator {
    pub fn new(config: &ValidationConfig, directory: Arc<dyn RegionDirectory>) -> Self {
        Self {
            bounds: BoundsChecker::new(config.country_bounds, config.implausible_zones.clone()),
            accuracy: AccuracyClassifier::new(config.accuracy_thresholds),
            region: RegionConsistencyChecker::new(directory, config.region_consistency_threshold_meters),
            scorer: QualityScorer,
        }
    }

    pub fn bounds(&self) -> &BoundsChecker {
        &self.bounds
    }

    pub fn validate(
        &self,
        coordinate: Coordinate,
        accuracy: Option<f64>,
        region_code: Option<&str>,
    ) -> ValidationResult {
        let accuracy_level = self.accuracy.classify(accuracy);

        if !self.bounds.is_within_country(coordinate) {
            debug!(%coordinate, "coordinate outside country bounds");
            return ValidationResult {
                coordinate,
                accuracy,
                region_code: region_code.map(String::from),
                valid: false,
                accuracy_level,
                region_consistency: None,
                plausibility: None,
                quality_score: 0.0,
                errors: vec![format!("Coordinate ({}) is outside the country bounds", coordinate)],
                warnings: Vec::new(),
            };
        }

        let mut warnings = Vec::new();

        if accuracy_level.is_degraded() {
            warnings.push(match accuracy {
                Some(meters) => format!("GPS accuracy {} m is {}", meters, accuracy_level),
                None => "GPS accuracy not reported".to_string(),
            });
        }

        let region_consistency = region_code.map(|code| self.region.check(coordinate, code));
        if let Some(rc) = region_consistency.as_ref().filter(|rc| !rc.consistent) {
            warnings.push(format!("Region inconsistency: {}", rc.reason));
        }

        let plausibility = self.bounds.is_plausible(coordinate);
        if !plausibility.plausible {
            warnings.push(format!("Implausible location: {}", plausibility.reason));
        }

        let quality_score = self
            .scorer
            .score(accuracy_level, region_consistency.as_ref(), &plausibility);

        ValidationResult {
            coordinate,
            accuracy,
            region_code: region_code.map(String::from),
            valid: true,
            accuracy_level,
            region_consistency,
            plausibility: Some(plausibility),
            quality_score,
            errors: Vec::new(),
            warnings,
        }
    }
}
