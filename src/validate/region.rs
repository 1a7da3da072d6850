//! Region consistency
//!
//! Compares a coordinate with the declared centroid of the region the
//! contributor claims to be in.

use crate::coord::distance::haversine_distance;
use crate::coord::{round_to, Coordinate};
use crate::store::RegionDirectory;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of a region consistency check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConsistency {
    pub consistent: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_from_region_meters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_center_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_center_lng: Option<f64>,
}

impl RegionConsistency {
    fn without_distance(consistent: bool, reason: &str) -> Self {
        Self {
            consistent,
            reason: reason.to_string(),
            distance_from_region_meters: None,
            region_center_lat: None,
            region_center_lng: None,
        }
    }
}

/// Checks coordinates against region centroids from a [`RegionDirectory`]
#[derive(Clone)]
pub struct RegionConsistencyChecker {
    directory: Arc<dyn RegionDirectory>,
    threshold_meters: f64,
}

impl RegionConsistencyChecker {
    pub fn new(directory: Arc<dyn RegionDirectory>, threshold_meters: f64) -> Self {
        Self {
            directory,
            threshold_meters,
        }
    }

    pub fn threshold_meters(&self) -> f64 {
        self.threshold_meters
    }

    pub fn check(&self, coordinate: Coordinate, region_code: &str) -> RegionConsistency {
        let Some(region) = self.directory.lookup_region(region_code) else {
            return RegionConsistency::without_distance(false, "region not found");
        };

        let Some(center) = region.centroid() else {
            return RegionConsistency::without_distance(true, "no centroid — skipped");
        };

        let distance = haversine_distance(coordinate, center);
        let consistent = distance <= self.threshold_meters;
        let reason = if consistent {
            format!("within {:.0} m of region center", self.threshold_meters)
        } else {
            format!(
                "{:.0} m from region center exceeds {:.0} m",
                distance, self.threshold_meters
            )
        };

        RegionConsistency {
            consistent,
            reason,
            distance_from_region_meters: Some(round_to(distance, 2)),
            region_center_lat: Some(center.lat),
            region_center_lng: Some(center.lng),
        }
    }
}

impl std::fmt::Debug for RegionConsistencyChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionConsistencyChecker")
            .field("threshold_meters", &self.threshold_meters)
            .finish_non_exhaustive()
    }
}
