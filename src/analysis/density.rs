//! Point density over a bounding box
//!
//! Area uses a flat-earth approximation scaled by the cosine of the
//! southern edge. Mean pairwise distance is O(n²).

use crate::analysis::Located;
use crate::constants::geo::KM_PER_DEGREE;
use crate::coord::distance::haversine_distance;
use crate::coord::{round_to, BoundingBox, Coordinate};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Density summary for a region's points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityStats {
    pub region_code: String,
    pub point_count: usize,
    pub area_km2: f64,
    pub density_per_km2: f64,
    pub average_pairwise_distance_meters: f64,
}

/// Approximate area of a lat/lng rectangle in km²
pub fn bounding_box_area_km2(bbox: &BoundingBox) -> f64 {
    (bbox.max_lat - bbox.min_lat)
        * (bbox.max_lng - bbox.min_lng)
        * KM_PER_DEGREE
        * KM_PER_DEGREE
        * bbox.min_lat.to_radians().cos()
}

/// Mean of all n(n-1)/2 pairwise distances in meters, 0 for fewer than two points
pub fn average_pairwise_distance(coords: &[Coordinate]) -> f64 {
    let n = coords.len();
    if n < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            total += haversine_distance(coords[i], coords[j]);
        }
    }
    total / (n * (n - 1) / 2) as f64
}

#[derive(Debug, Clone, Copy)]
pub struct DensityAnalyzer {
    warning_threshold: usize,
}

impl DensityAnalyzer {
    /// `warning_threshold` is the point count above which pairwise work is logged
    pub fn new(warning_threshold: usize) -> Self {
        Self { warning_threshold }
    }

    pub fn analyze<P: Located>(&self, region_code: &str, points: &[P]) -> DensityStats {
        let coords: Vec<Coordinate> = points.iter().map(|p| p.coordinate()).collect();

        if coords.len() > self.warning_threshold {
            warn!(
                region = region_code,
                points = coords.len(),
                "pairwise distance over a large point set"
            );
        }

        let area = BoundingBox::from_coordinates(coords.iter().copied())
            .map(|b| bounding_box_area_km2(&b))
            .unwrap_or(0.0);
        let density = if area > 0.0 {
            coords.len() as f64 / area
        } else {
            0.0
        };

        DensityStats {
            region_code: region_code.to_string(),
            point_count: coords.len(),
            area_km2: round_to(area, 4),
            density_per_km2: round_to(density, 4),
            average_pairwise_distance_meters: round_to(average_pairwise_distance(&coords), 2),
        }
    }
}
