//! Radius-bounded nearest-neighbor search

use crate::analysis::Located;
use crate::coord::distance::haversine_distance;
use crate::coord::{round_to, Coordinate};
use serde::{Deserialize, Serialize};

/// A point with its distance from the search origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPoint<P> {
    pub point: P,
    /// Kilometers, rounded to 3 decimals
    pub distance_km: f64,
}

/// Points within `radius_km` of `origin`, closest first, at most `max_results`.
///
/// Ties keep their input order.
pub fn find_nearby<P: Located + Clone>(
    origin: Coordinate,
    points: &[P],
    radius_km: f64,
    max_results: usize,
) -> Vec<NearbyPoint<P>> {
    let radius_meters = radius_km * 1000.0;

    let mut within: Vec<(f64, &P)> = points
        .iter()
        .map(|p| (haversine_distance(origin, p.coordinate()), p))
        .filter(|(meters, _)| *meters <= radius_meters)
        .collect();

    within.sort_by(|a, b| a.0.total_cmp(&b.0));
    within.truncate(max_results);

    within
        .into_iter()
        .map(|(meters, p)| NearbyPoint {
            point: p.clone(),
            distance_km: round_to(meters / 1000.0, 3),
        })
        .collect()
}
