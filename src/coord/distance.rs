//! Great-circle distance
//!
//! Haversine distance on a spherical Earth. All comparisons against
//! thresholds use the unrounded value.

use crate::constants::geo::EARTH_RADIUS_METERS;
use crate::coord::Coordinate;

/// Calculate the distance between two points in meters (Haversine formula)
///
/// # Arguments
/// * `p1` - First point
/// * `p2` - Second point
///
/// # Returns
/// Distance in meters. Exactly 0.0 when `p1 == p2`.
pub fn haversine_distance(p1: Coordinate, p2: Coordinate) -> f64 {
    if p1 == p2 {
        return 0.0;
    }

    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let delta_lat = (p2.lat - p1.lat).to_radians();
    let delta_lng = (p2.lng - p1.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Check if a point is within `radius_meters` of `center` (inclusive)
pub fn is_within(point: Coordinate, center: Coordinate, radius_meters: f64) -> bool {
    haversine_distance(point, center) <= radius_meters
}
