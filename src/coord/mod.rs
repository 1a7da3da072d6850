//! Coordinates and planar helpers
//!
//! This module handles:
//! - The `Coordinate` value type and its range checks
//! - Axis-aligned bounding boxes
//! - Great-circle distance (see [`distance`])

pub mod distance;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude) in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Create a new coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that the coordinate is finite and within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(Error::InvalidCoordinates(format!(
                "Coordinate ({}, {}) is not finite",
                self.lat, self.lng
            )));
        }
        if self.lat < -90.0 || self.lat > 90.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if self.lng < -180.0 || self.lng > 180.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// True for the (0, 0) "null island" placeholder emitted by broken GPS stacks
    pub fn is_null_island(&self) -> bool {
        self.lat == 0.0 && self.lng == 0.0
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Axis-aligned latitude/longitude rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    /// Smallest box containing every coordinate, or None for an empty input
    pub fn from_coordinates<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        coords.into_iter().fold(None, |acc, c| {
            Some(match acc {
                None => Self::new(c.lat, c.lat, c.lng, c.lng),
                Some(b) => Self::new(
                    b.min_lat.min(c.lat),
                    b.max_lat.max(c.lat),
                    b.min_lng.min(c.lng),
                    b.max_lng.max(c.lng),
                ),
            })
        })
    }

    /// Inclusive containment test
    pub fn contains(&self, c: Coordinate) -> bool {
        c.lat >= self.min_lat && c.lat <= self.max_lat && c.lng >= self.min_lng && c.lng <= self.max_lng
    }

    /// Geometric center of the rectangle
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// Check that min <= max on both axes and all edges are finite
    pub fn validate(&self) -> Result<()> {
        let edges = [self.min_lat, self.max_lat, self.min_lng, self.max_lng];
        if edges.iter().any(|v| !v.is_finite()) {
            return Err(Error::Config("Bounding box edges must be finite".to_string()));
        }
        if self.min_lat > self.max_lat || self.min_lng > self.max_lng {
            return Err(Error::Config(format!(
                "Bounding box is inverted: lat {}..{}, lng {}..{}",
                self.min_lat, self.max_lat, self.min_lng, self.max_lng
            )));
        }
        Ok(())
    }
}

/// Arithmetic mean of a set of coordinates
pub fn mean_center(coords: &[Coordinate]) -> Option<Coordinate> {
    if coords.is_empty() {
        return None;
    }
    let n = coords.len() as f64;
    let lat = coords.iter().map(|c| c.lat).sum::<f64>() / n;
    let lng = coords.iter().map(|c| c.lng).sum::<f64>() / n;
    Some(Coordinate::new(lat, lng))
}

/// Round a value to a fixed number of decimal places (display only)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ranges() {
        assert!(Coordinate::new(5.36, -4.0).validate().is_ok());
        assert!(Coordinate::new(91.0, 0.0).validate().is_err());
        assert!(Coordinate::new(0.0, -180.5).validate().is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).validate().is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_null_island() {
        assert!(Coordinate::new(0.0, 0.0).is_null_island());
        assert!(!Coordinate::new(0.0, 0.1).is_null_island());
    }

    #[test]
    fn test_bounding_box_from_coordinates() {
        let bbox = BoundingBox::from_coordinates(vec![
            Coordinate::new(5.0, -4.0),
            Coordinate::new(6.0, -5.0),
            Coordinate::new(5.5, -3.5),
        ])
        .unwrap();

        assert_eq!(bbox, BoundingBox::new(5.0, 6.0, -5.0, -3.5));
        assert!(bbox.contains(Coordinate::new(5.0, -5.0)));
        assert!(!bbox.contains(Coordinate::new(6.01, -4.0)));
        assert!(BoundingBox::from_coordinates(Vec::new()).is_none());
    }

    #[test]
    fn test_bounding_box_validate() {
        assert!(BoundingBox::new(1.0, 2.0, 3.0, 4.0).validate().is_ok());
        assert!(BoundingBox::new(2.0, 1.0, 3.0, 4.0).validate().is_err());
        assert!(BoundingBox::new(1.0, f64::NAN, 3.0, 4.0).validate().is_err());
    }

    #[test]
    fn test_mean_center() {
        let center = mean_center(&[Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)]).unwrap();
        assert_eq!(center, Coordinate::new(2.0, 3.0));
        assert!(mean_center(&[]).is_none());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1234.5678, 2), 1234.57);
        assert_eq!(round_to(0.12345, 3), 0.123);
    }
}
