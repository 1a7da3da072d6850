//! Country bounds and plausibility zones
//!
//! The rectangles are coarse, hand-tuned heuristics loaded from
//! configuration. They are not authoritative boundaries.

use crate::coord::{BoundingBox, Coordinate};
use serde::{Deserialize, Serialize};

/// A rectangle where a genuine price observation is unlikely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplausibleZone {
    /// Short identifier (e.g. "gulf_of_guinea")
    pub name: String,
    /// Human-readable reason reported when a coordinate falls inside
    pub reason: String,
    pub bounds: BoundingBox,
}

/// Outcome of the plausibility heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plausibility {
    pub plausible: bool,
    pub reason: String,
}

impl Plausibility {
    pub fn plausible() -> Self {
        Self {
            plausible: true,
            reason: "Coordinate is in a plausible location".to_string(),
        }
    }

    pub fn implausible(reason: impl Into<String>) -> Self {
        Self {
            plausible: false,
            reason: reason.into(),
        }
    }
}

/// Country rectangle plus implausible sub-rectangles
#[derive(Debug, Clone)]
pub struct BoundsChecker {
    country: BoundingBox,
    zones: Vec<ImplausibleZone>,
}

impl BoundsChecker {
    pub fn new(country: BoundingBox, zones: Vec<ImplausibleZone>) -> Self {
        Self { country, zones }
    }

    pub fn country(&self) -> &BoundingBox {
        &self.country
    }

    /// AABB test against the country rectangle
    pub fn is_within_country(&self, c: Coordinate) -> bool {
        self.country.contains(c)
    }

    /// Check the coordinate against null island and every implausible zone.
    /// The first matching zone wins.
    pub fn is_plausible(&self, c: Coordinate) -> Plausibility {
        if c.is_null_island() {
            return Plausibility::implausible("Coordinate is (0, 0), a typical GPS placeholder");
        }

        match self.zones.iter().find(|z| z.bounds.contains(c)) {
            Some(zone) => Plausibility::implausible(zone.reason.clone()),
            None => Plausibility::plausible(),
        }
    }
}
