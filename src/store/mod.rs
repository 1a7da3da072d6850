//! External collaborators
//!
//! The region directory and the price point store live outside this crate.
//! The engine only sees them through [`RegionDirectory`] and
//! [`PricePointSource`]. [`Dataset`] is an in-memory implementation of both,
//! loadable from a JSON file, used by the CLI, the server and tests.

use crate::analysis::Located;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Identifier of a price observation
pub type PointId = u64;

/// An administrative region as known by the region directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid_lng: Option<f64>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Region {
    /// Declared centroid, only when both axes are on file
    pub fn centroid(&self) -> Option<Coordinate> {
        match (self.centroid_lat, self.centroid_lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }
}

/// A price observation with optional GPS fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub id: PointId,
    pub region_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
    /// Reported GPS accuracy radius in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    pub recorded_date: NaiveDate,
}

/// A price point known to carry a GPS fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub id: PointId,
    pub coordinate: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    pub recorded_date: NaiveDate,
}

impl GpsPoint {
    /// Narrow a price point to its GPS-bearing form
    pub fn from_price_point(point: &PricePoint) -> Option<Self> {
        point.coordinate.map(|coordinate| Self {
            id: point.id,
            coordinate,
            accuracy: point.accuracy,
            recorded_date: point.recorded_date,
        })
    }
}

impl Located for GpsPoint {
    fn point_id(&self) -> PointId {
        self.id
    }

    fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

/// Read-only access to the administrative region directory
pub trait RegionDirectory: Send + Sync {
    /// Look up a region by code, None if unknown
    fn lookup_region(&self, code: &str) -> Option<Region>;
}

/// Read-only access to stored price observations
pub trait PricePointSource: Send + Sync {
    /// Points for a region recorded within `[from, to]` (inclusive).
    /// An absent `to` leaves the window open-ended.
    fn find_points(&self, region_code: &str, from: NaiveDate, to: Option<NaiveDate>) -> Vec<PricePoint>;
}

/// In-memory regions and price points
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    regions: Vec<Region>,
    #[serde(default)]
    points: Vec<PricePoint>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Dataset {
    /// Build a dataset from regions and points
    pub fn new(regions: Vec<Region>, points: Vec<PricePoint>) -> Self {
        let mut dataset = Self {
            regions,
            points,
            index: HashMap::new(),
        };
        dataset.reindex();
        dataset
    }

    /// Load a dataset from a JSON file of the form `{ "regions": [...], "points": [...] }`
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Data(format!("Failed to read dataset {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse a dataset from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let mut dataset: Dataset = serde_json::from_str(content)
            .map_err(|e| Error::Data(format!("Failed to parse dataset: {}", e)))?;
        dataset.reindex();
        Ok(dataset)
    }

    fn reindex(&mut self) {
        self.index = self
            .regions
            .iter()
            .enumerate()
            .map(|(i, r)| (r.code.clone(), i))
            .collect();
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }
}

impl RegionDirectory for Dataset {
    fn lookup_region(&self, code: &str) -> Option<Region> {
        self.index.get(code).map(|&i| self.regions[i].clone())
    }
}

impl PricePointSource for Dataset {
    fn find_points(&self, region_code: &str, from: NaiveDate, to: Option<NaiveDate>) -> Vec<PricePoint> {
        self.points
            .iter()
            .filter(|p| p.region_code == region_code)
            .filter(|p| p.recorded_date >= from && to.map_or(true, |to| p.recorded_date <= to))
            .cloned()
            .collect()
    }
}
