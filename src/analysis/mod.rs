//! Region-level spatial analysis
//!
//! This module handles:
//! - Grouping nearby observations into clusters
//! - Bounding-box density and mean pairwise distance
//! - Radius-bounded nearest-neighbor search
//! - Composing the above into a per-region GPS report

pub mod cluster;
pub mod density;
pub mod nearest;
pub mod region;

use crate::coord::Coordinate;
use crate::store::PointId;

/// Anything with an identity and a position
pub trait Located {
    fn point_id(&self) -> PointId;
    fn coordinate(&self) -> Coordinate;
}

pub use cluster::{Cluster, ClusterStrategy, SpatialClusterer};
pub use density::{DensityAnalyzer, DensityStats};
pub use nearest::{find_nearby, NearbyPoint};
pub use region::{RegionAnalysisOrchestrator, RegionGpsAnalysis};
