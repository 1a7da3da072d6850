//! Spatial clustering
//!
//! Two strategies are available:
//! - `SeedRadius`: greedy, in input order. Each unassigned point seeds a
//!   cluster and absorbs every later unassigned point within the radius of
//!   the seed itself. Membership is not transitive.
//! - `ConnectedComponents`: union-find over the graph whose edges join
//!   points within the radius of each other. Membership is transitive.
//!
//! Groups with a single member are dropped by both.

use crate::analysis::Located;
use crate::coord::distance::{haversine_distance, is_within};
use crate::coord::{mean_center, round_to, Coordinate};
use crate::store::PointId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Clustering algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterStrategy {
    /// Single link from the seed point only
    #[default]
    SeedRadius,
    /// Transitive closure of the radius graph
    ConnectedComponents,
}

impl std::fmt::Display for ClusterStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SeedRadius => write!(f, "seed_radius"),
            Self::ConnectedComponents => write!(f, "connected_components"),
        }
    }
}

impl std::str::FromStr for ClusterStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "seed_radius" | "seed-radius" | "seed" => Ok(Self::SeedRadius),
            "connected_components" | "connected-components" | "connected" => {
                Ok(Self::ConnectedComponents)
            }
            _ => Err(format!("Unknown cluster strategy: {}", s)),
        }
    }
}

/// A group of at least two nearby points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub member_ids: BTreeSet<PointId>,
    pub center_lat: f64,
    pub center_lng: f64,
    /// Max member distance from the center
    pub radius_meters: f64,
}

impl Cluster {
    /// Freeze a set of members into a cluster
    fn from_members<P: Located>(members: &[&P]) -> Option<Self> {
        let coords: Vec<Coordinate> = members.iter().map(|p| p.coordinate()).collect();
        let center = mean_center(&coords)?;
        let radius = coords
            .iter()
            .map(|&c| haversine_distance(center, c))
            .fold(0.0, f64::max);

        Some(Self {
            member_ids: members.iter().map(|p| p.point_id()).collect(),
            center_lat: center.lat,
            center_lng: center.lng,
            radius_meters: round_to(radius, 2),
        })
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.center_lat, self.center_lng)
    }

    pub fn size(&self) -> usize {
        self.member_ids.len()
    }
}

/// Groups points that lie within a fixed radius
#[derive(Debug, Clone, Copy)]
pub struct SpatialClusterer {
    radius_meters: f64,
    strategy: ClusterStrategy,
}

impl SpatialClusterer {
    pub fn new(radius_meters: f64, strategy: ClusterStrategy) -> Self {
        Self {
            radius_meters,
            strategy,
        }
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    pub fn strategy(&self) -> ClusterStrategy {
        self.strategy
    }

    /// Cluster points, returning groups of two or more in order of their
    /// first member's input position
    pub fn cluster<P: Located>(&self, points: &[P]) -> Vec<Cluster> {
        let groups = match self.strategy {
            ClusterStrategy::SeedRadius => self.seed_groups(points),
            ClusterStrategy::ConnectedComponents => self.connected_groups(points),
        };

        groups
            .into_iter()
            .filter(|g| g.len() >= 2)
            .filter_map(|g| {
                let members: Vec<&P> = g.into_iter().map(|i| &points[i]).collect();
                Cluster::from_members(&members)
            })
            .collect()
    }

    fn seed_groups<P: Located>(&self, points: &[P]) -> Vec<Vec<usize>> {
        let mut assigned = vec![false; points.len()];
        let mut groups = Vec::new();

        for i in 0..points.len() {
            if assigned[i] {
                continue;
            }
            assigned[i] = true;
            let seed = points[i].coordinate();
            let mut group = vec![i];

            for j in (i + 1)..points.len() {
                if !assigned[j] && is_within(points[j].coordinate(), seed, self.radius_meters) {
                    assigned[j] = true;
                    group.push(j);
                }
            }

            groups.push(group);
        }

        groups
    }

    fn connected_groups<P: Located>(&self, points: &[P]) -> Vec<Vec<usize>> {
        let mut sets = DisjointSet::new(points.len());

        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                if is_within(points[j].coordinate(), points[i].coordinate(), self.radius_meters) {
                    sets.union(i, j);
                }
            }
        }

        let mut order: Vec<usize> = Vec::new();
        let mut by_root: HashMap<usize, Vec<usize>> = HashMap::new();
        for i in 0..points.len() {
            let root = sets.find(i);
            by_root
                .entry(root)
                .or_insert_with(|| {
                    order.push(root);
                    Vec::new()
                })
                .push(i);
        }

        order
            .into_iter()
            .filter_map(|root| by_root.remove(&root))
            .collect()
    }
}

/// Union-find with path halving and union by size
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] { (ra, rb) } else { (rb, ra) };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct P(PointId, f64, f64);

    impl Located for P {
        fn point_id(&self) -> PointId {
            self.0
        }

        fn coordinate(&self) -> Coordinate {
            Coordinate::new(self.1, self.2)
        }
    }

    fn ids(cluster: &Cluster) -> Vec<PointId> {
        cluster.member_ids.iter().copied().collect()
    }

    // 0.0045 degrees of latitude is ~500 m, 0.018 is ~2 km
    #[test]
    fn test_points_500m_apart_cluster() {
        let points = vec![P(1, 7.0, -5.0), P(2, 7.0045, -5.0)];
        let clusters = SpatialClusterer::new(1000.0, ClusterStrategy::SeedRadius).cluster(&points);

        assert_eq!(clusters.len(), 1);
        assert_eq!(ids(&clusters[0]), vec![1, 2]);
    }

    #[test]
    fn test_points_2km_apart_never_cluster() {
        let points = vec![P(1, 7.0, -5.0), P(2, 7.018, -5.0)];
        for strategy in [ClusterStrategy::SeedRadius, ClusterStrategy::ConnectedComponents] {
            let clusters = SpatialClusterer::new(1000.0, strategy).cluster(&points);
            assert!(clusters.is_empty(), "{:?}", strategy);
        }
    }

    #[test]
    fn test_singletons_dropped() {
        let points = vec![P(1, 7.0, -5.0), P(2, 7.001, -5.0), P(3, 8.0, -5.0)];
        let clusters = SpatialClusterer::new(1000.0, ClusterStrategy::SeedRadius).cluster(&points);

        assert_eq!(clusters.len(), 1);
        assert!(!clusters[0].member_ids.contains(&3));
    }

    #[test]
    fn test_seed_radius_is_not_transitive() {
        // A-B ~778 m, B-C ~778 m, A-C ~1557 m
        let points = vec![P(1, 7.0, -5.0), P(2, 7.007, -5.0), P(3, 7.014, -5.0)];

        let seed = SpatialClusterer::new(1000.0, ClusterStrategy::SeedRadius).cluster(&points);
        assert_eq!(seed.len(), 1);
        assert_eq!(ids(&seed[0]), vec![1, 2]);

        let connected = SpatialClusterer::new(1000.0, ClusterStrategy::ConnectedComponents).cluster(&points);
        assert_eq!(connected.len(), 1);
        assert_eq!(ids(&connected[0]), vec![1, 2, 3]);
    }

    #[test]
    fn test_seed_reaches_both_sides() {
        // The middle point is the seed; both neighbours are within 1 km of it
        // even though they are ~1.5 km from each other.
        let points = vec![P(1, 7.007, -5.0), P(2, 7.0, -5.0), P(3, 7.014, -5.0)];
        let clusters = SpatialClusterer::new(1000.0, ClusterStrategy::SeedRadius).cluster(&points);

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].size(), 3);
    }

    #[test]
    fn test_center_and_radius() {
        let points = vec![P(1, 7.0, -5.0), P(2, 7.004, -5.0)];
        let clusters = SpatialClusterer::new(1000.0, ClusterStrategy::SeedRadius).cluster(&points);
        let cluster = &clusters[0];

        assert!((cluster.center_lat - 7.002).abs() < 1e-9);
        assert!((cluster.center_lng + 5.0).abs() < 1e-9);
        let half = haversine_distance(Coordinate::new(7.0, -5.0), Coordinate::new(7.004, -5.0)) / 2.0;
        assert!((cluster.radius_meters - half).abs() < 0.01);
    }

    #[test]
    fn test_order_follows_input() {
        let points = vec![
            P(10, 8.0, -5.0),
            P(20, 7.0, -5.0),
            P(11, 8.001, -5.0),
            P(21, 7.001, -5.0),
        ];
        let clusters = SpatialClusterer::new(1000.0, ClusterStrategy::ConnectedComponents).cluster(&points);

        assert_eq!(clusters.len(), 2);
        assert_eq!(ids(&clusters[0]), vec![10, 11]);
        assert_eq!(ids(&clusters[1]), vec![20, 21]);
    }

    #[test]
    fn test_empty_input() {
        let points: Vec<P> = Vec::new();
        assert!(SpatialClusterer::new(1000.0, ClusterStrategy::SeedRadius).cluster(&points).is_empty());
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("seed_radius".parse::<ClusterStrategy>().unwrap(), ClusterStrategy::SeedRadius);
        assert_eq!(
            "connected-components".parse::<ClusterStrategy>().unwrap(),
            ClusterStrategy::ConnectedComponents
        );
        assert!("kmeans".parse::<ClusterStrategy>().is_err());
        assert_eq!(ClusterStrategy::default(), ClusterStrategy::SeedRadius);
    }
}
