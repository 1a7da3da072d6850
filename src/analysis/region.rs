//! Per-region GPS analysis report
//!
//! Pulls a region's price points for a date window and summarizes GPS
//! coverage, geographic spread, clusters, validation outcomes and density.
//! Read-only with respect to the point store.

use crate::analysis::cluster::{Cluster, SpatialClusterer};
use crate::analysis::density::{DensityAnalyzer, DensityStats};
use crate::analysis::nearest::{find_nearby, NearbyPoint};
use crate::config::{AnalysisConfig, ValidationConfig};
use crate::coord::{mean_center, round_to, BoundingBox, Coordinate};
use crate::error::{Error, Result};
use crate::geo::{GeocodingClient, GeocodingResult, ReverseGeocoder};
use crate::store::{GpsPoint, PricePoint, PricePointSource, RegionDirectory};
use crate::validate::CoordinateValidator;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Addresses resolved for the report's notable coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisAddresses {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<GeocodingResult>,
    /// One entry per cluster, in cluster order
    pub clusters: Vec<GeocodingResult>,
}

/// GPS analysis of one region over a date window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionGpsAnalysis {
    pub region_code: String,
    pub from: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    pub total_points: usize,
    pub points_with_gps: usize,
    pub points_without_gps: usize,
    pub gps_coverage_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
    pub clusters: Vec<Cluster>,
    pub valid_count: usize,
    pub invalid_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_quality_score: Option<f64>,
    pub average_pairwise_distance_meters: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<DensityStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<AnalysisAddresses>,
}

/// Composes validation, clustering and density over a region's points
#[derive(Clone)]
pub struct RegionAnalysisOrchestrator {
    directory: Arc<dyn RegionDirectory>,
    source: Arc<dyn PricePointSource>,
    validator: CoordinateValidator,
    clusterer: SpatialClusterer,
    density: DensityAnalyzer,
}

impl RegionAnalysisOrchestrator {
    pub fn new(
        validation: &ValidationConfig,
        analysis: &AnalysisConfig,
        directory: Arc<dyn RegionDirectory>,
        source: Arc<dyn PricePointSource>,
    ) -> Self {
        Self {
            validator: CoordinateValidator::new(validation, Arc::clone(&directory)),
            clusterer: SpatialClusterer::new(analysis.cluster_radius_meters, analysis.cluster_strategy),
            density: DensityAnalyzer::new(analysis.pairwise_warning_threshold),
            directory,
            source,
        }
    }

    pub fn validator(&self) -> &CoordinateValidator {
        &self.validator
    }

    /// Fetch a known region's points in the window
    fn points(&self, region_code: &str, from: NaiveDate, to: Option<NaiveDate>) -> Result<Vec<PricePoint>> {
        if let Some(to) = to {
            if to < from {
                return Err(Error::InvalidDateRange(format!("{} is before {}", to, from)));
            }
        }
        if self.directory.lookup_region(region_code).is_none() {
            return Err(Error::RegionNotFound(region_code.to_string()));
        }
        Ok(self.source.find_points(region_code, from, to))
    }

    fn gps_points(&self, region_code: &str, from: NaiveDate, to: Option<NaiveDate>) -> Result<Vec<GpsPoint>> {
        Ok(self
            .points(region_code, from, to)?
            .iter()
            .filter_map(GpsPoint::from_price_point)
            .collect())
    }

    pub fn analyze_region(
        &self,
        region_code: &str,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> Result<RegionGpsAnalysis> {
        let points = self.points(region_code, from, to)?;
        let gps: Vec<GpsPoint> = points.iter().filter_map(GpsPoint::from_price_point).collect();

        let total = points.len();
        let coverage = if total == 0 {
            0.0
        } else {
            round_to(gps.len() as f64 * 100.0 / total as f64, 1)
        };

        let coords: Vec<Coordinate> = gps.iter().map(|p| p.coordinate).collect();
        let clusters = self.clusterer.cluster(&gps);

        let validations: Vec<_> = gps
            .iter()
            .map(|p| self.validator.validate(p.coordinate, p.accuracy, Some(region_code)))
            .collect();
        let valid_count = validations.iter().filter(|v| v.valid).count();
        let average_quality_score = if validations.is_empty() {
            None
        } else {
            let sum: f64 = validations.iter().map(|v| v.quality_score).sum();
            Some(round_to(sum / validations.len() as f64, 1))
        };

        let density = (!gps.is_empty()).then(|| self.density.analyze(region_code, &gps));

        info!(
            region = region_code,
            points = total,
            with_gps = gps.len(),
            clusters = clusters.len(),
            "analyzed region"
        );

        Ok(RegionGpsAnalysis {
            region_code: region_code.to_string(),
            from,
            to,
            total_points: total,
            points_with_gps: gps.len(),
            points_without_gps: total - gps.len(),
            gps_coverage_percent: coverage,
            center: mean_center(&coords),
            bounds: BoundingBox::from_coordinates(coords.iter().copied()),
            clusters,
            valid_count,
            invalid_count: validations.len() - valid_count,
            average_quality_score,
            average_pairwise_distance_meters: density
                .as_ref()
                .map_or(0.0, |d| d.average_pairwise_distance_meters),
            density,
            addresses: None,
        })
    }

    /// Density statistics alone
    pub fn density(&self, region_code: &str, from: NaiveDate, to: Option<NaiveDate>) -> Result<DensityStats> {
        let gps = self.gps_points(region_code, from, to)?;
        Ok(self.density.analyze(region_code, &gps))
    }

    /// GPS-bearing points of a region near an origin
    pub fn nearby(
        &self,
        region_code: &str,
        from: NaiveDate,
        to: Option<NaiveDate>,
        origin: Coordinate,
        radius_km: f64,
        max_results: usize,
    ) -> Result<Vec<NearbyPoint<GpsPoint>>> {
        let gps = self.gps_points(region_code, from, to)?;
        Ok(find_nearby(origin, &gps, radius_km, max_results))
    }
}

impl std::fmt::Debug for RegionAnalysisOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionAnalysisOrchestrator")
            .field("validator", &self.validator)
            .field("clusterer", &self.clusterer)
            .finish_non_exhaustive()
    }
}

/// Reverse geocode the report's center and cluster centers
pub async fn enrich_with_addresses<B: ReverseGeocoder>(
    analysis: &mut RegionGpsAnalysis,
    client: &GeocodingClient<B>,
) {
    let center = match analysis.center {
        Some(c) => Some(client.reverse_geocode(c).await),
        None => None,
    };

    let mut clusters = Vec::with_capacity(analysis.clusters.len());
    for cluster in &analysis.clusters {
        clusters.push(client.reverse_geocode(cluster.center()).await);
    }

    analysis.addresses = Some(AnalysisAddresses { center, clusters });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::cache::GeocodeCache;
    use crate::geo::tests::{abidjan_body, StubBackend};
    use crate::store::{Dataset, Region};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn point(id: u64, coordinate: Option<(f64, f64)>, accuracy: Option<f64>, day: &str) -> PricePoint {
        PricePoint {
            id,
            region_code: "ABJ".to_string(),
            coordinate: coordinate.map(|(lat, lng)| Coordinate::new(lat, lng)),
            accuracy,
            recorded_date: date(day),
        }
    }

    fn orchestrator() -> RegionAnalysisOrchestrator {
        let dataset = Arc::new(Dataset::new(
            vec![
                Region {
                    code: "ABJ".to_string(),
                    name: Some("Abidjan".to_string()),
                    centroid_lat: Some(5.36),
                    centroid_lng: Some(-4.01),
                    active: true,
                },
                Region {
                    code: "EMPTY".to_string(),
                    name: None,
                    centroid_lat: None,
                    centroid_lng: None,
                    active: true,
                },
            ],
            vec![
                point(1, Some((5.3600, -4.0100)), Some(5.0), "2024-01-02"),
                point(2, Some((5.3630, -4.0100)), Some(20.0), "2024-01-03"),
                point(3, Some((5.4500, -4.0500)), None, "2024-01-04"),
                point(4, None, None, "2024-01-05"),
                point(5, Some((0.0, 0.0)), Some(5.0), "2024-01-06"),
                point(6, Some((5.3600, -4.0100)), Some(5.0), "2023-12-31"),
            ],
        ));
        RegionAnalysisOrchestrator::new(
            &ValidationConfig::default(),
            &AnalysisConfig::default(),
            dataset.clone(),
            dataset,
        )
    }

    #[test]
    fn test_analyze_region() {
        let analysis = orchestrator()
            .analyze_region("ABJ", date("2024-01-01"), Some(date("2024-01-31")))
            .unwrap();

        assert_eq!(analysis.total_points, 5);
        assert_eq!(analysis.points_with_gps, 4);
        assert_eq!(analysis.points_without_gps, 1);
        assert_eq!(analysis.gps_coverage_percent, 80.0);

        // Points 1 and 2 are ~330 m apart
        assert_eq!(analysis.clusters.len(), 1);
        assert_eq!(analysis.clusters[0].member_ids.iter().copied().collect::<Vec<_>>(), vec![1, 2]);

        // Null island fails the country bounds
        assert_eq!(analysis.valid_count, 3);
        assert_eq!(analysis.invalid_count, 1);

        // Scores: 100 (excellent), 90 (good), 70 (unknown accuracy), 0 (invalid)
        assert_eq!(analysis.average_quality_score, Some(65.0));

        let density = analysis.density.as_ref().unwrap();
        assert_eq!(density.point_count, 4);
        assert_eq!(analysis.average_pairwise_distance_meters, density.average_pairwise_distance_meters);
        assert!(analysis.bounds.unwrap().contains(Coordinate::new(0.0, 0.0)));
        assert!(analysis.addresses.is_none());
    }

    #[test]
    fn test_open_ended_window() {
        let analysis = orchestrator().analyze_region("ABJ", date("2023-01-01"), None).unwrap();
        assert_eq!(analysis.total_points, 6);
    }

    #[test]
    fn test_region_without_points() {
        let analysis = orchestrator().analyze_region("EMPTY", date("2024-01-01"), None).unwrap();

        assert_eq!(analysis.total_points, 0);
        assert_eq!(analysis.gps_coverage_percent, 0.0);
        assert!(analysis.center.is_none());
        assert!(analysis.density.is_none());
        assert!(analysis.average_quality_score.is_none());
        assert!(analysis.clusters.is_empty());
    }

    #[test]
    fn test_unknown_region() {
        let err = orchestrator().analyze_region("XXX", date("2024-01-01"), None).unwrap_err();
        assert!(matches!(err, Error::RegionNotFound(_)));
    }

    #[test]
    fn test_inverted_window() {
        let err = orchestrator()
            .analyze_region("ABJ", date("2024-02-01"), Some(date("2024-01-01")))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDateRange(_)));
    }

    #[test]
    fn test_nearby() {
        let results = orchestrator()
            .nearby("ABJ", date("2024-01-01"), None, Coordinate::new(5.36, -4.01), 1.0, 10)
            .unwrap();

        let ids: Vec<u64> = results.iter().map(|r| r.point.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_density_only() {
        let stats = orchestrator()
            .density("ABJ", date("2024-01-01"), Some(date("2024-01-03")))
            .unwrap();
        assert_eq!(stats.point_count, 2);
        assert_eq!(stats.region_code, "ABJ");
    }

    #[tokio::test]
    async fn test_enrich_with_addresses() {
        let orchestrator = orchestrator();
        let mut analysis = orchestrator.analyze_region("ABJ", date("2024-01-01"), None).unwrap();
        let client = GeocodingClient::new(StubBackend::returning(abidjan_body()), GeocodeCache::new(10), true);

        enrich_with_addresses(&mut analysis, &client).await;

        let addresses = analysis.addresses.unwrap();
        assert!(addresses.center.unwrap().success);
        assert_eq!(addresses.clusters.len(), analysis.clusters.len());
    }
}
