//! Quality score
//!
//! Starts at 100 and subtracts fixed, independent deductions. The result is
//! clamped at 0 and rounded to one decimal.

use crate::coord::round_to;
use crate::validate::accuracy::AccuracyLevel;
use crate::validate::bounds::Plausibility;
use crate::validate::region::RegionConsistency;

pub const MAX_SCORE: f64 = 100.0;
pub const INCONSISTENT_REGION_DEDUCTION: f64 = 20.0;
pub const IMPLAUSIBLE_DEDUCTION: f64 = 30.0;

/// Deduction for an accuracy tier
pub fn accuracy_deduction(level: AccuracyLevel) -> f64 {
    match level {
        AccuracyLevel::Excellent => 0.0,
        AccuracyLevel::Good => 10.0,
        AccuracyLevel::Fair => 25.0,
        AccuracyLevel::Poor => 50.0,
        AccuracyLevel::Invalid => 80.0,
        AccuracyLevel::Unknown => 30.0,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QualityScorer;

impl QualityScorer {
    /// Score a validated coordinate.
    ///
    /// A missing region check (no region code supplied) costs nothing.
    pub fn score(
        &self,
        accuracy: AccuracyLevel,
        region: Option<&RegionConsistency>,
        plausibility: &Plausibility,
    ) -> f64 {
        let mut deductions = accuracy_deduction(accuracy);
        if region.is_some_and(|r| !r.consistent) {
            deductions += INCONSISTENT_REGION_DEDUCTION;
        }
        if !plausibility.plausible {
            deductions += IMPLAUSIBLE_DEDUCTION;
        }
        round_to((MAX_SCORE - deductions).max(0.0), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consistency(consistent: bool) -> RegionConsistency {
        RegionConsistency {
            consistent,
            reason: String::new(),
            distance_from_region_meters: None,
            region_center_lat: None,
            region_center_lng: None,
        }
    }

    #[test]
    fn test_perfect_score() {
        let score = QualityScorer.score(AccuracyLevel::Excellent, None, &Plausibility::plausible());
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_additive_deductions() {
        let score = QualityScorer.score(
            AccuracyLevel::Good,
            Some(&consistency(false)),
            &Plausibility::implausible("ocean"),
        );
        assert_eq!(score, 40.0);
    }

    #[test]
    fn test_bottoms_out_at_zero() {
        let score = QualityScorer.score(
            AccuracyLevel::Invalid,
            Some(&consistency(false)),
            &Plausibility::implausible("ocean"),
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_consistent_region_costs_nothing() {
        let with = QualityScorer.score(AccuracyLevel::Fair, Some(&consistency(true)), &Plausibility::plausible());
        let without = QualityScorer.score(AccuracyLevel::Fair, None, &Plausibility::plausible());
        assert_eq!(with, without);
        assert_eq!(with, 75.0);
    }

    #[test]
    fn test_monotonic_in_accuracy() {
        let ordered = [
            AccuracyLevel::Excellent,
            AccuracyLevel::Good,
            AccuracyLevel::Fair,
            AccuracyLevel::Poor,
            AccuracyLevel::Invalid,
        ];
        for region in [None, Some(consistency(false))] {
            for plausibility in [Plausibility::plausible(), Plausibility::implausible("x")] {
                let scores: Vec<f64> = ordered
                    .iter()
                    .map(|&level| QualityScorer.score(level, region.as_ref(), &plausibility))
                    .collect();
                assert!(scores.windows(2).all(|w| w[1] <= w[0]), "{:?}", scores);
            }
        }
    }

    #[test]
    fn test_monotonic_in_region_and_plausibility() {
        for level in [AccuracyLevel::Excellent, AccuracyLevel::Unknown, AccuracyLevel::Invalid] {
            let ok = QualityScorer.score(level, Some(&consistency(true)), &Plausibility::plausible());
            let bad_region = QualityScorer.score(level, Some(&consistency(false)), &Plausibility::plausible());
            let bad_both = QualityScorer.score(level, Some(&consistency(false)), &Plausibility::implausible("x"));
            assert!(bad_region <= ok);
            assert!(bad_both <= bad_region);
        }
    }
}
