//! Property tests for the probability invariants: parameters never
//! fall below the Beta(1,1) floor, derived quantities stay in range.

use proptest::prelude::*;

use orbit_core::config::ScoringConfig;
use orbit_scoring::evidence::{consistency_delta, ConsistencyAnalysis};
use orbit_scoring::types::{BayesianScores, BetaPair, ExpectedValue, PointEstimate};

fn delta() -> impl Strategy<Value = f64> {
    -10.0..10.0f64
}

fn param() -> impl Strategy<Value = f64> {
    1.0..100.0f64
}

fn unit() -> impl Strategy<Value = f64> {
    0.0..=1.0f64
}

proptest! {
    #[test]
    fn pair_never_falls_below_floor(
        alpha in param(),
        beta in param(),
        deltas in prop::collection::vec((delta(), delta()), 0..50),
    ) {
        let mut pair = BetaPair::new(alpha, beta);
        for (da, db) in deltas {
            pair.apply(da, db);
            prop_assert!(pair.alpha >= 1.0);
            prop_assert!(pair.beta >= 1.0);
        }
    }

    #[test]
    fn pair_mean_and_confidence_in_range(alpha in param(), beta in param()) {
        let pair = BetaPair::new(alpha, beta);
        prop_assert!(pair.mean() > 0.0 && pair.mean() < 1.0);
        prop_assert!((0.0..1.0).contains(&pair.confidence()));
        prop_assert!((pair.mean() - alpha / (alpha + beta)).abs() < 1e-12);
    }

    #[test]
    fn credible_interval_brackets_the_mean(alpha in param(), beta in param()) {
        let pair = BetaPair::new(alpha, beta);
        let (low, high) = pair.credible_interval();
        prop_assert!(low <= high);
        prop_assert!(low <= pair.mean() && pair.mean() <= high);
        prop_assert!((0.0..=1.0).contains(&low));
        prop_assert!((0.0..=1.0).contains(&high));
    }

    #[test]
    fn expected_value_stays_in_range(
        pra in param(), prb in param(),
        psa in param(), psb in param(),
        impact in unit(), reach in unit(), cost in unit(),
        conf in unit(),
    ) {
        let scores = BayesianScores {
            p_real: BetaPair::new(pra, prb),
            p_solvable: BetaPair::new(psa, psb),
            impact: PointEstimate::new(impact, conf),
            reach: PointEstimate::new(reach, conf),
            cost: PointEstimate::new(cost, conf),
            last_updated_at: 0,
        };
        let ev = ExpectedValue::from_scores(&scores);
        prop_assert!((-1.0..=1.0).contains(&ev.expected_value));
        prop_assert!((0.0..=1.0).contains(&ev.ev_confidence));
    }

    #[test]
    fn consistency_delta_respects_floor_and_sides(
        consistency in unit(),
        contradictions in 0u32..30,
        comparisons in 1u32..30,
        units in 0u32..60,
    ) {
        let config = ScoringConfig::default();
        let analysis = ConsistencyAnalysis {
            weighted_consistency: consistency,
            contradictions: contradictions.min(comparisons),
            total_comparisons: comparisons,
            total_units: units,
        };
        if let Some(d) = consistency_delta(&analysis, &config) {
            // One-sided, above the noise floor, and never from a
            // pass below the unit minimum.
            prop_assert!(units >= config.min_consistency_units);
            prop_assert!(d.alpha_delta >= 0.0 && d.beta_delta >= 0.0);
            prop_assert!(d.alpha_delta == 0.0 || d.beta_delta == 0.0);
            prop_assert!(d.alpha_delta.max(d.beta_delta) >= config.noise_floor);
        }
    }
}
