//! Beta distribution math via the `statrs` crate.
//!
//! Posterior mean, evidence-derived confidence, credible intervals,
//! and the geometric mean used for composite EV confidence.

use statrs::distribution::{Beta, ContinuousCDF};

use orbit_core::constants::BETA_FLOOR;

/// Posterior mean: alpha / (alpha + beta). Guards against division by
/// zero and non-finite parameters.
pub fn posterior_mean(alpha: f64, beta: f64) -> f64 {
    let sum = alpha + beta;
    if sum <= 0.0 || !sum.is_finite() {
        return 0.5;
    }
    let mean = alpha / sum;
    if !mean.is_finite() {
        0.5
    } else {
        mean.clamp(0.0, 1.0)
    }
}

/// Confidence from effective sample size: 1 − 1/max(1, alpha+beta−1).
///
/// A fresh Beta(1,1) has confidence 0; confidence approaches 1 as
/// pseudo-observations accumulate.
pub fn pair_confidence(alpha: f64, beta: f64) -> f64 {
    let effective = (alpha + beta - 1.0).max(1.0);
    (1.0 - 1.0 / effective).clamp(0.0, 1.0)
}

/// Floor a Beta parameter at the Beta(1,1) lower bound.
pub fn floor_param(value: f64) -> f64 {
    if value.is_finite() {
        value.max(BETA_FLOOR)
    } else {
        BETA_FLOOR
    }
}

/// Compute the credible interval for a Beta distribution.
///
/// Uses the inverse CDF to find the interval containing `level`
/// probability mass. Returns (low, high); guards against invalid and
/// extreme parameters.
pub fn credible_interval(alpha: f64, beta_param: f64, level: f64) -> (f64, f64) {
    if alpha <= 0.0 || beta_param <= 0.0 || !alpha.is_finite() || !beta_param.is_finite() {
        return (0.0, 1.0);
    }

    // Extreme parameters cause numerical issues in the inverse CDF;
    // the interval is vanishingly narrow around the mean anyway.
    if alpha > 1e6 || beta_param > 1e6 {
        let mean = alpha / (alpha + beta_param);
        let epsilon = 1e-6;
        return ((mean - epsilon).max(0.0), (mean + epsilon).min(1.0));
    }

    let tail = (1.0 - level) / 2.0;

    match Beta::new(alpha, beta_param) {
        Ok(dist) => {
            let low = dist.inverse_cdf(tail);
            let high = dist.inverse_cdf(1.0 - tail);

            let low = if low.is_finite() { low.clamp(0.0, 1.0) } else { 0.0 };
            let high = if high.is_finite() { high.clamp(0.0, 1.0) } else { 1.0 };

            (low, high)
        }
        Err(_) => (0.0, 1.0),
    }
}

/// Geometric mean of confidence values in [0, 1].
///
/// Any zero input drives the result to zero — a score with one
/// completely unknown component has no composite confidence.
pub fn geometric_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut product = 1.0_f64;
    for v in values {
        let v = v.clamp(0.0, 1.0);
        if v == 0.0 {
            return 0.0;
        }
        product *= v;
    }
    product.powf(1.0 / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_prior_mean() {
        assert!((posterior_mean(1.0, 1.0) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_posterior_mean_with_evidence() {
        assert!((posterior_mean(9.0, 3.0) - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_pair_confidence_grows_with_evidence() {
        let fresh = pair_confidence(1.0, 1.0);
        let seeded = pair_confidence(2.0, 2.0);
        let seasoned = pair_confidence(20.0, 10.0);
        assert_eq!(fresh, 0.0);
        assert!(seeded > fresh);
        assert!(seasoned > seeded);
        assert!(seasoned < 1.0);
    }

    #[test]
    fn test_floor_param() {
        assert_eq!(floor_param(0.2), 1.0);
        assert_eq!(floor_param(3.5), 3.5);
        assert_eq!(floor_param(f64::NAN), 1.0);
    }

    #[test]
    fn test_credible_interval_narrows_with_evidence() {
        let (low1, high1) = credible_interval(2.0, 2.0, 0.95);
        let (low2, high2) = credible_interval(20.0, 20.0, 0.95);
        assert!(high2 - low2 < high1 - low1);
    }

    #[test]
    fn test_credible_interval_invalid_params() {
        assert_eq!(credible_interval(0.0, 0.0, 0.95), (0.0, 1.0));
    }

    #[test]
    fn test_credible_interval_extreme_values() {
        let (low, high) = credible_interval(1e7, 1.0, 0.95);
        assert!(low.is_finite());
        assert!(high.is_finite());
        assert!(low <= high);
    }

    #[test]
    fn test_geometric_mean_uniform() {
        assert!((geometric_mean(&[0.5, 0.5, 0.5]) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_geometric_mean_zero_component() {
        assert_eq!(geometric_mean(&[0.9, 0.0, 0.8]), 0.0);
    }

    #[test]
    fn test_geometric_mean_empty() {
        assert_eq!(geometric_mean(&[]), 0.0);
    }
}
