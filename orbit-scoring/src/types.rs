//! Probability state embedded on each issue, and the derived
//! Expected Value.

use serde::{Deserialize, Serialize};

use orbit_core::constants::{CREDIBLE_INTERVAL_LEVEL, PRIOR_PSEUDO_OBSERVATIONS};

use crate::beta;

/// A Beta distribution pair tracking belief in one binary property.
///
/// Invariant: `alpha >= 1` and `beta >= 1` — evidence can never drive
/// a parameter below the uniform Beta(1,1) floor. The mean is always
/// derived from the pair, never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaPair {
    pub alpha: f64,
    pub beta: f64,
}

impl BetaPair {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self {
            alpha: beta::floor_param(alpha),
            beta: beta::floor_param(beta),
        }
    }

    /// Posterior mean: alpha / (alpha + beta).
    pub fn mean(&self) -> f64 {
        beta::posterior_mean(self.alpha, self.beta)
    }

    /// Confidence derived from effective sample size.
    pub fn confidence(&self) -> f64 {
        beta::pair_confidence(self.alpha, self.beta)
    }

    /// Pseudo-observations accumulated beyond the universal Beta(2,2)
    /// prior, clamped at zero.
    pub fn sample_size(&self) -> f64 {
        (self.alpha + self.beta - PRIOR_PSEUDO_OBSERVATIONS).max(0.0)
    }

    /// 95% credible interval (low, high).
    pub fn credible_interval(&self) -> (f64, f64) {
        beta::credible_interval(self.alpha, self.beta, CREDIBLE_INTERVAL_LEVEL)
    }

    /// Apply evidence deltas, flooring both parameters at 1.
    pub fn apply(&mut self, alpha_delta: f64, beta_delta: f64) {
        self.alpha = beta::floor_param(self.alpha + alpha_delta);
        self.beta = beta::floor_param(self.beta + beta_delta);
    }
}

/// A point estimate with confidence — impact, reach, and cost do not
/// accumulate alpha/beta evidence in this version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEstimate {
    /// Estimate in [0, 1].
    pub estimate: f64,
    /// Confidence in the estimate, in [0, 1].
    pub confidence: f64,
    /// Optional unit label (e.g. "people", "usd").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl PointEstimate {
    pub fn new(estimate: f64, confidence: f64) -> Self {
        Self {
            estimate: estimate.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.0, 1.0),
            unit: None,
        }
    }
}

/// Full Bayesian score state for one issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesianScores {
    /// Belief that the issue reflects a real underlying phenomenon.
    pub p_real: BetaPair,
    /// Belief that an intervention could resolve it.
    pub p_solvable: BetaPair,
    pub impact: PointEstimate,
    pub reach: PointEstimate,
    pub cost: PointEstimate,
    /// Unix seconds of the most recent mutation.
    pub last_updated_at: i64,
}

/// Derived composite score, stored denormalized on the issue.
///
/// Invariant: always consistent with the issue's current
/// `BayesianScores` — every score mutation recomputes this before
/// persisting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedValue {
    /// clamp(pReal × pSolvable × impact × reach − cost, −1, 1).
    pub expected_value: f64,
    /// Geometric mean of the five component confidences.
    pub ev_confidence: f64,
}

impl ExpectedValue {
    /// Recompute the composite from current score state.
    pub fn from_scores(scores: &BayesianScores) -> Self {
        let raw = scores.p_real.mean()
            * scores.p_solvable.mean()
            * scores.impact.estimate
            * scores.reach.estimate
            - scores.cost.estimate;

        let ev_confidence = beta::geometric_mean(&[
            scores.p_real.confidence(),
            scores.p_solvable.confidence(),
            scores.impact.confidence,
            scores.reach.confidence,
            scores.cost.confidence,
        ]);

        Self {
            expected_value: raw.clamp(-1.0, 1.0),
            ev_confidence,
        }
    }
}

/// Domain view of an issue, as the scoring core sees it.
///
/// `version` backs the compare-and-swap write path: concurrent
/// evidence events targeting the same issue retry instead of silently
/// losing an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub domains: Vec<String>,
    pub pattern_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_class_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<BayesianScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<ExpectedValue>,
    pub version: u64,
}

impl Issue {
    /// A bare issue with no scores yet.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            domains: Vec::new(),
            pattern_types: Vec::new(),
            reference_class_id: None,
            scores: None,
            expected_value: None,
            version: 0,
        }
    }
}
