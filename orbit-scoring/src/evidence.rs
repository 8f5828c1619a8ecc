//! Evidence records and their mapping onto alpha/beta deltas.
//!
//! Every mapping is a pure function returning `Option<EvidenceDelta>`;
//! `None` means "no applicable evidence" and the caller must
//! short-circuit before any write — a zero-delta ledger entry is audit
//! pollution, not evidence.

use serde::{Deserialize, Serialize};

use orbit_core::config::ScoringConfig;

use crate::ledger::EvidenceDirection;

/// What kind of record a verification targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Issue,
    Solution,
    Claim,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Solution => "solution",
            Self::Claim => "claim",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "issue" => Some(Self::Issue),
            "solution" => Some(Self::Solution),
            "claim" => Some(Self::Claim),
            _ => None,
        }
    }
}

/// Outcome of verifying a single claim against sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Corroborated,
    Contested,
    PartiallySupported,
    Unverified,
    Pending,
}

impl VerificationStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Corroborated => "corroborated",
            Self::Contested => "contested",
            Self::PartiallySupported => "partially_supported",
            Self::Unverified => "unverified",
            Self::Pending => "pending",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "corroborated" => Some(Self::Corroborated),
            "contested" => Some(Self::Contested),
            "partially_supported" => Some(Self::PartiallySupported),
            "unverified" => Some(Self::Unverified),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// A completed claim verification, as recorded by the verification
/// pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    pub id: String,
    pub source_type: SourceKind,
    /// Id of the verified entity (an issue id when `source_type` is
    /// `Issue`).
    pub source_id: String,
    pub claim: String,
    pub status: VerificationStatus,
}

/// Lifecycle status of a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionStatus {
    Proposed,
    InProgress,
    Resolved,
    WontFix,
    Abandoned,
}

/// What kind of outcome was recorded against a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutcomeKind {
    StatusChange {
        new_status: SolutionStatus,
    },
    MetricMeasurement {
        metric_value: Option<f64>,
        target_value: Option<f64>,
    },
    Feedback {
        sentiment: f64,
    },
    VerificationResult {
        status: VerificationStatus,
    },
}

/// A recorded outcome for a proposed solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionOutcome {
    pub id: String,
    pub solution_id: String,
    /// Issue the solution addresses; outcomes without one are skipped.
    pub issue_id: Option<String>,
    pub outcome: OutcomeKind,
}

/// Result of a cross-claim consistency pass over an issue's
/// decomposed information units. `weighted_consistency` is supplied
/// by the analysis pass, weighted by claim falsifiability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyAnalysis {
    pub weighted_consistency: f64,
    pub contradictions: u32,
    pub total_comparisons: u32,
    pub total_units: u32,
}

impl ConsistencyAnalysis {
    /// Fraction of pairwise comparisons that contradicted; zero when
    /// nothing was compared.
    pub fn contradiction_rate(&self) -> f64 {
        if self.total_comparisons == 0 {
            0.0
        } else {
            f64::from(self.contradictions) / f64::from(self.total_comparisons)
        }
    }
}

/// One piece of applicable evidence, ready to apply to a BetaPair.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceDelta {
    pub alpha_delta: f64,
    pub beta_delta: f64,
    pub direction: EvidenceDirection,
    pub reason: String,
}

/// Truncate quoted text on a char boundary for ledger reasons. The
/// ellipsis marker counts toward `max_len`.
fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_len.saturating_sub(1)).collect();
    format!("{cut}…")
}

/// Map a verification result onto a P(real) delta.
///
/// Corroborated → alpha+1, contested → beta+1, partial → alpha+0.5;
/// unverified and pending carry no signal.
pub fn verification_delta(verification: &Verification, max_reason_len: usize) -> Option<EvidenceDelta> {
    let claim = truncate(&verification.claim, max_reason_len);
    match verification.status {
        VerificationStatus::Corroborated => Some(EvidenceDelta {
            alpha_delta: 1.0,
            beta_delta: 0.0,
            direction: EvidenceDirection::Positive,
            reason: format!("Claim corroborated: \"{claim}\""),
        }),
        VerificationStatus::Contested => Some(EvidenceDelta {
            alpha_delta: 0.0,
            beta_delta: 1.0,
            direction: EvidenceDirection::Negative,
            reason: format!("Claim contested: \"{claim}\""),
        }),
        VerificationStatus::PartiallySupported => Some(EvidenceDelta {
            alpha_delta: 0.5,
            beta_delta: 0.0,
            direction: EvidenceDirection::Positive,
            reason: format!("Claim partially supported: \"{claim}\""),
        }),
        VerificationStatus::Unverified | VerificationStatus::Pending => None,
    }
}

/// Map a solution outcome onto a P(solvable) delta.
pub fn outcome_delta(outcome: &OutcomeKind) -> Option<EvidenceDelta> {
    match outcome {
        OutcomeKind::StatusChange { new_status } => match new_status {
            SolutionStatus::Resolved => Some(EvidenceDelta {
                alpha_delta: 1.0,
                beta_delta: 0.0,
                direction: EvidenceDirection::Positive,
                reason: "Solution status changed to resolved".to_string(),
            }),
            SolutionStatus::WontFix => Some(EvidenceDelta {
                alpha_delta: 0.0,
                beta_delta: 0.5,
                direction: EvidenceDirection::Negative,
                reason: "Solution status changed to wont_fix".to_string(),
            }),
            _ => None,
        },
        OutcomeKind::MetricMeasurement {
            metric_value,
            target_value,
        } => {
            let (metric, target) = match (metric_value, target_value) {
                (Some(m), Some(t)) => (*m, *t),
                _ => return None,
            };
            if metric >= target {
                Some(EvidenceDelta {
                    alpha_delta: 1.0,
                    beta_delta: 0.0,
                    direction: EvidenceDirection::Positive,
                    reason: format!("Metric target achieved: {metric} >= {target}"),
                })
            } else {
                Some(EvidenceDelta {
                    alpha_delta: 0.0,
                    beta_delta: 1.0,
                    direction: EvidenceDirection::Negative,
                    reason: format!("Metric target missed: {metric} < {target}"),
                })
            }
        }
        OutcomeKind::Feedback { sentiment } => {
            if *sentiment > 0.3 {
                Some(EvidenceDelta {
                    alpha_delta: 0.3,
                    beta_delta: 0.0,
                    direction: EvidenceDirection::Positive,
                    reason: format!("Positive feedback (sentiment {sentiment:.2})"),
                })
            } else if *sentiment < -0.3 {
                Some(EvidenceDelta {
                    alpha_delta: 0.0,
                    beta_delta: 0.3,
                    direction: EvidenceDirection::Negative,
                    reason: format!("Negative feedback (sentiment {sentiment:.2})"),
                })
            } else {
                None
            }
        }
        OutcomeKind::VerificationResult { status } => match status {
            VerificationStatus::Corroborated => Some(EvidenceDelta {
                alpha_delta: 0.5,
                beta_delta: 0.0,
                direction: EvidenceDirection::Positive,
                reason: "Solution verification corroborated".to_string(),
            }),
            VerificationStatus::Contested => Some(EvidenceDelta {
                alpha_delta: 0.0,
                beta_delta: 0.5,
                direction: EvidenceDirection::Negative,
                reason: "Solution verification contested".to_string(),
            }),
            _ => None,
        },
    }
}

// Consistency regime thresholds.
const CONSISTENT_MIN: f64 = 0.7;
const CONSISTENT_MAX_CONTRADICTION: f64 = 0.2;
const INCONSISTENT_MAX: f64 = 0.4;
const INCONSISTENT_MIN_CONTRADICTION: f64 = 0.3;
const STRONG_SIGNAL_SCALE: f64 = 0.5;
const MIXED_SIGNAL_SCALE: f64 = 0.2;

/// Map a cross-claim consistency pass onto a P(real) delta.
///
/// Evidence strength is capped by unit count so one pass over a large
/// issue cannot dominate the posterior, and deltas below the noise
/// floor are dropped entirely to keep marginal signals out of the
/// ledger.
pub fn consistency_delta(
    analysis: &ConsistencyAnalysis,
    config: &ScoringConfig,
) -> Option<EvidenceDelta> {
    if analysis.total_units < config.min_consistency_units {
        return None;
    }

    let consistency = analysis.weighted_consistency;
    let rate = analysis.contradiction_rate();
    let strength =
        (f64::from(analysis.total_units) / f64::from(config.consistency_unit_cap)).min(1.0);

    let summary = format!(
        "Cross-claim consistency {:.0}% across {} units ({}/{} comparisons contradictory)",
        consistency * 100.0,
        analysis.total_units,
        analysis.contradictions,
        analysis.total_comparisons,
    );

    let (alpha_delta, beta_delta, direction) =
        if consistency >= CONSISTENT_MIN && rate < CONSISTENT_MAX_CONTRADICTION {
            let increment = STRONG_SIGNAL_SCALE * strength * (consistency - 0.5);
            (increment, 0.0, EvidenceDirection::Positive)
        } else if consistency < INCONSISTENT_MAX || rate > INCONSISTENT_MIN_CONTRADICTION {
            let decrement = STRONG_SIGNAL_SCALE * strength * (0.5 - consistency).max(rate);
            (0.0, decrement, EvidenceDirection::Negative)
        } else {
            let delta = MIXED_SIGNAL_SCALE * strength * (consistency - 0.5);
            if delta >= 0.0 {
                (delta, 0.0, EvidenceDirection::Positive)
            } else {
                (0.0, -delta, EvidenceDirection::Negative)
            }
        };

    if alpha_delta.abs() < config.noise_floor && beta_delta.abs() < config.noise_floor {
        return None;
    }

    Some(EvidenceDelta {
        alpha_delta,
        beta_delta,
        direction,
        reason: summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verification(status: VerificationStatus) -> Verification {
        Verification {
            id: "ver1".to_string(),
            source_type: SourceKind::Issue,
            source_id: "iss1".to_string(),
            claim: "hospital wait times doubled since 2020".to_string(),
            status,
        }
    }

    #[test]
    fn test_corroborated_adds_full_alpha() {
        let delta = verification_delta(&verification(VerificationStatus::Corroborated), 120).unwrap();
        assert_eq!(delta.alpha_delta, 1.0);
        assert_eq!(delta.beta_delta, 0.0);
        assert_eq!(delta.direction, EvidenceDirection::Positive);
        assert!(delta.reason.contains("hospital wait times"));
    }

    #[test]
    fn test_contested_adds_full_beta() {
        let delta = verification_delta(&verification(VerificationStatus::Contested), 120).unwrap();
        assert_eq!(delta.beta_delta, 1.0);
        assert_eq!(delta.direction, EvidenceDirection::Negative);
    }

    #[test]
    fn test_partial_support_is_half_strength() {
        let delta =
            verification_delta(&verification(VerificationStatus::PartiallySupported), 120).unwrap();
        assert_eq!(delta.alpha_delta, 0.5);
    }

    #[test]
    fn test_pending_and_unverified_carry_no_signal() {
        assert!(verification_delta(&verification(VerificationStatus::Pending), 120).is_none());
        assert!(verification_delta(&verification(VerificationStatus::Unverified), 120).is_none());
    }

    #[test]
    fn test_claim_truncated_in_reason() {
        let mut v = verification(VerificationStatus::Corroborated);
        v.claim = "x".repeat(500);
        let delta = verification_delta(&v, 120).unwrap();
        assert!(delta.reason.chars().count() < 200);
        assert!(delta.reason.contains('…'));
    }

    #[test]
    fn test_truncated_claim_stays_within_cap() {
        let long = truncate(&"x".repeat(500), 120);
        assert_eq!(long.chars().count(), 120);
        assert!(long.ends_with('…'));

        // At or under the cap, text passes through untouched.
        assert_eq!(truncate(&"x".repeat(120), 120), "x".repeat(120));
        assert_eq!(truncate("short", 120), "short");
    }

    #[test]
    fn test_resolved_status_change() {
        let delta = outcome_delta(&OutcomeKind::StatusChange {
            new_status: SolutionStatus::Resolved,
        })
        .unwrap();
        assert_eq!(delta.alpha_delta, 1.0);
    }

    #[test]
    fn test_wont_fix_is_half_negative() {
        let delta = outcome_delta(&OutcomeKind::StatusChange {
            new_status: SolutionStatus::WontFix,
        })
        .unwrap();
        assert_eq!(delta.beta_delta, 0.5);
        assert_eq!(delta.direction, EvidenceDirection::Negative);
    }

    #[test]
    fn test_other_status_changes_are_noise() {
        assert!(outcome_delta(&OutcomeKind::StatusChange {
            new_status: SolutionStatus::InProgress,
        })
        .is_none());
    }

    #[test]
    fn test_metric_missed_mentions_values() {
        let delta = outcome_delta(&OutcomeKind::MetricMeasurement {
            metric_value: Some(50.0),
            target_value: Some(100.0),
        })
        .unwrap();
        assert_eq!(delta.beta_delta, 1.0);
        assert!(delta.reason.contains("50 < 100"));
    }

    #[test]
    fn test_metric_achieved() {
        let delta = outcome_delta(&OutcomeKind::MetricMeasurement {
            metric_value: Some(120.0),
            target_value: Some(100.0),
        })
        .unwrap();
        assert_eq!(delta.alpha_delta, 1.0);
        assert_eq!(delta.direction, EvidenceDirection::Positive);
    }

    #[test]
    fn test_metric_missing_value_is_noop() {
        assert!(outcome_delta(&OutcomeKind::MetricMeasurement {
            metric_value: Some(50.0),
            target_value: None,
        })
        .is_none());
    }

    #[test]
    fn test_feedback_sentiment_bands() {
        assert!(outcome_delta(&OutcomeKind::Feedback { sentiment: 0.8 }).is_some());
        assert!(outcome_delta(&OutcomeKind::Feedback { sentiment: -0.8 }).is_some());
        assert!(outcome_delta(&OutcomeKind::Feedback { sentiment: 0.1 }).is_none());
        assert!(outcome_delta(&OutcomeKind::Feedback { sentiment: 0.3 }).is_none());
    }

    #[test]
    fn test_solution_verification_half_strength() {
        let delta = outcome_delta(&OutcomeKind::VerificationResult {
            status: VerificationStatus::Corroborated,
        })
        .unwrap();
        assert_eq!(delta.alpha_delta, 0.5);
        assert!(outcome_delta(&OutcomeKind::VerificationResult {
            status: VerificationStatus::Pending,
        })
        .is_none());
    }

    #[test]
    fn test_consistency_needs_three_units() {
        let config = ScoringConfig::default();
        let analysis = ConsistencyAnalysis {
            weighted_consistency: 0.9,
            contradictions: 0,
            total_comparisons: 1,
            total_units: 2,
        };
        assert!(consistency_delta(&analysis, &config).is_none());
    }

    #[test]
    fn test_consistency_positive_regime() {
        let config = ScoringConfig::default();
        let analysis = ConsistencyAnalysis {
            weighted_consistency: 0.75,
            contradictions: 1,
            total_comparisons: 10,
            total_units: 10,
        };
        let delta = consistency_delta(&analysis, &config).unwrap();
        // strength = 10/20 = 0.5; increment = 0.5 * 0.5 * 0.25 = 0.0625
        assert!((delta.alpha_delta - 0.0625).abs() < 1e-10);
        assert_eq!(delta.direction, EvidenceDirection::Positive);
        assert!(delta.reason.contains("75%"));
    }

    #[test]
    fn test_consistency_negative_regime() {
        let config = ScoringConfig::default();
        let analysis = ConsistencyAnalysis {
            weighted_consistency: 0.2,
            contradictions: 5,
            total_comparisons: 10,
            total_units: 20,
        };
        let delta = consistency_delta(&analysis, &config).unwrap();
        // strength = 1.0; decrement = 0.5 * max(0.3, 0.5) = 0.25
        assert!((delta.beta_delta - 0.25).abs() < 1e-10);
        assert_eq!(delta.direction, EvidenceDirection::Negative);
    }

    #[test]
    fn test_consistency_mixed_regime_below_noise_floor() {
        let config = ScoringConfig::default();
        let analysis = ConsistencyAnalysis {
            weighted_consistency: 0.55,
            contradictions: 2,
            total_comparisons: 10,
            total_units: 10,
        };
        // delta = 0.2 * 0.5 * 0.05 = 0.005 — under the 0.05 floor
        assert!(consistency_delta(&analysis, &config).is_none());
    }

    #[test]
    fn test_contradiction_rate_guards_zero_comparisons() {
        let analysis = ConsistencyAnalysis {
            weighted_consistency: 0.5,
            contradictions: 0,
            total_comparisons: 0,
            total_units: 5,
        };
        assert_eq!(analysis.contradiction_rate(), 0.0);
    }
}
