//! The scoring service — initialization from reference classes, the
//! three evidence entry points, and score explanation.
//!
//! Each external event (a verification completing, a solution outcome
//! being recorded, a consistency pass finishing) calls exactly one
//! `process_*` entry point. Every mutating path runs a
//! compare-and-swap loop keyed on the issue's stored version, so
//! concurrent evidence events retry instead of silently losing an
//! update. The score write and its ledger append are not atomic;
//! callers get at-least-once semantics.
//!
//! Not-found and not-applicable conditions are logged no-ops, not
//! errors. The core does not deduplicate evidence ids — at-most-once
//! dispatch per evidence event is a caller invariant.

use std::sync::Arc;

use tracing::{debug, info, warn};

use orbit_core::config::ScoringConfig;
use orbit_core::errors::{ScoringError, StorageError};
use orbit_core::time::now_unix;

use crate::evidence::{self, ConsistencyAnalysis, EvidenceDelta, SourceKind};
use crate::explain::ScoreExplanation;
use crate::ledger::{BayesianUpdate, EntityType, EvidenceDirection, EvidenceType, UpdateType};
use crate::reference;
use crate::store::{ScoreStore, WriteOutcome};
use crate::types::{BayesianScores, BetaPair, ExpectedValue, Issue, PointEstimate};

/// LLM-derived first-pass estimates for a newly discovered issue, all
/// in [0, 1]. Absent reach and cost fall back to configured defaults.
#[derive(Debug, Clone, Copy)]
pub struct InitialEstimates {
    pub legitimacy: f64,
    pub tractability: f64,
    pub impact: f64,
    pub reach: Option<f64>,
    pub cost: Option<f64>,
}

/// Whether an operation mutated state or was a logged no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Applied,
    Skipped,
}

/// Orchestrates all Bayesian score mutations and reads.
pub struct ScoringService {
    config: ScoringConfig,
    store: Arc<dyn ScoreStore>,
}

impl ScoringService {
    pub fn new(config: ScoringConfig, store: Arc<dyn ScoreStore>) -> Self {
        Self { config, store }
    }

    pub fn with_defaults(store: Arc<dyn ScoreStore>) -> Self {
        Self::new(ScoringConfig::default(), store)
    }

    /// Seed an issue's scores from the best-matching reference class,
    /// treating each estimate as ~0.5 pseudo-observations of evidence.
    ///
    /// Deliberately not idempotent: re-initializing overwrites the
    /// scores and appends two more ledger entries — an explicit user
    /// action, audited like any other.
    pub fn initialize(
        &self,
        issue_id: &str,
        domains: &[String],
        pattern_types: &[String],
        estimates: &InitialEstimates,
    ) -> Result<UpdateStatus, ScoringError> {
        validate_unit("legitimacy", estimates.legitimacy)?;
        validate_unit("tractability", estimates.tractability)?;
        validate_unit("impact", estimates.impact)?;
        if let Some(reach) = estimates.reach {
            validate_unit("reach", reach)?;
        }
        if let Some(cost) = estimates.cost {
            validate_unit("cost", cost)?;
        }

        let reach = estimates.reach.unwrap_or(self.config.default_reach);
        let cost = estimates.cost.unwrap_or(self.config.default_cost);
        let confidence = self.config.initial_estimate_confidence;

        for _attempt in 0..self.config.max_write_retries {
            let Some(issue) = self.store.find_issue(issue_id)? else {
                debug!(issue_id, "issue not found; skipping initialization");
                return Ok(UpdateStatus::Skipped);
            };

            let classes = self.store.all_reference_classes()?;
            let matched = reference::best_match(&classes, domains, pattern_types);
            let (prior_real, prior_solvable, class_id) = match matched {
                Some(class) => (class.p_real, class.p_solvable, Some(class.id.clone())),
                None => {
                    let fallback = BetaPair::new(
                        self.config.default_prior_alpha,
                        self.config.default_prior_beta,
                    );
                    (fallback, fallback, None)
                }
            };

            let p_real = self.seed_pair(prior_real, estimates.legitimacy);
            let p_solvable = self.seed_pair(prior_solvable, estimates.tractability);
            let now = now_unix();
            let scores = BayesianScores {
                p_real,
                p_solvable,
                impact: PointEstimate::new(estimates.impact, confidence),
                reach: PointEstimate::new(reach, confidence),
                cost: PointEstimate::new(cost, confidence),
                last_updated_at: now,
            };
            let expected_value = ExpectedValue::from_scores(&scores);

            match self.store.update_issue_scores(
                issue_id,
                &scores,
                &expected_value,
                class_id.as_deref(),
                issue.version,
            )? {
                WriteOutcome::Applied => {
                    let source = match class_id.as_deref() {
                        Some(id) => format!("reference class {id}"),
                        None => "universal prior".to_string(),
                    };
                    self.append_initial_entry(
                        issue_id,
                        UpdateType::PReal,
                        prior_real,
                        p_real,
                        estimates.legitimacy,
                        &format!(
                            "Initialized from {source} with legitimacy estimate {:.2}",
                            estimates.legitimacy
                        ),
                        now,
                    )?;
                    self.append_initial_entry(
                        issue_id,
                        UpdateType::PSolvable,
                        prior_solvable,
                        p_solvable,
                        estimates.tractability,
                        &format!(
                            "Initialized from {source} with tractability estimate {:.2}",
                            estimates.tractability
                        ),
                        now,
                    )?;
                    info!(
                        issue_id,
                        reference_class = class_id.as_deref().unwrap_or("none"),
                        p_real = p_real.mean(),
                        p_solvable = p_solvable.mean(),
                        "initialized issue scores"
                    );
                    return Ok(UpdateStatus::Applied);
                }
                WriteOutcome::Conflict => {
                    debug!(issue_id, "version conflict during initialization; retrying");
                }
            }
        }

        Err(ScoringError::WriteConflict {
            entity_id: issue_id.to_string(),
            attempts: self.config.max_write_retries,
        })
    }

    /// Fold a completed claim verification into the issue's P(real).
    pub fn process_verification(&self, verification_id: &str) -> Result<UpdateStatus, ScoringError> {
        let Some(verification) = self.store.find_verification(verification_id)? else {
            debug!(verification_id, "verification not found; nothing to do");
            return Ok(UpdateStatus::Skipped);
        };
        if verification.source_type != SourceKind::Issue {
            debug!(
                verification_id,
                source_type = ?verification.source_type,
                "verification does not target an issue; nothing to do"
            );
            return Ok(UpdateStatus::Skipped);
        }
        let Some(delta) =
            evidence::verification_delta(&verification, self.config.reason_max_len)
        else {
            debug!(verification_id, status = ?verification.status, "verification carries no signal");
            return Ok(UpdateStatus::Skipped);
        };

        self.apply_evidence(
            &verification.source_id,
            UpdateType::PReal,
            &delta,
            EvidenceType::Verification,
            Some(&verification.id),
            true,
        )
    }

    /// Fold a recorded solution outcome into the issue's P(solvable).
    pub fn process_solution_outcome(&self, outcome_id: &str) -> Result<UpdateStatus, ScoringError> {
        let Some(outcome) = self.store.find_outcome(outcome_id)? else {
            debug!(outcome_id, "outcome not found; nothing to do");
            return Ok(UpdateStatus::Skipped);
        };
        let Some(issue_id) = outcome.issue_id.clone() else {
            debug!(outcome_id, "outcome has no linked issue; nothing to do");
            return Ok(UpdateStatus::Skipped);
        };
        let Some(delta) = evidence::outcome_delta(&outcome.outcome) else {
            debug!(outcome_id, "outcome maps to no evidence change");
            return Ok(UpdateStatus::Skipped);
        };

        self.apply_evidence(
            &issue_id,
            UpdateType::PSolvable,
            &delta,
            EvidenceType::Outcome,
            Some(&outcome.id),
            true,
        )
    }

    /// Fold a cross-claim consistency pass into the issue's P(real).
    /// Consistency is treated as a verification-like evidence class.
    pub fn process_consistency(
        &self,
        issue_id: &str,
        analysis: &ConsistencyAnalysis,
    ) -> Result<UpdateStatus, ScoringError> {
        let Some(delta) = evidence::consistency_delta(analysis, &self.config) else {
            debug!(
                issue_id,
                total_units = analysis.total_units,
                "consistency pass below signal threshold; nothing to do"
            );
            return Ok(UpdateStatus::Skipped);
        };

        self.apply_evidence(
            issue_id,
            UpdateType::PReal,
            &delta,
            EvidenceType::Verification,
            None,
            false,
        )
    }

    /// Pure read: reconstruct a full explanation of the current score.
    /// Returns `None` when the issue is missing or has no scores.
    pub fn explain_score(&self, issue_id: &str) -> Result<Option<ScoreExplanation>, ScoringError> {
        let Some(issue) = self.store.find_issue(issue_id)? else {
            return Ok(None);
        };
        let Some(scores) = issue.scores.clone() else {
            return Ok(None);
        };
        let expected_value = issue
            .expected_value
            .clone()
            .unwrap_or_else(|| ExpectedValue::from_scores(&scores));
        let reference_class = match issue.reference_class_id.as_deref() {
            Some(class_id) => self.store.find_reference_class(class_id)?,
            None => None,
        };
        let recent = self.store.recent_for_entity(
            EntityType::Issue,
            issue_id,
            self.config.explain_ledger_limit,
        )?;

        Ok(Some(ScoreExplanation::build(
            &issue,
            &scores,
            &expected_value,
            reference_class.as_ref(),
            &recent,
        )))
    }

    /// Pull a pooled prior toward an estimate without letting one LLM
    /// call dominate a class built from many real observations.
    fn seed_pair(&self, prior: BetaPair, estimate: f64) -> BetaPair {
        let weight = self.config.estimate_weight;
        let alpha_delta = weight * (estimate - 0.5) * 2.0;
        let beta_delta = weight * (0.5 - estimate) * 2.0;
        let mut pair = prior;
        pair.apply(alpha_delta, beta_delta);
        pair
    }

    #[allow(clippy::too_many_arguments)]
    fn append_initial_entry(
        &self,
        issue_id: &str,
        update_type: UpdateType,
        prior: BetaPair,
        posterior: BetaPair,
        estimate: f64,
        reason: &str,
        now: i64,
    ) -> Result<(), ScoringError> {
        let direction = if estimate >= 0.5 {
            EvidenceDirection::Positive
        } else {
            EvidenceDirection::Negative
        };
        self.store.append(&BayesianUpdate {
            entity_type: EntityType::Issue,
            entity_id: issue_id.to_string(),
            update_type,
            prior_alpha: prior.alpha,
            prior_beta: prior.beta,
            posterior_alpha: posterior.alpha,
            posterior_beta: posterior.beta,
            evidence_type: EvidenceType::Initial,
            evidence_id: None,
            direction,
            reason: reason.to_string(),
            created_at: now,
        })?;
        Ok(())
    }

    /// Read-modify-write one probability on one issue, with CAS retry
    /// on version conflict, then ledger append and (optionally) the
    /// best-effort reference class nudge.
    fn apply_evidence(
        &self,
        issue_id: &str,
        target: UpdateType,
        delta: &EvidenceDelta,
        evidence_type: EvidenceType,
        evidence_id: Option<&str>,
        nudge_class: bool,
    ) -> Result<UpdateStatus, ScoringError> {
        for _attempt in 0..self.config.max_write_retries {
            let Some(issue) = self.store.find_issue(issue_id)? else {
                debug!(issue_id, "issue not found; skipping evidence");
                return Ok(UpdateStatus::Skipped);
            };
            let Some(mut scores) = issue.scores.clone() else {
                debug!(issue_id, "issue has no scores yet; skipping evidence");
                return Ok(UpdateStatus::Skipped);
            };

            let prior = match target {
                UpdateType::PReal => scores.p_real,
                UpdateType::PSolvable => scores.p_solvable,
            };
            let mut posterior = prior;
            posterior.apply(delta.alpha_delta, delta.beta_delta);
            match target {
                UpdateType::PReal => scores.p_real = posterior,
                UpdateType::PSolvable => scores.p_solvable = posterior,
            }

            let now = now_unix();
            scores.last_updated_at = now;
            let expected_value = ExpectedValue::from_scores(&scores);

            match self.store.update_issue_scores(
                issue_id,
                &scores,
                &expected_value,
                issue.reference_class_id.as_deref(),
                issue.version,
            )? {
                WriteOutcome::Applied => {
                    self.store.append(&BayesianUpdate {
                        entity_type: EntityType::Issue,
                        entity_id: issue_id.to_string(),
                        update_type: target,
                        prior_alpha: prior.alpha,
                        prior_beta: prior.beta,
                        posterior_alpha: posterior.alpha,
                        posterior_beta: posterior.beta,
                        evidence_type,
                        evidence_id: evidence_id.map(|s| s.to_string()),
                        direction: delta.direction,
                        reason: delta.reason.clone(),
                        created_at: now,
                    })?;
                    info!(
                        issue_id,
                        update = %target,
                        direction = %delta.direction,
                        posterior_mean = posterior.mean(),
                        "applied evidence update"
                    );
                    if nudge_class {
                        self.nudge_reference_class(
                            &issue,
                            target,
                            delta.direction,
                            evidence_type,
                            evidence_id,
                            now,
                        );
                    }
                    return Ok(UpdateStatus::Applied);
                }
                WriteOutcome::Conflict => {
                    debug!(issue_id, "version conflict applying evidence; retrying");
                }
            }
        }

        Err(ScoringError::WriteConflict {
            entity_id: issue_id.to_string(),
            attempts: self.config.max_write_retries,
        })
    }

    /// Nudge the issue's pooled prior +1 toward the observed side.
    /// Best-effort: the issue-level update already succeeded, so any
    /// failure here is logged and swallowed.
    fn nudge_reference_class(
        &self,
        issue: &Issue,
        target: UpdateType,
        direction: EvidenceDirection,
        evidence_type: EvidenceType,
        evidence_id: Option<&str>,
        now: i64,
    ) {
        let Some(class_id) = issue.reference_class_id.as_deref() else {
            return;
        };

        let result = (|| -> Result<(), StorageError> {
            let Some(mut class) = self.store.find_reference_class(class_id)? else {
                debug!(class_id, "reference class not found; skipping nudge");
                return Ok(());
            };
            let prior = match target {
                UpdateType::PReal => class.p_real,
                UpdateType::PSolvable => class.p_solvable,
            };
            class.nudge(target, direction);
            let posterior = match target {
                UpdateType::PReal => class.p_real,
                UpdateType::PSolvable => class.p_solvable,
            };
            self.store.update_reference_class(&class)?;
            self.store.append(&BayesianUpdate {
                entity_type: EntityType::ReferenceClass,
                entity_id: class_id.to_string(),
                update_type: target,
                prior_alpha: prior.alpha,
                prior_beta: prior.beta,
                posterior_alpha: posterior.alpha,
                posterior_beta: posterior.beta,
                evidence_type,
                evidence_id: evidence_id.map(|s| s.to_string()),
                direction,
                reason: format!("Pooled prior nudged by evidence on issue {}", issue.id),
                created_at: now,
            })?;
            Ok(())
        })();

        if let Err(error) = result {
            warn!(class_id, error = %error, "reference class nudge failed; continuing");
        }
    }
}

fn validate_unit(field: &'static str, value: f64) -> Result<(), ScoringError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ScoringError::InvalidEstimate { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryScoreStore;

    fn service() -> ScoringService {
        ScoringService::with_defaults(Arc::new(InMemoryScoreStore::new()))
    }

    #[test]
    fn test_seed_pair_pulls_toward_estimate() {
        let svc = service();
        let prior = BetaPair::new(2.0, 2.0);

        let high = svc.seed_pair(prior, 0.9);
        assert!((high.alpha - 2.4).abs() < 1e-10);
        assert!((high.beta - 1.6).abs() < 1e-10);

        let low = svc.seed_pair(prior, 0.2);
        assert!((low.alpha - 1.7).abs() < 1e-10);
        assert!((low.beta - 2.3).abs() < 1e-10);
    }

    #[test]
    fn test_seed_pair_floors_at_one() {
        let svc = service();
        let seeded = svc.seed_pair(BetaPair::new(1.0, 1.0), 1.0);
        assert!(seeded.beta >= 1.0);
    }

    #[test]
    fn test_validate_unit_rejects_out_of_range() {
        assert!(validate_unit("impact", 1.2).is_err());
        assert!(validate_unit("impact", -0.1).is_err());
        assert!(validate_unit("impact", f64::NAN).is_err());
        assert!(validate_unit("impact", 0.0).is_ok());
        assert!(validate_unit("impact", 1.0).is_ok());
    }

    #[test]
    fn test_initialize_missing_issue_is_noop() {
        let svc = service();
        let status = svc
            .initialize(
                "ghost",
                &[],
                &[],
                &InitialEstimates {
                    legitimacy: 0.5,
                    tractability: 0.5,
                    impact: 0.5,
                    reach: None,
                    cost: None,
                },
            )
            .unwrap();
        assert_eq!(status, UpdateStatus::Skipped);
    }
}
