//! Score explanation — a pure-read report reconstructing why an
//! issue's Expected Value is what it is.

use std::fmt;

use serde::Serialize;

use crate::ledger::{BayesianUpdate, EvidenceDirection, EvidenceType, UpdateType};
use crate::reference::ReferenceClass;
use crate::types::{BayesianScores, BetaPair, ExpectedValue, Issue, PointEstimate};

/// One probability's current state, with derived quantities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityReport {
    pub mean: f64,
    pub alpha: f64,
    pub beta: f64,
    /// Pseudo-observations beyond the universal prior.
    pub sample_size: f64,
    pub credible_interval: (f64, f64),
}

impl ProbabilityReport {
    fn from_pair(pair: &BetaPair) -> Self {
        Self {
            mean: pair.mean(),
            alpha: pair.alpha,
            beta: pair.beta,
            sample_size: pair.sample_size(),
            credible_interval: pair.credible_interval(),
        }
    }
}

/// The matched reference class's pooled base rates, for comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceBaseRates {
    pub id: String,
    pub name: String,
    pub p_real_mean: f64,
    pub p_solvable_mean: f64,
    pub observation_count: u64,
}

/// One recent ledger entry, summarized for the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateSummary {
    pub created_at: i64,
    pub update_type: UpdateType,
    pub evidence_type: EvidenceType,
    pub direction: EvidenceDirection,
    pub reason: String,
    pub mean_delta: f64,
}

/// The literal arithmetic behind the stored Expected Value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormulaTrace {
    pub p_real_mean: f64,
    pub p_solvable_mean: f64,
    pub impact: f64,
    pub reach: f64,
    pub cost: f64,
    pub expected_value: f64,
    pub ev_confidence: f64,
}

impl fmt::Display for FormulaTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EV = {:.3} * {:.3} * {:.3} * {:.3} - {:.3} = {:.3} (confidence {:.3})",
            self.p_real_mean,
            self.p_solvable_mean,
            self.impact,
            self.reach,
            self.cost,
            self.expected_value,
            self.ev_confidence,
        )
    }
}

/// Full structured explanation of an issue's current score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreExplanation {
    pub issue_id: String,
    pub title: String,
    pub p_real: ProbabilityReport,
    pub p_solvable: ProbabilityReport,
    pub impact: PointEstimate,
    pub reach: PointEstimate,
    pub cost: PointEstimate,
    pub reference_class: Option<ReferenceBaseRates>,
    /// Most recent ledger entries for this issue, newest first.
    pub recent_updates: Vec<UpdateSummary>,
    pub formula: FormulaTrace,
}

impl ScoreExplanation {
    pub(crate) fn build(
        issue: &Issue,
        scores: &BayesianScores,
        expected_value: &ExpectedValue,
        reference_class: Option<&ReferenceClass>,
        recent: &[BayesianUpdate],
    ) -> Self {
        Self {
            issue_id: issue.id.clone(),
            title: issue.title.clone(),
            p_real: ProbabilityReport::from_pair(&scores.p_real),
            p_solvable: ProbabilityReport::from_pair(&scores.p_solvable),
            impact: scores.impact.clone(),
            reach: scores.reach.clone(),
            cost: scores.cost.clone(),
            reference_class: reference_class.map(|c| ReferenceBaseRates {
                id: c.id.clone(),
                name: c.name.clone(),
                p_real_mean: c.p_real.mean(),
                p_solvable_mean: c.p_solvable.mean(),
                observation_count: c.observation_count,
            }),
            recent_updates: recent
                .iter()
                .map(|u| UpdateSummary {
                    created_at: u.created_at,
                    update_type: u.update_type,
                    evidence_type: u.evidence_type,
                    direction: u.direction,
                    reason: u.reason.clone(),
                    mean_delta: u.mean_delta(),
                })
                .collect(),
            formula: FormulaTrace {
                p_real_mean: scores.p_real.mean(),
                p_solvable_mean: scores.p_solvable.mean(),
                impact: scores.impact.estimate,
                reach: scores.reach.estimate,
                cost: scores.cost.estimate,
                expected_value: expected_value.expected_value,
                ev_confidence: expected_value.ev_confidence,
            },
        }
    }
}

impl fmt::Display for ScoreExplanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score explanation for issue {} ({})", self.issue_id, self.title)?;
        writeln!(
            f,
            "  P(real)     = {:.3}  Beta({:.2}, {:.2}), {:.1} observations, 95% CI [{:.2}, {:.2}]",
            self.p_real.mean,
            self.p_real.alpha,
            self.p_real.beta,
            self.p_real.sample_size,
            self.p_real.credible_interval.0,
            self.p_real.credible_interval.1,
        )?;
        writeln!(
            f,
            "  P(solvable) = {:.3}  Beta({:.2}, {:.2}), {:.1} observations, 95% CI [{:.2}, {:.2}]",
            self.p_solvable.mean,
            self.p_solvable.alpha,
            self.p_solvable.beta,
            self.p_solvable.sample_size,
            self.p_solvable.credible_interval.0,
            self.p_solvable.credible_interval.1,
        )?;
        writeln!(
            f,
            "  impact {:.2} (conf {:.2}), reach {:.2} (conf {:.2}), cost {:.2} (conf {:.2})",
            self.impact.estimate,
            self.impact.confidence,
            self.reach.estimate,
            self.reach.confidence,
            self.cost.estimate,
            self.cost.confidence,
        )?;
        match &self.reference_class {
            Some(rc) => writeln!(
                f,
                "  reference class {} ({}): base P(real) {:.3}, base P(solvable) {:.3}, {} observations",
                rc.id, rc.name, rc.p_real_mean, rc.p_solvable_mean, rc.observation_count,
            )?,
            None => writeln!(f, "  no reference class matched; universal prior")?,
        }
        writeln!(f, "  {}", self.formula)?;
        if self.recent_updates.is_empty() {
            writeln!(f, "  no recorded updates")?;
        } else {
            writeln!(f, "  recent updates (newest first):")?;
            for u in &self.recent_updates {
                writeln!(
                    f,
                    "    [t={}] {} {} via {} (mean {:+.4}): {}",
                    u.created_at,
                    u.update_type,
                    u.direction,
                    u.evidence_type,
                    u.mean_delta,
                    u.reason,
                )?;
            }
        }
        Ok(())
    }
}
