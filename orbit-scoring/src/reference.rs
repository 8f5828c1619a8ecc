//! Reference classes — pooled priors shared by issues with similar
//! domains and pattern types.
//!
//! Classes seed new issues' priors and are nudged +1 toward whichever
//! side any matched issue observes. They are never deleted and
//! accumulate monotonically.

use serde::{Deserialize, Serialize};

use crate::ledger::{EvidenceDirection, UpdateType};
use crate::types::BetaPair;

/// A pooled prior keyed by domains and pattern types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceClass {
    pub id: String,
    pub name: String,
    pub domains: Vec<String>,
    pub pattern_types: Vec<String>,
    pub p_real: BetaPair,
    pub p_solvable: BetaPair,
    /// Total evidence events that have nudged this class.
    pub observation_count: u64,
}

impl ReferenceClass {
    /// Overlap between this class and an issue's domains/pattern
    /// types — the matching score.
    pub fn overlap(&self, domains: &[String], pattern_types: &[String]) -> usize {
        let domain_hits = self
            .domains
            .iter()
            .filter(|d| domains.iter().any(|x| x == *d))
            .count();
        let pattern_hits = self
            .pattern_types
            .iter()
            .filter(|p| pattern_types.iter().any(|x| x == *p))
            .count();
        domain_hits + pattern_hits
    }

    /// Nudge the pooled prior +1 toward the observed side.
    pub fn nudge(&mut self, target: UpdateType, direction: EvidenceDirection) {
        let pair = match target {
            UpdateType::PReal => &mut self.p_real,
            UpdateType::PSolvable => &mut self.p_solvable,
        };
        match direction {
            EvidenceDirection::Positive => pair.apply(1.0, 0.0),
            EvidenceDirection::Negative => pair.apply(0.0, 1.0),
        }
        self.observation_count += 1;
    }
}

/// Best-matching class for an issue: highest overlap count, ties
/// broken by larger observation pool, then by id for determinism.
/// Zero overlap never matches.
pub fn best_match<'a>(
    classes: &'a [ReferenceClass],
    domains: &[String],
    pattern_types: &[String],
) -> Option<&'a ReferenceClass> {
    classes
        .iter()
        .map(|c| (c.overlap(domains, pattern_types), c))
        .filter(|(overlap, _)| *overlap > 0)
        .max_by(|(oa, a), (ob, b)| {
            oa.cmp(ob)
                .then(a.observation_count.cmp(&b.observation_count))
                .then(b.id.cmp(&a.id))
        })
        .map(|(_, c)| c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(id: &str, domains: &[&str], patterns: &[&str], observations: u64) -> ReferenceClass {
        ReferenceClass {
            id: id.to_string(),
            name: id.to_string(),
            domains: domains.iter().map(|s| s.to_string()).collect(),
            pattern_types: patterns.iter().map(|s| s.to_string()).collect(),
            p_real: BetaPair::new(5.0, 3.0),
            p_solvable: BetaPair::new(4.0, 4.0),
            observation_count: observations,
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_best_match_prefers_higher_overlap() {
        let classes = vec![
            class("health", &["health"], &[], 10),
            class("health-access", &["health"], &["access_gap"], 10),
        ];
        let matched = best_match(&classes, &strings(&["health"]), &strings(&["access_gap"]));
        assert_eq!(matched.unwrap().id, "health-access");
    }

    #[test]
    fn test_zero_overlap_never_matches() {
        let classes = vec![class("transit", &["transit"], &[], 10)];
        assert!(best_match(&classes, &strings(&["health"]), &[]).is_none());
    }

    #[test]
    fn test_tie_broken_by_observation_count() {
        let classes = vec![
            class("sparse", &["health"], &[], 2),
            class("seasoned", &["health"], &[], 50),
        ];
        let matched = best_match(&classes, &strings(&["health"]), &[]);
        assert_eq!(matched.unwrap().id, "seasoned");
    }

    #[test]
    fn test_nudge_positive_increments_alpha() {
        let mut c = class("health", &["health"], &[], 0);
        c.nudge(UpdateType::PReal, EvidenceDirection::Positive);
        assert_eq!(c.p_real.alpha, 6.0);
        assert_eq!(c.p_real.beta, 3.0);
        assert_eq!(c.observation_count, 1);
    }

    #[test]
    fn test_nudge_negative_increments_beta() {
        let mut c = class("health", &["health"], &[], 0);
        c.nudge(UpdateType::PSolvable, EvidenceDirection::Negative);
        assert_eq!(c.p_solvable.beta, 5.0);
    }
}
