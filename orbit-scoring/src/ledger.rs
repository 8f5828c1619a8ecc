//! Update ledger types — the immutable audit trail of every
//! prior→posterior transition.
//!
//! Entries are created, never mutated or deleted. One logical
//! evidence event may produce more than one entry (initialization
//! writes one per probability; a verification writes an issue entry
//! plus a best-effort reference-class entry).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::beta;

/// Which kind of entity an update targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Issue,
    ReferenceClass,
}

impl EntityType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::ReferenceClass => "reference_class",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "issue" => Some(Self::Issue),
            "reference_class" => Some(Self::ReferenceClass),
            _ => None,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which probability an update targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    PReal,
    PSolvable,
}

impl UpdateType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PReal => "p_real",
            Self::PSolvable => "p_solvable",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "p_real" => Some(Self::PReal),
            "p_solvable" => Some(Self::PSolvable),
            _ => None,
        }
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Evidence class that produced an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceType {
    Verification,
    Outcome,
    Manual,
    Initial,
}

impl EvidenceType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Verification => "verification",
            Self::Outcome => "outcome",
            Self::Manual => "manual",
            Self::Initial => "initial",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "verification" => Some(Self::Verification),
            "outcome" => Some(Self::Outcome),
            "manual" => Some(Self::Manual),
            "initial" => Some(Self::Initial),
            _ => None,
        }
    }
}

impl fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction an update pushed the probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceDirection {
    Positive,
    Negative,
}

impl EvidenceDirection {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for EvidenceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One immutable audit record of a prior→posterior transition.
///
/// The row id is storage-assigned on append. `evidence_id` is
/// recorded so replayed evidence can be detected from the trail, even
/// though the core itself does not deduplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesianUpdate {
    pub entity_type: EntityType,
    pub entity_id: String,
    pub update_type: UpdateType,
    pub prior_alpha: f64,
    pub prior_beta: f64,
    pub posterior_alpha: f64,
    pub posterior_beta: f64,
    pub evidence_type: EvidenceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_id: Option<String>,
    pub direction: EvidenceDirection,
    /// Human-readable justification for the transition.
    pub reason: String,
    /// Unix seconds.
    pub created_at: i64,
}

impl BayesianUpdate {
    /// Change in posterior mean this update caused.
    pub fn mean_delta(&self) -> f64 {
        beta::posterior_mean(self.posterior_alpha, self.posterior_beta)
            - beta::posterior_mean(self.prior_alpha, self.prior_beta)
    }
}
