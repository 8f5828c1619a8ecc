//! Persistence seams for the scoring service.
//!
//! The core treats storage as plain key-value CRUD: `find`/`update`
//! for issues and reference classes, `append`/`recent` for the
//! ledger. No transactionality is assumed across calls — a crash
//! between a score write and its ledger append yields at-least-once,
//! not exactly-once, semantics.
//!
//! `InMemoryScoreStore` backs unit and integration tests; the SQLite
//! implementation lives in `orbit-storage`.

use std::collections::HashMap;
use std::sync::Mutex;

use orbit_core::errors::StorageError;

use crate::evidence::{SolutionOutcome, Verification};
use crate::ledger::{BayesianUpdate, EntityType};
use crate::reference::ReferenceClass;
use crate::types::{BayesianScores, ExpectedValue, Issue};

/// Result of a versioned issue write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The row was written and its version incremented.
    Applied,
    /// The stored version no longer matched; nothing was written.
    Conflict,
}

/// Issue rows: lookup plus compare-and-swap score writes.
pub trait IssueStore: Send + Sync {
    fn insert_issue(&self, issue: &Issue) -> Result<(), StorageError>;

    fn find_issue(&self, id: &str) -> Result<Option<Issue>, StorageError>;

    /// Write scores + EV onto an issue iff its stored version still
    /// equals `expected_version`. On success the version increments.
    fn update_issue_scores(
        &self,
        id: &str,
        scores: &BayesianScores,
        expected_value: &ExpectedValue,
        reference_class_id: Option<&str>,
        expected_version: u64,
    ) -> Result<WriteOutcome, StorageError>;
}

/// Reference class rows. Classes are seeded, read, and nudged — never
/// deleted.
pub trait ReferenceClassStore: Send + Sync {
    fn insert_reference_class(&self, class: &ReferenceClass) -> Result<(), StorageError>;

    fn find_reference_class(&self, id: &str) -> Result<Option<ReferenceClass>, StorageError>;

    fn all_reference_classes(&self) -> Result<Vec<ReferenceClass>, StorageError>;

    fn update_reference_class(&self, class: &ReferenceClass) -> Result<(), StorageError>;
}

/// The append-only audit ledger.
pub trait UpdateLedger: Send + Sync {
    fn append(&self, update: &BayesianUpdate) -> Result<(), StorageError>;

    /// Most recent entries for an entity, newest first.
    fn recent_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        limit: usize,
    ) -> Result<Vec<BayesianUpdate>, StorageError>;

    fn count_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<u64, StorageError>;
}

/// Evidence event records the process_* entry points load.
pub trait EvidenceStore: Send + Sync {
    fn insert_verification(&self, verification: &Verification) -> Result<(), StorageError>;

    fn find_verification(&self, id: &str) -> Result<Option<Verification>, StorageError>;

    fn insert_outcome(&self, outcome: &SolutionOutcome) -> Result<(), StorageError>;

    fn find_outcome(&self, id: &str) -> Result<Option<SolutionOutcome>, StorageError>;
}

/// Everything the scoring service needs from persistence.
pub trait ScoreStore: IssueStore + ReferenceClassStore + UpdateLedger + EvidenceStore {}

impl<T: IssueStore + ReferenceClassStore + UpdateLedger + EvidenceStore> ScoreStore for T {}

#[derive(Default)]
struct InMemoryState {
    issues: HashMap<String, Issue>,
    reference_classes: HashMap<String, ReferenceClass>,
    ledger: Vec<BayesianUpdate>,
    verifications: HashMap<String, Verification>,
    outcomes: HashMap<String, SolutionOutcome>,
}

/// In-memory store for tests and single-run usage.
#[derive(Default)]
pub struct InMemoryScoreStore {
    state: Mutex<InMemoryState>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut InMemoryState) -> T,
    ) -> Result<T, StorageError> {
        let mut guard = self.state.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(f(&mut guard))
    }

    /// Total ledger entries across all entities.
    pub fn ledger_len(&self) -> usize {
        self.state.lock().map(|s| s.ledger.len()).unwrap_or(0)
    }
}

impl IssueStore for InMemoryScoreStore {
    fn insert_issue(&self, issue: &Issue) -> Result<(), StorageError> {
        self.with_state(|s| {
            s.issues.insert(issue.id.clone(), issue.clone());
        })
    }

    fn find_issue(&self, id: &str) -> Result<Option<Issue>, StorageError> {
        self.with_state(|s| s.issues.get(id).cloned())
    }

    fn update_issue_scores(
        &self,
        id: &str,
        scores: &BayesianScores,
        expected_value: &ExpectedValue,
        reference_class_id: Option<&str>,
        expected_version: u64,
    ) -> Result<WriteOutcome, StorageError> {
        self.with_state(|s| match s.issues.get_mut(id) {
            Some(issue) if issue.version == expected_version => {
                issue.scores = Some(scores.clone());
                issue.expected_value = Some(expected_value.clone());
                issue.reference_class_id = reference_class_id.map(|r| r.to_string());
                issue.version += 1;
                WriteOutcome::Applied
            }
            _ => WriteOutcome::Conflict,
        })
    }
}

impl ReferenceClassStore for InMemoryScoreStore {
    fn insert_reference_class(&self, class: &ReferenceClass) -> Result<(), StorageError> {
        self.with_state(|s| {
            s.reference_classes.insert(class.id.clone(), class.clone());
        })
    }

    fn find_reference_class(&self, id: &str) -> Result<Option<ReferenceClass>, StorageError> {
        self.with_state(|s| s.reference_classes.get(id).cloned())
    }

    fn all_reference_classes(&self) -> Result<Vec<ReferenceClass>, StorageError> {
        self.with_state(|s| {
            let mut classes: Vec<_> = s.reference_classes.values().cloned().collect();
            classes.sort_by(|a, b| a.id.cmp(&b.id));
            classes
        })
    }

    fn update_reference_class(&self, class: &ReferenceClass) -> Result<(), StorageError> {
        self.with_state(|s| {
            s.reference_classes.insert(class.id.clone(), class.clone());
        })
    }
}

impl UpdateLedger for InMemoryScoreStore {
    fn append(&self, update: &BayesianUpdate) -> Result<(), StorageError> {
        self.with_state(|s| s.ledger.push(update.clone()))
    }

    fn recent_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        limit: usize,
    ) -> Result<Vec<BayesianUpdate>, StorageError> {
        self.with_state(|s| {
            s.ledger
                .iter()
                .rev()
                .filter(|u| u.entity_type == entity_type && u.entity_id == entity_id)
                .take(limit)
                .cloned()
                .collect()
        })
    }

    fn count_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<u64, StorageError> {
        self.with_state(|s| {
            s.ledger
                .iter()
                .filter(|u| u.entity_type == entity_type && u.entity_id == entity_id)
                .count() as u64
        })
    }
}

impl EvidenceStore for InMemoryScoreStore {
    fn insert_verification(&self, verification: &Verification) -> Result<(), StorageError> {
        self.with_state(|s| {
            s.verifications
                .insert(verification.id.clone(), verification.clone());
        })
    }

    fn find_verification(&self, id: &str) -> Result<Option<Verification>, StorageError> {
        self.with_state(|s| s.verifications.get(id).cloned())
    }

    fn insert_outcome(&self, outcome: &SolutionOutcome) -> Result<(), StorageError> {
        self.with_state(|s| {
            s.outcomes.insert(outcome.id.clone(), outcome.clone());
        })
    }

    fn find_outcome(&self, id: &str) -> Result<Option<SolutionOutcome>, StorageError> {
        self.with_state(|s| s.outcomes.get(id).cloned())
    }
}
