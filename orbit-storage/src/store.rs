//! `SqliteScoreStore` — the production implementation of the scoring
//! store traits, delegating each trait method to a query module
//! through the serialized connection.

use std::path::Path;

use orbit_core::errors::StorageError;

use orbit_scoring::evidence::{SolutionOutcome, Verification};
use orbit_scoring::ledger::{BayesianUpdate, EntityType};
use orbit_scoring::reference::ReferenceClass;
use orbit_scoring::store::{
    EvidenceStore, IssueStore, ReferenceClassStore, UpdateLedger, WriteOutcome,
};
use orbit_scoring::types::{BayesianScores, ExpectedValue, Issue};

use crate::connection::Database;
use crate::queries;

/// SQLite-backed score store.
pub struct SqliteScoreStore {
    db: Database,
}

impl SqliteScoreStore {
    /// Open (or create) the database file and run migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            db: Database::open(path)?,
        })
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            db: Database::open_in_memory()?,
        })
    }
}

impl IssueStore for SqliteScoreStore {
    fn insert_issue(&self, issue: &Issue) -> Result<(), StorageError> {
        self.db
            .with_conn(|conn| queries::issues::insert_issue(conn, issue))
    }

    fn find_issue(&self, id: &str) -> Result<Option<Issue>, StorageError> {
        self.db.with_conn(|conn| queries::issues::find_issue(conn, id))
    }

    fn update_issue_scores(
        &self,
        id: &str,
        scores: &BayesianScores,
        expected_value: &ExpectedValue,
        reference_class_id: Option<&str>,
        expected_version: u64,
    ) -> Result<WriteOutcome, StorageError> {
        self.db.with_conn(|conn| {
            queries::issues::update_issue_scores(
                conn,
                id,
                scores,
                expected_value,
                reference_class_id,
                expected_version,
            )
        })
    }
}

impl ReferenceClassStore for SqliteScoreStore {
    fn insert_reference_class(&self, class: &ReferenceClass) -> Result<(), StorageError> {
        self.db
            .with_conn(|conn| queries::reference_classes::insert_reference_class(conn, class))
    }

    fn find_reference_class(&self, id: &str) -> Result<Option<ReferenceClass>, StorageError> {
        self.db
            .with_conn(|conn| queries::reference_classes::find_reference_class(conn, id))
    }

    fn all_reference_classes(&self) -> Result<Vec<ReferenceClass>, StorageError> {
        self.db
            .with_conn(queries::reference_classes::all_reference_classes)
    }

    fn update_reference_class(&self, class: &ReferenceClass) -> Result<(), StorageError> {
        self.db
            .with_conn(|conn| queries::reference_classes::update_reference_class(conn, class))
    }
}

impl UpdateLedger for SqliteScoreStore {
    fn append(&self, update: &BayesianUpdate) -> Result<(), StorageError> {
        self.db
            .with_conn(|conn| queries::ledger::append_update(conn, update))
    }

    fn recent_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        limit: usize,
    ) -> Result<Vec<BayesianUpdate>, StorageError> {
        self.db.with_conn(|conn| {
            queries::ledger::recent_for_entity(conn, entity_type, entity_id, limit)
        })
    }

    fn count_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<u64, StorageError> {
        self.db
            .with_conn(|conn| queries::ledger::count_for_entity(conn, entity_type, entity_id))
    }
}

impl EvidenceStore for SqliteScoreStore {
    fn insert_verification(&self, verification: &Verification) -> Result<(), StorageError> {
        self.db
            .with_conn(|conn| queries::evidence::insert_verification(conn, verification))
    }

    fn find_verification(&self, id: &str) -> Result<Option<Verification>, StorageError> {
        self.db
            .with_conn(|conn| queries::evidence::find_verification(conn, id))
    }

    fn insert_outcome(&self, outcome: &SolutionOutcome) -> Result<(), StorageError> {
        self.db
            .with_conn(|conn| queries::evidence::insert_outcome(conn, outcome))
    }

    fn find_outcome(&self, id: &str) -> Result<Option<SolutionOutcome>, StorageError> {
        self.db
            .with_conn(|conn| queries::evidence::find_outcome(conn, id))
    }
}
