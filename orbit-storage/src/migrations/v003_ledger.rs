//! V003 migration: the append-only Bayesian update ledger.
//!
//! Rows are inserted, never updated or deleted.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS bayesian_updates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    entity_type TEXT NOT NULL,
    entity_id TEXT NOT NULL,
    update_type TEXT NOT NULL,
    prior_alpha REAL NOT NULL,
    prior_beta REAL NOT NULL,
    posterior_alpha REAL NOT NULL,
    posterior_beta REAL NOT NULL,
    evidence_type TEXT NOT NULL,
    evidence_id TEXT,
    direction TEXT NOT NULL,
    reason TEXT NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (unixepoch())
) STRICT;

CREATE INDEX IF NOT EXISTS idx_updates_entity ON bayesian_updates(entity_type, entity_id, id);
CREATE INDEX IF NOT EXISTS idx_updates_evidence ON bayesian_updates(evidence_id);
"#;
