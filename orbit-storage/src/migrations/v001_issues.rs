//! V001 migration: issues with embedded Bayesian score columns.
//!
//! Score columns are nullable — an issue exists before initialization
//! seeds its scores. `version` backs compare-and-swap writes.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS issues (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    domains TEXT NOT NULL DEFAULT '[]',
    pattern_types TEXT NOT NULL DEFAULT '[]',
    reference_class_id TEXT,
    p_real_alpha REAL,
    p_real_beta REAL,
    p_solvable_alpha REAL,
    p_solvable_beta REAL,
    impact_estimate REAL,
    impact_confidence REAL,
    impact_unit TEXT,
    reach_estimate REAL,
    reach_confidence REAL,
    reach_unit TEXT,
    cost_estimate REAL,
    cost_confidence REAL,
    cost_unit TEXT,
    expected_value REAL,
    ev_confidence REAL,
    version INTEGER NOT NULL DEFAULT 0,
    last_updated INTEGER
) STRICT;

CREATE INDEX IF NOT EXISTS idx_issues_expected_value ON issues(expected_value);
CREATE INDEX IF NOT EXISTS idx_issues_reference_class ON issues(reference_class_id);
"#;
