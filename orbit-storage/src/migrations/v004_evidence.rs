//! V004 migration: evidence event records consumed by the process_*
//! entry points. Outcome payloads are stored as tagged JSON.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS verifications (
    id TEXT PRIMARY KEY,
    source_type TEXT NOT NULL,
    source_id TEXT NOT NULL,
    claim TEXT NOT NULL,
    status TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_verifications_source ON verifications(source_type, source_id);

CREATE TABLE IF NOT EXISTS solution_outcomes (
    id TEXT PRIMARY KEY,
    solution_id TEXT NOT NULL,
    issue_id TEXT,
    outcome TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_outcomes_issue ON solution_outcomes(issue_id);
"#;
