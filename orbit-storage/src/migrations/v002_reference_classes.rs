//! V002 migration: reference classes (pooled priors).

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS reference_classes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    domains TEXT NOT NULL DEFAULT '[]',
    pattern_types TEXT NOT NULL DEFAULT '[]',
    p_real_alpha REAL NOT NULL,
    p_real_beta REAL NOT NULL,
    p_solvable_alpha REAL NOT NULL,
    p_solvable_beta REAL NOT NULL,
    observation_count INTEGER NOT NULL DEFAULT 0
) STRICT;
"#;
