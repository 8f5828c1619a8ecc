//! Schema migrations using PRAGMA user_version.

pub mod v001_issues;
pub mod v002_reference_classes;
pub mod v003_ledger;
pub mod v004_evidence;

use orbit_core::errors::StorageError;
use rusqlite::Connection;

/// Schema version a fully migrated database reports.
pub const LATEST_VERSION: u32 = 4;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current_version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::MigrationFailed {
            version: 0,
            message: e.to_string(),
        })?;

    let migrations: &[(&str, u32)] = &[
        (v001_issues::MIGRATION_SQL, 1),
        (v002_reference_classes::MIGRATION_SQL, 2),
        (v003_ledger::MIGRATION_SQL, 3),
        (v004_evidence::MIGRATION_SQL, 4),
    ];

    for (sql, version) in migrations {
        if current_version < *version {
            conn.execute_batch(sql)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    message: e.to_string(),
                })?;
            conn.pragma_update(None, "user_version", version)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    message: e.to_string(),
                })?;
            tracing::info!(version = version, "applied migration");
        }
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::Sqlite {
            message: e.to_string(),
        })
}
