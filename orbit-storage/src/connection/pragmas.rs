//! SQLite pragma setup applied to every new connection.

use orbit_core::errors::StorageError;
use rusqlite::Connection;

/// Apply the standard pragma set: WAL journaling, normal sync,
/// foreign keys, and a busy timeout so concurrent openers back off
/// instead of failing immediately.
pub fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )
    .map_err(|e| StorageError::Sqlite {
        message: e.to_string(),
    })
}
