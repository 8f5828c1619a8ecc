//! Connection management.
//!
//! The scoring core is single-writer per entity, so one serialized
//! connection behind a mutex is enough; reads share the same handle.

pub mod pragmas;

use std::path::Path;
use std::sync::Mutex;

use orbit_core::errors::StorageError;
use rusqlite::Connection;

use self::pragmas::apply_pragmas;
use crate::migrations;

/// The single serialized database handle.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open a database at the given path, apply pragmas, run
    /// migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| StorageError::Sqlite {
            message: e.to_string(),
        })?;
        apply_pragmas(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::Sqlite {
            message: e.to_string(),
        })?;
        apply_pragmas(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run an operation against the serialized connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        f(&guard)
    }
}
