//! Per-table query modules: row structs, prepared statements, and
//! row→domain conversions.

pub mod evidence;
pub mod issues;
pub mod ledger;
pub mod reference_classes;

use orbit_core::errors::StorageError;

pub(crate) fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::Sqlite {
        message: e.to_string(),
    }
}

pub(crate) fn serde_err(e: serde_json::Error) -> StorageError {
    StorageError::Serialization {
        message: e.to_string(),
    }
}
