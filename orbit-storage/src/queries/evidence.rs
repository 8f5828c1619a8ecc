//! Evidence record queries. The polymorphic outcome payload is
//! persisted as tagged JSON and round-tripped through serde.

use orbit_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

use orbit_scoring::evidence::{
    OutcomeKind, SolutionOutcome, SourceKind, Verification, VerificationStatus,
};

use super::{serde_err, sqlite_err};

pub fn insert_verification(
    conn: &Connection,
    verification: &Verification,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO verifications (id, source_type, source_id, claim, status)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            verification.id,
            verification.source_type.name(),
            verification.source_id,
            verification.claim,
            verification.status.name(),
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn find_verification(
    conn: &Connection,
    id: &str,
) -> Result<Option<Verification>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, source_type, source_id, claim, status
             FROM verifications WHERE id = ?1",
        )
        .map_err(sqlite_err)?;
    let row = stmt
        .query_row(params![id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .optional()
        .map_err(sqlite_err)?;

    row.map(|(id, source_type, source_id, claim, status)| {
        Ok(Verification {
            id,
            source_type: SourceKind::from_name(&source_type).ok_or_else(|| {
                StorageError::Serialization {
                    message: format!("unknown source_type value: {source_type}"),
                }
            })?,
            source_id,
            claim,
            status: VerificationStatus::from_name(&status).ok_or_else(|| {
                StorageError::Serialization {
                    message: format!("unknown status value: {status}"),
                }
            })?,
        })
    })
    .transpose()
}

pub fn insert_outcome(conn: &Connection, outcome: &SolutionOutcome) -> Result<(), StorageError> {
    let payload = serde_json::to_string(&outcome.outcome).map_err(serde_err)?;
    conn.execute(
        "INSERT INTO solution_outcomes (id, solution_id, issue_id, outcome)
         VALUES (?1, ?2, ?3, ?4)",
        params![outcome.id, outcome.solution_id, outcome.issue_id, payload],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn find_outcome(conn: &Connection, id: &str) -> Result<Option<SolutionOutcome>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, solution_id, issue_id, outcome
             FROM solution_outcomes WHERE id = ?1",
        )
        .map_err(sqlite_err)?;
    let row = stmt
        .query_row(params![id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .optional()
        .map_err(sqlite_err)?;

    row.map(|(id, solution_id, issue_id, payload)| {
        let outcome: OutcomeKind = serde_json::from_str(&payload).map_err(serde_err)?;
        Ok(SolutionOutcome {
            id,
            solution_id,
            issue_id,
            outcome,
        })
    })
    .transpose()
}
