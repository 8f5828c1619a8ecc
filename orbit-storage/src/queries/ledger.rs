//! Append-only ledger queries. Insert and select only; no UPDATE or
//! DELETE statements exist for this table.

use orbit_core::errors::StorageError;
use rusqlite::{params, Connection};

use orbit_scoring::ledger::{
    BayesianUpdate, EntityType, EvidenceDirection, EvidenceType, UpdateType,
};

use super::sqlite_err;

#[derive(Debug, Clone)]
struct UpdateRow {
    entity_type: String,
    entity_id: String,
    update_type: String,
    prior_alpha: f64,
    prior_beta: f64,
    posterior_alpha: f64,
    posterior_beta: f64,
    evidence_type: String,
    evidence_id: Option<String>,
    direction: String,
    reason: String,
    created_at: i64,
}

pub fn append_update(conn: &Connection, update: &BayesianUpdate) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO bayesian_updates
             (entity_type, entity_id, update_type,
              prior_alpha, prior_beta, posterior_alpha, posterior_beta,
              evidence_type, evidence_id, direction, reason, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            update.entity_type.name(),
            update.entity_id,
            update.update_type.name(),
            update.prior_alpha,
            update.prior_beta,
            update.posterior_alpha,
            update.posterior_beta,
            update.evidence_type.name(),
            update.evidence_id,
            update.direction.name(),
            update.reason,
            update.created_at,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Newest entries first, by insertion order.
pub fn recent_for_entity(
    conn: &Connection,
    entity_type: EntityType,
    entity_id: &str,
    limit: usize,
) -> Result<Vec<BayesianUpdate>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT entity_type, entity_id, update_type,
                    prior_alpha, prior_beta, posterior_alpha, posterior_beta,
                    evidence_type, evidence_id, direction, reason, created_at
             FROM bayesian_updates
             WHERE entity_type = ?1 AND entity_id = ?2
             ORDER BY id DESC
             LIMIT ?3",
        )
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(
            params![entity_type.name(), entity_id, limit as i64],
            map_update_row,
        )
        .map_err(sqlite_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_err)?;
    rows.into_iter().map(row_to_update).collect()
}

pub fn count_for_entity(
    conn: &Connection,
    entity_type: EntityType,
    entity_id: &str,
) -> Result<u64, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT COUNT(*) FROM bayesian_updates
             WHERE entity_type = ?1 AND entity_id = ?2",
        )
        .map_err(sqlite_err)?;
    let count: i64 = stmt
        .query_row(params![entity_type.name(), entity_id], |row| row.get(0))
        .map_err(sqlite_err)?;
    Ok(count.max(0) as u64)
}

fn map_update_row(row: &rusqlite::Row) -> rusqlite::Result<UpdateRow> {
    Ok(UpdateRow {
        entity_type: row.get(0)?,
        entity_id: row.get(1)?,
        update_type: row.get(2)?,
        prior_alpha: row.get(3)?,
        prior_beta: row.get(4)?,
        posterior_alpha: row.get(5)?,
        posterior_beta: row.get(6)?,
        evidence_type: row.get(7)?,
        evidence_id: row.get(8)?,
        direction: row.get(9)?,
        reason: row.get(10)?,
        created_at: row.get(11)?,
    })
}

fn unknown_name(column: &str, value: &str) -> StorageError {
    StorageError::Serialization {
        message: format!("unknown {column} value: {value}"),
    }
}

fn row_to_update(row: UpdateRow) -> Result<BayesianUpdate, StorageError> {
    Ok(BayesianUpdate {
        entity_type: EntityType::from_name(&row.entity_type)
            .ok_or_else(|| unknown_name("entity_type", &row.entity_type))?,
        entity_id: row.entity_id,
        update_type: UpdateType::from_name(&row.update_type)
            .ok_or_else(|| unknown_name("update_type", &row.update_type))?,
        prior_alpha: row.prior_alpha,
        prior_beta: row.prior_beta,
        posterior_alpha: row.posterior_alpha,
        posterior_beta: row.posterior_beta,
        evidence_type: EvidenceType::from_name(&row.evidence_type)
            .ok_or_else(|| unknown_name("evidence_type", &row.evidence_type))?,
        evidence_id: row.evidence_id,
        direction: EvidenceDirection::from_name(&row.direction)
            .ok_or_else(|| unknown_name("direction", &row.direction))?,
        reason: row.reason,
        created_at: row.created_at,
    })
}
