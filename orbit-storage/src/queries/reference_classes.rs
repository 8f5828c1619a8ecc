//! Reference class queries. Domain and pattern lists are stored as
//! JSON arrays in TEXT columns.

use orbit_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

use orbit_scoring::reference::ReferenceClass;
use orbit_scoring::types::BetaPair;

use super::{serde_err, sqlite_err};

#[derive(Debug, Clone)]
struct ReferenceClassRow {
    id: String,
    name: String,
    domains: String,
    pattern_types: String,
    p_real_alpha: f64,
    p_real_beta: f64,
    p_solvable_alpha: f64,
    p_solvable_beta: f64,
    observation_count: i64,
}

pub fn insert_reference_class(
    conn: &Connection,
    class: &ReferenceClass,
) -> Result<(), StorageError> {
    let domains = serde_json::to_string(&class.domains).map_err(serde_err)?;
    let pattern_types = serde_json::to_string(&class.pattern_types).map_err(serde_err)?;
    conn.execute(
        "INSERT INTO reference_classes
             (id, name, domains, pattern_types,
              p_real_alpha, p_real_beta, p_solvable_alpha, p_solvable_beta,
              observation_count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            class.id,
            class.name,
            domains,
            pattern_types,
            class.p_real.alpha,
            class.p_real.beta,
            class.p_solvable.alpha,
            class.p_solvable.beta,
            class.observation_count as i64,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn find_reference_class(
    conn: &Connection,
    id: &str,
) -> Result<Option<ReferenceClass>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, name, domains, pattern_types,
                    p_real_alpha, p_real_beta, p_solvable_alpha, p_solvable_beta,
                    observation_count
             FROM reference_classes WHERE id = ?1",
        )
        .map_err(sqlite_err)?;
    let row = stmt
        .query_row(params![id], map_class_row)
        .optional()
        .map_err(sqlite_err)?;
    row.map(row_to_class).transpose()
}

/// All classes, ordered by id for deterministic matching.
pub fn all_reference_classes(conn: &Connection) -> Result<Vec<ReferenceClass>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, name, domains, pattern_types,
                    p_real_alpha, p_real_beta, p_solvable_alpha, p_solvable_beta,
                    observation_count
             FROM reference_classes ORDER BY id",
        )
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map([], map_class_row)
        .map_err(sqlite_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_err)?;
    rows.into_iter().map(row_to_class).collect()
}

pub fn update_reference_class(
    conn: &Connection,
    class: &ReferenceClass,
) -> Result<(), StorageError> {
    let domains = serde_json::to_string(&class.domains).map_err(serde_err)?;
    let pattern_types = serde_json::to_string(&class.pattern_types).map_err(serde_err)?;
    conn.execute(
        "UPDATE reference_classes SET
             name = ?1, domains = ?2, pattern_types = ?3,
             p_real_alpha = ?4, p_real_beta = ?5,
             p_solvable_alpha = ?6, p_solvable_beta = ?7,
             observation_count = ?8
         WHERE id = ?9",
        params![
            class.name,
            domains,
            pattern_types,
            class.p_real.alpha,
            class.p_real.beta,
            class.p_solvable.alpha,
            class.p_solvable.beta,
            class.observation_count as i64,
            class.id,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

fn map_class_row(row: &rusqlite::Row) -> rusqlite::Result<ReferenceClassRow> {
    Ok(ReferenceClassRow {
        id: row.get(0)?,
        name: row.get(1)?,
        domains: row.get(2)?,
        pattern_types: row.get(3)?,
        p_real_alpha: row.get(4)?,
        p_real_beta: row.get(5)?,
        p_solvable_alpha: row.get(6)?,
        p_solvable_beta: row.get(7)?,
        observation_count: row.get(8)?,
    })
}

fn row_to_class(row: ReferenceClassRow) -> Result<ReferenceClass, StorageError> {
    Ok(ReferenceClass {
        id: row.id,
        name: row.name,
        domains: serde_json::from_str(&row.domains).map_err(serde_err)?,
        pattern_types: serde_json::from_str(&row.pattern_types).map_err(serde_err)?,
        p_real: BetaPair::new(row.p_real_alpha, row.p_real_beta),
        p_solvable: BetaPair::new(row.p_solvable_alpha, row.p_solvable_beta),
        observation_count: row.observation_count.max(0) as u64,
    })
}
