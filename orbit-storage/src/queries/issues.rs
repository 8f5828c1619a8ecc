//! Issue queries, including the versioned compare-and-swap score
//! write.

use orbit_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

use orbit_scoring::store::WriteOutcome;
use orbit_scoring::types::{BayesianScores, BetaPair, ExpectedValue, Issue, PointEstimate};

use super::{serde_err, sqlite_err};

/// Raw issue row; score columns are nullable.
#[derive(Debug, Clone)]
pub struct IssueRow {
    pub id: String,
    pub title: String,
    pub domains: String,
    pub pattern_types: String,
    pub reference_class_id: Option<String>,
    pub p_real_alpha: Option<f64>,
    pub p_real_beta: Option<f64>,
    pub p_solvable_alpha: Option<f64>,
    pub p_solvable_beta: Option<f64>,
    pub impact_estimate: Option<f64>,
    pub impact_confidence: Option<f64>,
    pub impact_unit: Option<String>,
    pub reach_estimate: Option<f64>,
    pub reach_confidence: Option<f64>,
    pub reach_unit: Option<String>,
    pub cost_estimate: Option<f64>,
    pub cost_confidence: Option<f64>,
    pub cost_unit: Option<String>,
    pub expected_value: Option<f64>,
    pub ev_confidence: Option<f64>,
    pub version: i64,
    pub last_updated: Option<i64>,
}

const ISSUE_COLUMNS: &str = "id, title, domains, pattern_types, reference_class_id, \
     p_real_alpha, p_real_beta, p_solvable_alpha, p_solvable_beta, \
     impact_estimate, impact_confidence, impact_unit, \
     reach_estimate, reach_confidence, reach_unit, \
     cost_estimate, cost_confidence, cost_unit, \
     expected_value, ev_confidence, version, last_updated";

/// Insert a bare issue row (scores included when present).
pub fn insert_issue(conn: &Connection, issue: &Issue) -> Result<(), StorageError> {
    let domains = serde_json::to_string(&issue.domains).map_err(serde_err)?;
    let pattern_types = serde_json::to_string(&issue.pattern_types).map_err(serde_err)?;
    let scores = issue.scores.as_ref();
    let ev = issue.expected_value.as_ref();

    conn.execute(
        "INSERT INTO issues (id, title, domains, pattern_types, reference_class_id,
             p_real_alpha, p_real_beta, p_solvable_alpha, p_solvable_beta,
             impact_estimate, impact_confidence, impact_unit,
             reach_estimate, reach_confidence, reach_unit,
             cost_estimate, cost_confidence, cost_unit,
             expected_value, ev_confidence, version, last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)",
        params![
            issue.id,
            issue.title,
            domains,
            pattern_types,
            issue.reference_class_id,
            scores.map(|s| s.p_real.alpha),
            scores.map(|s| s.p_real.beta),
            scores.map(|s| s.p_solvable.alpha),
            scores.map(|s| s.p_solvable.beta),
            scores.map(|s| s.impact.estimate),
            scores.map(|s| s.impact.confidence),
            scores.and_then(|s| s.impact.unit.clone()),
            scores.map(|s| s.reach.estimate),
            scores.map(|s| s.reach.confidence),
            scores.and_then(|s| s.reach.unit.clone()),
            scores.map(|s| s.cost.estimate),
            scores.map(|s| s.cost.confidence),
            scores.and_then(|s| s.cost.unit.clone()),
            ev.map(|e| e.expected_value),
            ev.map(|e| e.ev_confidence),
            issue.version as i64,
            scores.map(|s| s.last_updated_at),
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Load an issue by id.
pub fn find_issue(conn: &Connection, id: &str) -> Result<Option<Issue>, StorageError> {
    let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql).map_err(sqlite_err)?;
    let row = stmt
        .query_row(params![id], map_issue_row)
        .optional()
        .map_err(sqlite_err)?;
    row.map(row_to_issue).transpose()
}

/// Compare-and-swap score write: applies only when the stored version
/// still matches, and increments it on success.
pub fn update_issue_scores(
    conn: &Connection,
    id: &str,
    scores: &BayesianScores,
    expected_value: &ExpectedValue,
    reference_class_id: Option<&str>,
    expected_version: u64,
) -> Result<WriteOutcome, StorageError> {
    let affected = conn
        .execute(
            "UPDATE issues SET
                 p_real_alpha = ?1, p_real_beta = ?2,
                 p_solvable_alpha = ?3, p_solvable_beta = ?4,
                 impact_estimate = ?5, impact_confidence = ?6, impact_unit = ?7,
                 reach_estimate = ?8, reach_confidence = ?9, reach_unit = ?10,
                 cost_estimate = ?11, cost_confidence = ?12, cost_unit = ?13,
                 expected_value = ?14, ev_confidence = ?15,
                 reference_class_id = ?16, last_updated = ?17,
                 version = version + 1
             WHERE id = ?18 AND version = ?19",
            params![
                scores.p_real.alpha,
                scores.p_real.beta,
                scores.p_solvable.alpha,
                scores.p_solvable.beta,
                scores.impact.estimate,
                scores.impact.confidence,
                scores.impact.unit,
                scores.reach.estimate,
                scores.reach.confidence,
                scores.reach.unit,
                scores.cost.estimate,
                scores.cost.confidence,
                scores.cost.unit,
                expected_value.expected_value,
                expected_value.ev_confidence,
                reference_class_id,
                scores.last_updated_at,
                id,
                expected_version as i64,
            ],
        )
        .map_err(sqlite_err)?;

    if affected == 0 {
        Ok(WriteOutcome::Conflict)
    } else {
        Ok(WriteOutcome::Applied)
    }
}

fn map_issue_row(row: &rusqlite::Row) -> rusqlite::Result<IssueRow> {
    Ok(IssueRow {
        id: row.get(0)?,
        title: row.get(1)?,
        domains: row.get(2)?,
        pattern_types: row.get(3)?,
        reference_class_id: row.get(4)?,
        p_real_alpha: row.get(5)?,
        p_real_beta: row.get(6)?,
        p_solvable_alpha: row.get(7)?,
        p_solvable_beta: row.get(8)?,
        impact_estimate: row.get(9)?,
        impact_confidence: row.get(10)?,
        impact_unit: row.get(11)?,
        reach_estimate: row.get(12)?,
        reach_confidence: row.get(13)?,
        reach_unit: row.get(14)?,
        cost_estimate: row.get(15)?,
        cost_confidence: row.get(16)?,
        cost_unit: row.get(17)?,
        expected_value: row.get(18)?,
        ev_confidence: row.get(19)?,
        version: row.get(20)?,
        last_updated: row.get(21)?,
    })
}

fn row_to_issue(row: IssueRow) -> Result<Issue, StorageError> {
    let domains: Vec<String> = serde_json::from_str(&row.domains).map_err(serde_err)?;
    let pattern_types: Vec<String> =
        serde_json::from_str(&row.pattern_types).map_err(serde_err)?;

    let scores = match (
        row.p_real_alpha,
        row.p_real_beta,
        row.p_solvable_alpha,
        row.p_solvable_beta,
        row.impact_estimate,
        row.impact_confidence,
        row.reach_estimate,
        row.reach_confidence,
        row.cost_estimate,
        row.cost_confidence,
    ) {
        (
            Some(pra),
            Some(prb),
            Some(psa),
            Some(psb),
            Some(ie),
            Some(ic),
            Some(re),
            Some(rc),
            Some(ce),
            Some(cc),
        ) => {
            let mut impact = PointEstimate::new(ie, ic);
            impact.unit = row.impact_unit;
            let mut reach = PointEstimate::new(re, rc);
            reach.unit = row.reach_unit;
            let mut cost = PointEstimate::new(ce, cc);
            cost.unit = row.cost_unit;
            Some(BayesianScores {
                p_real: BetaPair::new(pra, prb),
                p_solvable: BetaPair::new(psa, psb),
                impact,
                reach,
                cost,
                last_updated_at: row.last_updated.unwrap_or(0),
            })
        }
        _ => None,
    };

    let expected_value = match (row.expected_value, row.ev_confidence) {
        (Some(expected_value), Some(ev_confidence)) => Some(ExpectedValue {
            expected_value,
            ev_confidence,
        }),
        _ => None,
    };

    Ok(Issue {
        id: row.id,
        title: row.title,
        domains,
        pattern_types,
        reference_class_id: row.reference_class_id,
        scores,
        expected_value,
        version: row.version.max(0) as u64,
    })
}
