//! Integration tests for the SQLite store: migrations, round trips,
//! versioned writes, and ledger ordering.

use orbit_scoring::evidence::{
    OutcomeKind, SolutionOutcome, SolutionStatus, SourceKind, Verification, VerificationStatus,
};
use orbit_scoring::ledger::{
    BayesianUpdate, EntityType, EvidenceDirection, EvidenceType, UpdateType,
};
use orbit_scoring::reference::ReferenceClass;
use orbit_scoring::store::{
    EvidenceStore, IssueStore, ReferenceClassStore, UpdateLedger, WriteOutcome,
};
use orbit_scoring::types::{
    BayesianScores, BetaPair, ExpectedValue, Issue, PointEstimate,
};
use orbit_storage::connection::Database;
use orbit_storage::migrations;
use orbit_storage::SqliteScoreStore;

fn sample_scores() -> BayesianScores {
    let mut impact = PointEstimate::new(0.7, 0.3);
    impact.unit = Some("people affected".to_string());
    BayesianScores {
        p_real: BetaPair::new(2.4, 1.6),
        p_solvable: BetaPair::new(1.7, 2.3),
        impact,
        reach: PointEstimate::new(0.5, 0.3),
        cost: PointEstimate::new(0.3, 0.3),
        last_updated_at: 1_700_000_000,
    }
}

fn sample_update(entity_id: &str, reason: &str, created_at: i64) -> BayesianUpdate {
    BayesianUpdate {
        entity_type: EntityType::Issue,
        entity_id: entity_id.to_string(),
        update_type: UpdateType::PReal,
        prior_alpha: 2.0,
        prior_beta: 2.0,
        posterior_alpha: 3.0,
        posterior_beta: 2.0,
        evidence_type: EvidenceType::Verification,
        evidence_id: Some("ver1".to_string()),
        direction: EvidenceDirection::Positive,
        reason: reason.to_string(),
        created_at,
    }
}

#[test]
fn test_migrations_reach_latest_version() {
    let db = Database::open_in_memory().unwrap();
    let version = db.with_conn(|conn| migrations::current_version(conn)).unwrap();
    assert_eq!(version, migrations::LATEST_VERSION);
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().unwrap();
    db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
    let version = db.with_conn(|conn| migrations::current_version(conn)).unwrap();
    assert_eq!(version, migrations::LATEST_VERSION);
}

#[test]
fn test_open_on_disk_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orbit.db");
    let store = SqliteScoreStore::open(&path).unwrap();
    store.insert_issue(&Issue::new("iss1", "clinic wait times")).unwrap();
    assert!(path.exists());
}

#[test]
fn test_issue_round_trip_without_scores() {
    let store = SqliteScoreStore::open_in_memory().unwrap();
    let mut issue = Issue::new("iss1", "clinic wait times");
    issue.domains = vec!["health".to_string()];
    issue.pattern_types = vec!["access_gap".to_string()];
    store.insert_issue(&issue).unwrap();

    let loaded = store.find_issue("iss1").unwrap().unwrap();
    assert_eq!(loaded.id, "iss1");
    assert_eq!(loaded.domains, vec!["health".to_string()]);
    assert!(loaded.scores.is_none());
    assert!(loaded.expected_value.is_none());
    assert_eq!(loaded.version, 0);
}

#[test]
fn test_find_missing_issue_returns_none() {
    let store = SqliteScoreStore::open_in_memory().unwrap();
    assert!(store.find_issue("nope").unwrap().is_none());
}

#[test]
fn test_issue_score_write_round_trips() {
    let store = SqliteScoreStore::open_in_memory().unwrap();
    store.insert_issue(&Issue::new("iss1", "clinic wait times")).unwrap();

    let scores = sample_scores();
    let ev = ExpectedValue::from_scores(&scores);
    let outcome = store
        .update_issue_scores("iss1", &scores, &ev, Some("health"), 0)
        .unwrap();
    assert_eq!(outcome, WriteOutcome::Applied);

    let loaded = store.find_issue("iss1").unwrap().unwrap();
    assert_eq!(loaded.version, 1);
    assert_eq!(loaded.reference_class_id.as_deref(), Some("health"));
    let loaded_scores = loaded.scores.unwrap();
    assert!((loaded_scores.p_real.alpha - 2.4).abs() < 1e-9);
    assert!((loaded_scores.p_solvable.beta - 2.3).abs() < 1e-9);
    assert_eq!(
        loaded_scores.impact.unit.as_deref(),
        Some("people affected")
    );
    let loaded_ev = loaded.expected_value.unwrap();
    assert!((loaded_ev.expected_value - ev.expected_value).abs() < 1e-9);
}

#[test]
fn test_stale_version_write_conflicts() {
    let store = SqliteScoreStore::open_in_memory().unwrap();
    store.insert_issue(&Issue::new("iss1", "clinic wait times")).unwrap();

    let scores = sample_scores();
    let ev = ExpectedValue::from_scores(&scores);
    store
        .update_issue_scores("iss1", &scores, &ev, None, 0)
        .unwrap();
    let second = store
        .update_issue_scores("iss1", &scores, &ev, None, 0)
        .unwrap();
    assert_eq!(second, WriteOutcome::Conflict);

    // The row is untouched by the losing write.
    assert_eq!(store.find_issue("iss1").unwrap().unwrap().version, 1);
}

#[test]
fn test_reference_class_round_trip_and_update() {
    let store = SqliteScoreStore::open_in_memory().unwrap();
    let mut class = ReferenceClass {
        id: "health".to_string(),
        name: "Health access".to_string(),
        domains: vec!["health".to_string()],
        pattern_types: vec!["access_gap".to_string()],
        p_real: BetaPair::new(5.0, 3.0),
        p_solvable: BetaPair::new(4.0, 4.0),
        observation_count: 6,
    };
    store.insert_reference_class(&class).unwrap();

    class.nudge(UpdateType::PReal, EvidenceDirection::Positive);
    store.update_reference_class(&class).unwrap();

    let loaded = store.find_reference_class("health").unwrap().unwrap();
    assert!((loaded.p_real.alpha - 6.0).abs() < 1e-9);
    assert_eq!(loaded.observation_count, 7);
}

#[test]
fn test_all_reference_classes_ordered_by_id() {
    let store = SqliteScoreStore::open_in_memory().unwrap();
    for id in ["transit", "health", "education"] {
        store
            .insert_reference_class(&ReferenceClass {
                id: id.to_string(),
                name: id.to_string(),
                domains: vec![id.to_string()],
                pattern_types: vec![],
                p_real: BetaPair::new(2.0, 2.0),
                p_solvable: BetaPair::new(2.0, 2.0),
                observation_count: 0,
            })
            .unwrap();
    }
    let ids: Vec<String> = store
        .all_reference_classes()
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["education", "health", "transit"]);
}

#[test]
fn test_ledger_append_and_recent_ordering() {
    let store = SqliteScoreStore::open_in_memory().unwrap();
    for i in 0..4 {
        store
            .append(&sample_update("iss1", &format!("entry {i}"), i))
            .unwrap();
    }
    store.append(&sample_update("iss2", "other issue", 9)).unwrap();

    let recent = store
        .recent_for_entity(EntityType::Issue, "iss1", 3)
        .unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].reason, "entry 3");
    assert_eq!(recent[2].reason, "entry 1");
    assert_eq!(recent[0].evidence_id.as_deref(), Some("ver1"));

    assert_eq!(store.count_for_entity(EntityType::Issue, "iss1").unwrap(), 4);
    assert_eq!(store.count_for_entity(EntityType::Issue, "iss2").unwrap(), 1);
    assert_eq!(
        store
            .count_for_entity(EntityType::ReferenceClass, "iss1")
            .unwrap(),
        0
    );
}

#[test]
fn test_verification_round_trip() {
    let store = SqliteScoreStore::open_in_memory().unwrap();
    let verification = Verification {
        id: "ver1".to_string(),
        source_type: SourceKind::Issue,
        source_id: "iss1".to_string(),
        claim: "clinic is understaffed".to_string(),
        status: VerificationStatus::Corroborated,
    };
    store.insert_verification(&verification).unwrap();

    let loaded = store.find_verification("ver1").unwrap().unwrap();
    assert_eq!(loaded.source_type, SourceKind::Issue);
    assert_eq!(loaded.status, VerificationStatus::Corroborated);
    assert_eq!(loaded.claim, "clinic is understaffed");
}

#[test]
fn test_outcome_payload_round_trips_each_kind() {
    let store = SqliteScoreStore::open_in_memory().unwrap();
    let kinds = vec![
        OutcomeKind::StatusChange {
            new_status: SolutionStatus::Resolved,
        },
        OutcomeKind::MetricMeasurement {
            metric_value: Some(50.0),
            target_value: Some(100.0),
        },
        OutcomeKind::Feedback { sentiment: -0.6 },
        OutcomeKind::VerificationResult {
            status: VerificationStatus::Contested,
        },
    ];
    for (i, kind) in kinds.into_iter().enumerate() {
        let id = format!("out{i}");
        store
            .insert_outcome(&SolutionOutcome {
                id: id.clone(),
                solution_id: "sol1".to_string(),
                issue_id: Some("iss1".to_string()),
                outcome: kind.clone(),
            })
            .unwrap();
        let loaded = store.find_outcome(&id).unwrap().unwrap();
        assert_eq!(loaded.outcome, kind);
    }
}

#[test]
fn test_outcome_without_issue_link_round_trips() {
    let store = SqliteScoreStore::open_in_memory().unwrap();
    store
        .insert_outcome(&SolutionOutcome {
            id: "out1".to_string(),
            solution_id: "sol1".to_string(),
            issue_id: None,
            outcome: OutcomeKind::Feedback { sentiment: 0.8 },
        })
        .unwrap();
    let loaded = store.find_outcome("out1").unwrap().unwrap();
    assert!(loaded.issue_id.is_none());
}
