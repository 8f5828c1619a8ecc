//! Bayesian scoring engine for Orbit issues.
//!
//! Maintains Beta-distribution posteriors per issue — P(real) and
//! P(solvable) — plus point estimates for impact, reach, and cost,
//! composes them into an Expected Value, and updates the posteriors
//! incrementally as verification results, solution outcomes, and
//! cross-claim consistency signals arrive. Every prior→posterior
//! transition lands in an immutable audit ledger.
//!
//! The [`service::ScoringService`] is the single entry point;
//! persistence is abstracted behind the [`store::ScoreStore`] traits
//! (SQLite implementation in `orbit-storage`, in-memory for tests).

pub mod beta;
pub mod evidence;
pub mod explain;
pub mod ledger;
pub mod reference;
pub mod service;
pub mod store;
pub mod types;

pub use evidence::{ConsistencyAnalysis, OutcomeKind, SolutionOutcome, Verification};
pub use explain::ScoreExplanation;
pub use ledger::BayesianUpdate;
pub use reference::ReferenceClass;
pub use service::{InitialEstimates, ScoringService, UpdateStatus};
pub use store::{InMemoryScoreStore, ScoreStore};
pub use types::{BayesianScores, BetaPair, ExpectedValue, Issue, PointEstimate};
