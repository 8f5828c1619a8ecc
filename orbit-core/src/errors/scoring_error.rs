//! Scoring service errors.
//!
//! Not-found and not-applicable conditions are deliberately absent:
//! the service treats those as logged no-ops, not failures.

use super::error_code::{self, OrbitErrorCode};
use super::storage_error::StorageError;

/// Errors from the Bayesian scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid estimate for {field}: {value} (must be in [0, 1])")]
    InvalidEstimate { field: &'static str, value: f64 },

    #[error("Write conflict on {entity_id} after {attempts} attempts")]
    WriteConflict { entity_id: String, attempts: u32 },
}

impl OrbitErrorCode for ScoringError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(_) => error_code::STORAGE_ERROR,
            _ => error_code::SCORING_ERROR,
        }
    }
}
