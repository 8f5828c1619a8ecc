//! Scoring engine configuration.
//!
//! The universal fallback prior used to be a magic constant scattered
//! at call sites; it now lives here and is passed into the service
//! constructor.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::ConfigError;

/// Tunable knobs for the Bayesian scoring service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Fallback prior alpha when no reference class matches.
    pub default_prior_alpha: f64,
    /// Fallback prior beta when no reference class matches.
    pub default_prior_beta: f64,
    /// Weight of an LLM-derived estimate at initialization, in
    /// pseudo-observations (~0.5 so a single model call cannot
    /// dominate a pooled prior).
    pub estimate_weight: f64,
    /// Confidence assigned to impact/reach/cost point estimates at
    /// initialization.
    pub initial_estimate_confidence: f64,
    /// Default reach estimate when the caller omits one.
    pub default_reach: f64,
    /// Default cost estimate when the caller omits one.
    pub default_cost: f64,
    /// Consistency deltas below this magnitude are dropped without a
    /// ledger entry.
    pub noise_floor: f64,
    /// Unit count at which a consistency pass reaches full evidence
    /// strength.
    pub consistency_unit_cap: u32,
    /// Minimum decomposed information units for a consistency pass to
    /// carry any signal.
    pub min_consistency_units: u32,
    /// How many recent ledger entries a score explanation includes.
    pub explain_ledger_limit: usize,
    /// Compare-and-swap attempts per mutating operation before giving
    /// up with a write conflict.
    pub max_write_retries: u32,
    /// Maximum length of quoted claim text in ledger reasons.
    pub reason_max_len: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_prior_alpha: constants::DEFAULT_PRIOR_ALPHA,
            default_prior_beta: constants::DEFAULT_PRIOR_BETA,
            estimate_weight: 0.5,
            initial_estimate_confidence: 0.3,
            default_reach: 0.5,
            default_cost: 0.3,
            noise_floor: 0.05,
            consistency_unit_cap: 20,
            min_consistency_units: 3,
            explain_ledger_limit: 5,
            max_write_retries: 3,
            reason_max_len: 120,
        }
    }
}

impl ScoringConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Validate invariants the rest of the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_prior_alpha < constants::BETA_FLOOR
            || self.default_prior_beta < constants::BETA_FLOOR
        {
            return Err(ConfigError::InvalidValue {
                field: "default_prior",
                message: format!(
                    "prior Beta({}, {}) is below the Beta(1,1) floor",
                    self.default_prior_alpha, self.default_prior_beta
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.noise_floor) {
            return Err(ConfigError::InvalidValue {
                field: "noise_floor",
                message: format!("{} is outside [0, 1]", self.noise_floor),
            });
        }
        if self.max_write_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_write_retries",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
