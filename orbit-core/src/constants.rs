//! Shared numeric constants for the scoring engine.

/// Beta parameters are never driven below the uniform Beta(1,1) floor.
pub const BETA_FLOOR: f64 = 1.0;

/// Universal fallback prior when no reference class matches:
/// Beta(2,2) for both P(real) and P(solvable).
pub const DEFAULT_PRIOR_ALPHA: f64 = 2.0;
pub const DEFAULT_PRIOR_BETA: f64 = 2.0;

/// Pseudo-observation count implied by the universal prior, for both
/// probability pairs. Implied sample size = alpha + beta − this.
pub const PRIOR_PSEUDO_OBSERVATIONS: f64 = 4.0;

/// Credible interval mass used for explanation reports.
pub const CREDIBLE_INTERVAL_LEVEL: f64 = 0.95;
