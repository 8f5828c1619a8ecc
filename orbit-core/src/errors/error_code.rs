//! Stable error codes for operator-facing log lines and dashboards.

pub const SCORING_ERROR: &str = "ORBIT_SCORING";
pub const STORAGE_ERROR: &str = "ORBIT_STORAGE";
pub const CONFIG_ERROR: &str = "ORBIT_CONFIG";

/// Every Orbit error enum maps to a stable subsystem code.
pub trait OrbitErrorCode {
    fn error_code(&self) -> &'static str;
}
