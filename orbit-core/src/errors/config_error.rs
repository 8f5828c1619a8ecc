//! Configuration errors.

use super::error_code::{self, OrbitErrorCode};

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {message}")]
    Io { message: String },

    #[error("Failed to parse config: {message}")]
    Parse { message: String },

    #[error("Invalid config value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

impl OrbitErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
