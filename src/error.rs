//! Error types for configuration loading and validation

use thiserror::Error;

/// Configuration errors. All of them are fatal at session start.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value or range is outside what the simulation can run with
    #[error("invalid configuration `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for `GameConfig`
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
