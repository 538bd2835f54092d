//! Configuration error types

use thiserror::Error;

/// Result type for configuration loading and validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while reading or validating a store configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0} must not be empty")]
    EmptyPath(&'static str),

    #[error("db_file_path and db_temp_file_path must differ (both are '{0}')")]
    SamePaths(String),

    #[error("unit_sleep_time_ms must be > 0")]
    ZeroUnitSleep,

    #[error("unit_sleep_time_ms ({unit_ms}) must not exceed file_system_wait_time_ms ({wait_ms})")]
    UnitSleepExceedsBudget { unit_ms: u64, wait_ms: u64 },
}

impl ConfigError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "INVOICEDB_CONFIG_READ_ERROR",
            ConfigError::Parse(_) => "INVOICEDB_CONFIG_PARSE_ERROR",
            _ => "INVOICEDB_CONFIG_INVALID",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_share_code() {
        assert_eq!(ConfigError::ZeroUnitSleep.code(), "INVOICEDB_CONFIG_INVALID");
        assert_eq!(
            ConfigError::EmptyPath("db_file_path").code(),
            "INVOICEDB_CONFIG_INVALID"
        );
    }

    #[test]
    fn test_display_mentions_both_timings() {
        let err = ConfigError::UnitSleepExceedsBudget {
            unit_ms: 50,
            wait_ms: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("50"));
        assert!(msg.contains("10"));
    }
}
