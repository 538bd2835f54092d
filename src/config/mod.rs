//! Store configuration
//!
//! Holds the two file paths the record store works with and the two timing
//! knobs that bound the liveness poll used during deletes:
//!
//! - `db_file_path`: the primary record file
//! - `db_temp_file_path`: scratch file used while a delete rewrites the store
//! - `file_system_wait_time_ms`: total budget for one liveness poll
//! - `unit_sleep_time_ms`: sleep between two predicate checks
//!
//! A config is validated once at construction and is immutable afterwards.
//! Nothing in this module touches the store files.

mod errors;

pub use errors::{ConfigError, ConfigResult};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default liveness-poll budget in milliseconds
pub const DEFAULT_FILE_SYSTEM_WAIT_TIME_MS: u64 = 1000;

/// Default sleep between two liveness checks in milliseconds
pub const DEFAULT_UNIT_SLEEP_TIME_MS: u64 = 10;

/// Suffix appended to the primary path when no temp path is configured
pub const DEFAULT_TEMP_SUFFIX: &str = ".tmp";

/// On-disk shape of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    db_file_path: String,

    #[serde(default)]
    db_temp_file_path: Option<String>,

    #[serde(default = "default_wait_time")]
    file_system_wait_time_ms: u64,

    #[serde(default = "default_unit_sleep")]
    unit_sleep_time_ms: u64,
}

fn default_wait_time() -> u64 {
    DEFAULT_FILE_SYSTEM_WAIT_TIME_MS
}
fn default_unit_sleep() -> u64 {
    DEFAULT_UNIT_SLEEP_TIME_MS
}

/// Validated, read-only store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    db_file_path: PathBuf,
    db_temp_file_path: PathBuf,
    file_system_wait_time_ms: u64,
    unit_sleep_time_ms: u64,
}

impl StoreConfig {
    /// Builds a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a path is empty, both paths are equal,
    /// the unit sleep is zero, or the unit sleep exceeds the wait budget.
    pub fn new(
        db_file_path: impl Into<PathBuf>,
        db_temp_file_path: impl Into<PathBuf>,
        file_system_wait_time_ms: u64,
        unit_sleep_time_ms: u64,
    ) -> ConfigResult<Self> {
        let config = Self {
            db_file_path: db_file_path.into(),
            db_temp_file_path: db_temp_file_path.into(),
            file_system_wait_time_ms,
            unit_sleep_time_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Configuration with default timings and `<primary>.tmp` as temp file.
    pub fn with_defaults(db_file_path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let db_file_path = db_file_path.into();
        let temp = Self::default_temp_path(&db_file_path);
        Self::new(
            db_file_path,
            temp,
            DEFAULT_FILE_SYSTEM_WAIT_TIME_MS,
            DEFAULT_UNIT_SLEEP_TIME_MS,
        )
    }

    /// Loads and validates configuration from a JSON file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parses and validates configuration from a JSON document.
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let file: ConfigFile = serde_json::from_str(content)?;

        let db_file_path = PathBuf::from(file.db_file_path);
        let db_temp_file_path = match file.db_temp_file_path {
            Some(p) => PathBuf::from(p),
            None => Self::default_temp_path(&db_file_path),
        };

        Self::new(
            db_file_path,
            db_temp_file_path,
            file.file_system_wait_time_ms,
            file.unit_sleep_time_ms,
        )
    }

    /// Serializes this configuration in the on-disk JSON shape.
    pub fn to_json(&self) -> ConfigResult<String> {
        let file = ConfigFile {
            db_file_path: self.db_file_path.display().to_string(),
            db_temp_file_path: Some(self.db_temp_file_path.display().to_string()),
            file_system_wait_time_ms: self.file_system_wait_time_ms,
            unit_sleep_time_ms: self.unit_sleep_time_ms,
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    fn default_temp_path(primary: &Path) -> PathBuf {
        let mut name = primary.as_os_str().to_os_string();
        name.push(DEFAULT_TEMP_SUFFIX);
        PathBuf::from(name)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.db_file_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("db_file_path"));
        }
        if self.db_temp_file_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("db_temp_file_path"));
        }
        if self.db_file_path == self.db_temp_file_path {
            return Err(ConfigError::SamePaths(
                self.db_file_path.display().to_string(),
            ));
        }
        if self.unit_sleep_time_ms == 0 {
            return Err(ConfigError::ZeroUnitSleep);
        }
        if self.unit_sleep_time_ms > self.file_system_wait_time_ms {
            return Err(ConfigError::UnitSleepExceedsBudget {
                unit_ms: self.unit_sleep_time_ms,
                wait_ms: self.file_system_wait_time_ms,
            });
        }
        Ok(())
    }

    /// Path of the primary record file
    pub fn db_file_path(&self) -> &Path {
        &self.db_file_path
    }

    /// Path of the scratch file used during deletes
    pub fn db_temp_file_path(&self) -> &Path {
        &self.db_temp_file_path
    }

    pub fn file_system_wait_time_ms(&self) -> u64 {
        self.file_system_wait_time_ms
    }

    pub fn unit_sleep_time_ms(&self) -> u64 {
        self.unit_sleep_time_ms
    }

    /// Number of sleeps one liveness poll may perform before giving up.
    pub fn max_poll_attempts(&self) -> u64 {
        self.file_system_wait_time_ms / self.unit_sleep_time_ms
    }
}
