//! Record store error types
//!
//! Error codes:
//! - INVOICEDB_STORAGE_INIT_ERROR (FATAL severity)
//! - INVOICEDB_STORAGE_WRITE_ERROR (ERROR severity)
//! - INVOICEDB_STORAGE_READ_ERROR (ERROR severity)
//! - INVOICEDB_STORAGE_DELETE_ERROR (ERROR severity)
//!
//! None of these are retried inside the store. After a delete error the
//! primary file may be in its pre-delete, filtered, or mid-swap state; callers
//! must re-read the store before trusting it.

use std::fmt;
use std::io;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, process continues
    Error,
    /// No store can be constructed
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Primary file could not be created or opened at startup
    StorageInitError,
    /// Append failed
    StorageWriteError,
    /// Scan or read failed
    StorageReadError,
    /// A step of the filter-rewrite-swap sequence failed
    StorageDeleteError,
}

impl StorageErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::StorageInitError => "INVOICEDB_STORAGE_INIT_ERROR",
            StorageErrorCode::StorageWriteError => "INVOICEDB_STORAGE_WRITE_ERROR",
            StorageErrorCode::StorageReadError => "INVOICEDB_STORAGE_READ_ERROR",
            StorageErrorCode::StorageDeleteError => "INVOICEDB_STORAGE_DELETE_ERROR",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::StorageInitError => Severity::Fatal,
            StorageErrorCode::StorageWriteError
            | StorageErrorCode::StorageReadError
            | StorageErrorCode::StorageDeleteError => Severity::Error,
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with the triggering I/O cause attached
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    details: Option<String>,
    source: io::Error,
}

impl StorageError {
    fn new(code: StorageErrorCode, message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source,
        }
    }

    /// Primary file could not be created at startup
    pub fn init_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::StorageInitError, message, source)
    }

    /// Append failed
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::StorageWriteError, message, source)
    }

    /// Read failed
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::StorageReadError, message, source)
    }

    /// Delete protocol failed
    pub fn delete_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::StorageDeleteError, message, source)
    }

    /// Attaches context such as the path or key involved.
    ///
    /// Repeated calls accumulate, separated by `; `.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        let details = details.into();
        self.details = Some(match self.details.take() {
            Some(existing) => format!("{}; {}", existing, details),
            None => details,
        });
        self
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns the underlying I/O error
    pub fn io_error(&self) -> &io::Error {
        &self.source
    }

    /// Returns whether this error prevents the store from existing
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        write!(f, ": {}", self.source)
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
