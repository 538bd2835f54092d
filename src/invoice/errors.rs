//! Invoice book errors

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for invoice book operations
pub type InvoiceResult<T> = Result<T, InvoiceError>;

/// Errors surfaced by the invoice book
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("There is no invoice with id: {0}")]
    NotFound(String),

    #[error("Invoice failed validation: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Invoice ids exhausted (last issued: {0})")]
    IdsExhausted(u64),

    #[error("Invoice has no id assigned")]
    MissingId,

    #[error("Malformed invoice record: {0}")]
    MalformedRecord(String),

    #[error("Invoice JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl InvoiceError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            InvoiceError::NotFound(_) => "INVOICEDB_INVOICE_NOT_FOUND",
            InvoiceError::Validation(_) => "INVOICEDB_INVOICE_INVALID",
            InvoiceError::IdsExhausted(_) => "INVOICEDB_INVOICE_IDS_EXHAUSTED",
            InvoiceError::MissingId => "INVOICEDB_INVOICE_MISSING_ID",
            InvoiceError::MalformedRecord(_) | InvoiceError::Json(_) => {
                "INVOICEDB_INVOICE_MALFORMED"
            }
            InvoiceError::Storage(e) => e.code().code(),
        }
    }
}
