//! Observable events
//!
//! Every log line the store and the invoice book emit uses one of these
//! names, so log consumers can match on a closed set.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Store lifecycle
    /// Primary file ensured at startup
    StoreOpened,
    /// Primary file could not be created (FATAL)
    StoreInitFailed,

    // Record operations
    /// Line appended to the primary file
    LineAppended,
    /// Append failed
    AppendFailed,
    /// Read or scan failed
    ReadFailed,

    // Delete protocol
    /// Delete protocol entered a new phase
    DeletePhaseEntered,
    /// Filter-rewrite and swap finished
    DeleteComplete,
    /// Any delete step failed
    DeleteFailed,
    /// Liveness poll exhausted its budget and the protocol proceeded anyway
    PollGaveUp,

    // Invoice book
    /// Id sequence seeded from persisted records
    SequenceSeeded,
    /// Invoice rejected by validation
    InvoiceRejected,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StoreOpened => "STORE_OPENED",
            Event::StoreInitFailed => "STORE_INIT_FAILED",
            Event::LineAppended => "LINE_APPENDED",
            Event::AppendFailed => "APPEND_FAILED",
            Event::ReadFailed => "READ_FAILED",
            Event::DeletePhaseEntered => "DELETE_PHASE_ENTERED",
            Event::DeleteComplete => "DELETE_COMPLETE",
            Event::DeleteFailed => "DELETE_FAILED",
            Event::PollGaveUp => "POLL_GAVE_UP",
            Event::SequenceSeeded => "SEQUENCE_SEEDED",
            Event::InvoiceRejected => "INVOICE_REJECTED",
        }
    }

    /// Returns whether this event implies the process cannot continue
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StoreInitFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
