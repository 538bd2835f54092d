//! Flat-file record store
//!
//! A line-oriented persistence engine over one plain text file: append,
//! read-by-key, read-all and delete-by-key, with no database engine, cache or
//! index underneath.
//!
//! # Design Principles
//!
//! - One record per line, newline-terminated
//! - Keys match by substring; line content is opaque to the store
//! - Append never reads; every read is a full linear scan
//! - Delete rewrites the whole file through a temp copy
//! - Bounded liveness polls pace the swap and degrade to "proceed anyway"

mod errors;
mod poll;
mod store;

pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use poll::{poll_until, wait_for_file, FileCondition, PollBudget, PollOutcome};
pub use store::{DeletePhase, LineStore, LINE_TERMINATOR};
