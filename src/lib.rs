//! invoicedb - a flat-file invoice record store
//!
//! A line-oriented persistence engine over one plain text file, plus the
//! invoice book that stores one serialized invoice per line on top of it.
//!
//! Dependency order: `config` <- `storage` <- `invoice` <- `cli`, with
//! `observability` used throughout.

pub mod cli;
pub mod config;
pub mod invoice;
pub mod observability;
pub mod storage;

pub use config::StoreConfig;
pub use storage::{LineStore, StorageError, StorageErrorCode, StorageResult};
