//! CLI module for InvoiceDB
//!
//! Provides command-line interface for:
//! - init: write a config file and create the record file
//! - append / get / list / delete: raw line operations
//! - invoice: add / get / list / remove invoices

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, InvoiceAction};
pub use commands::{run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
