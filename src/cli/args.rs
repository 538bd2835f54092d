//! CLI argument definitions using clap
//!
//! Commands:
//! - invoicedb init --db-file <path>
//! - invoicedb append|get|list|delete --config <path>
//! - invoicedb invoice add|get|list|remove --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// InvoiceDB - a flat-file invoice record store
#[derive(Parser, Debug)]
#[command(name = "invoicedb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a configuration file and create the record file
    Init {
        /// Path of the configuration file to write
        #[arg(long, default_value = "./invoicedb.json")]
        config: PathBuf,

        /// Primary record file
        #[arg(long)]
        db_file: PathBuf,

        /// Scratch file used during deletes (default: <db-file>.tmp)
        #[arg(long)]
        temp_file: Option<PathBuf>,

        /// Liveness poll budget in milliseconds
        #[arg(long, default_value_t = crate::config::DEFAULT_FILE_SYSTEM_WAIT_TIME_MS)]
        wait_ms: u64,

        /// Sleep between two liveness checks in milliseconds
        #[arg(long, default_value_t = crate::config::DEFAULT_UNIT_SLEEP_TIME_MS)]
        unit_sleep_ms: u64,
    },

    /// Append a raw line
    Append {
        #[arg(long, default_value = "./invoicedb.json")]
        config: PathBuf,

        line: String,
    },

    /// Print every line containing the key, joined without separator
    Get {
        #[arg(long, default_value = "./invoicedb.json")]
        config: PathBuf,

        key: String,
    },

    /// Print all lines
    List {
        #[arg(long, default_value = "./invoicedb.json")]
        config: PathBuf,
    },

    /// Delete every line containing the key
    Delete {
        #[arg(long, default_value = "./invoicedb.json")]
        config: PathBuf,

        key: String,
    },

    /// Invoice operations
    Invoice {
        #[command(subcommand)]
        action: InvoiceAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum InvoiceAction {
    /// Add an invoice read as one JSON object from stdin
    Add {
        #[arg(long, default_value = "./invoicedb.json")]
        config: PathBuf,
    },

    /// Show one invoice
    Get {
        #[arg(long, default_value = "./invoicedb.json")]
        config: PathBuf,

        id: u64,
    },

    /// List all invoices
    List {
        #[arg(long, default_value = "./invoicedb.json")]
        config: PathBuf,
    },

    /// Remove an invoice
    Remove {
        #[arg(long, default_value = "./invoicedb.json")]
        config: PathBuf,

        id: u64,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
