//! CLI command implementations
//!
//! Each command loads the configuration, opens the store, performs one
//! operation and writes a single JSON response.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use super::args::{Command, InvoiceAction};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_response};
use crate::config::StoreConfig;
use crate::invoice::{Invoice, InvoiceBook};
use crate::storage::LineStore;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init {
            config,
            db_file,
            temp_file,
            wait_ms,
            unit_sleep_ms,
        } => init(&config, db_file, temp_file, wait_ms, unit_sleep_ms),
        Command::Append { config, line } => append(&config, &line),
        Command::Get { config, key } => get(&config, &key),
        Command::List { config } => list(&config),
        Command::Delete { config, key } => delete(&config, &key),
        Command::Invoice { action } => invoice(action),
    }
}

fn open_store(config_path: &Path) -> CliResult<LineStore> {
    let config = StoreConfig::load(config_path)?;
    Ok(LineStore::open(config)?)
}

fn open_book(config_path: &Path) -> CliResult<InvoiceBook> {
    Ok(InvoiceBook::open(open_store(config_path)?)?)
}

/// Writes a configuration file and creates the record file
pub fn init(
    config_path: &Path,
    db_file: PathBuf,
    temp_file: Option<PathBuf>,
    wait_ms: u64,
    unit_sleep_ms: u64,
) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized(config_path));
    }

    let temp_file = temp_file.unwrap_or_else(|| {
        let mut name = db_file.as_os_str().to_os_string();
        name.push(crate::config::DEFAULT_TEMP_SUFFIX);
        PathBuf::from(name)
    });
    let config = StoreConfig::new(db_file, temp_file, wait_ms, unit_sleep_ms)?;

    fs::write(config_path, config.to_json()?).map_err(|e| {
        CliError::config_error(format!(
            "Failed to write config {}: {}",
            config_path.display(),
            e
        ))
    })?;
    let store = LineStore::open(config)?;

    write_response(json!({
        "initialized": true,
        "db_file": store.path().display().to_string(),
    }))
}

pub fn append(config_path: &Path, line: &str) -> CliResult<()> {
    open_store(config_path)?.append(line)?;
    write_response(json!({"appended": true}))
}

pub fn get(config_path: &Path, key: &str) -> CliResult<()> {
    let line = open_store(config_path)?.read_line(key)?;
    write_response(json!({"line": line}))
}

pub fn list(config_path: &Path) -> CliResult<()> {
    let lines = open_store(config_path)?.read_all()?;
    write_response(json!({"lines": lines}))
}

pub fn delete(config_path: &Path, key: &str) -> CliResult<()> {
    let removed = open_store(config_path)?.delete_line(key)?;
    write_response(json!({"removed": removed}))
}

pub fn invoice(action: InvoiceAction) -> CliResult<()> {
    match action {
        InvoiceAction::Add { config } => {
            let invoice: Invoice = read_request()?;
            let stored = open_book(&config)?.add(invoice)?;
            write_response(serde_json::to_value(stored)?)
        }
        InvoiceAction::Get { config, id } => {
            let found = open_book(&config)?.find(id)?;
            write_response(serde_json::to_value(found)?)
        }
        InvoiceAction::List { config } => {
            let all = open_book(&config)?.list()?;
            write_response(serde_json::to_value(all)?)
        }
        InvoiceAction::Remove { config, id } => {
            open_book(&config)?.remove(id)?;
            write_response(json!({"removed": id}))
        }
    }
}
