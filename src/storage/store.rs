//! Line-oriented record store
//!
//! One record per `\n`-terminated line in a plain text file. A record is
//! addressed by a key that must occur as a substring of its line; the store
//! never parses line content.
//!
//! - `append` adds a line with a single write, without scanning
//! - `read_line` / `read_all` are full linear scans, no cache or index
//! - `delete_line` rewrites the file through a temp copy and swaps it in
//!
//! # Delete protocol
//!
//! ```text
//! Idle -> Scanning -> DeletePrimary -> CopyTemp -> DeleteTemp -> Idle
//!                          \______________\___________\______-> Failed
//! ```
//!
//! Scanning copies every non-matching line to the temp file. The swap then
//! deletes the primary, copies the temp file to the primary path and deletes
//! the temp file, each step preceded by a bounded liveness poll. A failure at
//! any step returns `StorageDeleteError` with no rollback, and the temp file
//! may be left behind.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::errors::{StorageError, StorageResult};
use super::poll::{wait_for_file, FileCondition, PollBudget};
use crate::config::StoreConfig;
use crate::observability::{log_event, log_event_with_fields, Event, Severity};

/// Line terminator written after every record
pub const LINE_TERMINATOR: &str = "\n";

/// States of the delete protocol, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePhase {
    /// Copying non-matching lines to the temp file
    Scanning,
    /// About to remove the primary file
    DeletePrimary,
    /// About to copy the temp file to the primary path
    CopyTemp,
    /// About to remove the temp file
    DeleteTemp,
}

impl DeletePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletePhase::Scanning => "scanning",
            DeletePhase::DeletePrimary => "delete_primary",
            DeletePhase::CopyTemp => "copy_temp",
            DeletePhase::DeleteTemp => "delete_temp",
        }
    }
}

type PhaseObserver = Box<dyn FnMut(DeletePhase) + Send>;

/// Flat-file record store.
///
/// Mutating operations take `&mut self`; there is no locking against other
/// processes touching the same files.
pub struct LineStore {
    config: StoreConfig,
    budget: PollBudget,
    observer: Option<PhaseObserver>,
}

impl LineStore {
    /// Opens the store, creating an empty primary file if none exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageInitError` if the file cannot be created (missing
    /// directory, permissions, disk full).
    pub fn open(config: StoreConfig) -> StorageResult<Self> {
        let path = config.db_file_path();

        if !path.exists() {
            OpenOptions::new()
                .write(true)
                .create(true)
                .open(path)
                .map_err(|e| {
                    let err = StorageError::init_failed("Failed to create database file", e)
                        .with_details(format!("path: {}", path.display()));
                    log_event(Event::StoreInitFailed, &[("error", &err.to_string())]);
                    err
                })?;
        }

        log_event(
            Event::StoreOpened,
            &[
                ("path", &path.display().to_string()),
                ("temp_path", &config.db_temp_file_path().display().to_string()),
            ],
        );

        Ok(Self {
            budget: PollBudget::from_config(&config),
            config,
            observer: None,
        })
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the primary file.
    pub fn path(&self) -> &Path {
        self.config.db_file_path()
    }

    /// Path of the scratch file used during deletes.
    pub fn temp_path(&self) -> &Path {
        self.config.db_temp_file_path()
    }

    /// Registers a callback invoked on entry to each delete phase.
    pub fn set_phase_observer<F>(&mut self, observer: F)
    where
        F: FnMut(DeletePhase) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    /// Removes a previously registered phase observer.
    pub fn clear_phase_observer(&mut self) {
        self.observer = None;
    }

    /// Appends `line` and a terminator to the end of the primary file.
    ///
    /// Duplicate keys are not checked. The primary file is opened without
    /// `create`, so a file removed out from under the store is an error.
    pub fn append(&mut self, line: &str) -> StorageResult<()> {
        let mut record = String::with_capacity(line.len() + LINE_TERMINATOR.len());
        record.push_str(line);
        record.push_str(LINE_TERMINATOR);

        let result = OpenOptions::new()
            .append(true)
            .open(self.path())
            .and_then(|mut file| file.write_all(record.as_bytes()));

        match result {
            Ok(()) => {
                log_event_with_fields(
                    Event::LineAppended,
                    Severity::Trace,
                    &[("bytes", &record.len().to_string())],
                );
                Ok(())
            }
            Err(e) => {
                let err = StorageError::write_failed("Failed to append line", e)
                    .with_details(format!("path: {}", self.path().display()));
                warn(Event::AppendFailed, &err);
                Err(err)
            }
        }
    }

    /// Returns every line containing `key`, concatenated without a separator.
    ///
    /// Returns an empty string when nothing matches. Two lines `A-1` and `A-2`
    /// read with key `A` yield `A-1A-2`; keys are expected to match at most
    /// one line.
    pub fn read_line(&self, key: &str) -> StorageResult<String> {
        let mut found = String::new();
        self.scan(|line| {
            if line.contains(key) {
                found.push_str(&line);
            }
        })?;
        Ok(found)
    }

    /// Returns all lines in file order.
    pub fn read_all(&self) -> StorageResult<Vec<String>> {
        let mut lines = Vec::new();
        self.scan(|line| lines.push(line))?;
        Ok(lines)
    }

    fn scan<F>(&self, mut visit: F) -> StorageResult<()>
    where
        F: FnMut(String),
    {
        let result = File::open(self.path()).and_then(|file| {
            for line in BufReader::new(file).lines() {
                visit(line?);
            }
            Ok(())
        });

        result.map_err(|e| {
            let err = StorageError::read_failed("Failed to read database file", e)
                .with_details(format!("path: {}", self.path().display()));
            warn(Event::ReadFailed, &err);
            err
        })
    }

    /// Removes every line containing `key` and returns how many were removed.
    ///
    /// A key that matches nothing still rewrites the file, leaving its content
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns `StorageDeleteError` if the scan, the temp write, or any swap
    /// step fails. The primary file's state is then undefined and the temp
    /// file is not cleaned up.
    pub fn delete_line(&mut self, key: &str) -> StorageResult<usize> {
        let result = self
            .filter_to_temp(key)
            .and_then(|(removed, retained)| self.swap().map(|()| (removed, retained)));

        match result {
            Ok((removed, retained)) => {
                log_event(
                    Event::DeleteComplete,
                    &[
                        ("removed", &removed.to_string()),
                        ("retained", &retained.to_string()),
                    ],
                );
                Ok(removed)
            }
            Err(err) => {
                let err = err.with_details(format!("key: {}", key));
                warn(Event::DeleteFailed, &err);
                Err(err)
            }
        }
    }

    /// Copies every line not containing `key` to the temp file.
    ///
    /// Both handles are dropped when this returns, on success or failure.
    fn filter_to_temp(&mut self, key: &str) -> StorageResult<(usize, usize)> {
        self.notify(DeletePhase::Scanning);

        let primary = self.path();
        let temp = self.temp_path();

        let input = File::open(primary)
            .map_err(delete_error("Failed to open database file for scan", primary))?;
        let output =
            File::create(temp).map_err(delete_error("Failed to create temp file", temp))?;

        let mut writer = BufWriter::new(output);
        let mut removed = 0;
        let mut retained = 0;

        for line in BufReader::new(input).lines() {
            let line = line.map_err(delete_error("Failed to read database file", primary))?;
            if line.contains(key) {
                removed += 1;
                continue;
            }
            writer
                .write_all(line.as_bytes())
                .and_then(|()| writer.write_all(LINE_TERMINATOR.as_bytes()))
                .map_err(delete_error("Failed to write temp file", temp))?;
            retained += 1;
        }

        writer
            .flush()
            .map_err(delete_error("Failed to flush temp file", temp))?;

        Ok((removed, retained))
    }

    /// Replaces the primary file with the temp file.
    fn swap(&mut self) -> StorageResult<()> {
        let primary = self.config.db_file_path().to_path_buf();
        let temp = self.config.db_temp_file_path().to_path_buf();

        self.notify(DeletePhase::DeletePrimary);
        wait_for_file(&primary, FileCondition::Writable, &self.budget);
        fs::remove_file(&primary)
            .map_err(delete_error("Failed to remove database file", &primary))?;

        self.notify(DeletePhase::CopyTemp);
        wait_for_file(&primary, FileCondition::Absent, &self.budget);
        fs::copy(&temp, &primary).map_err(delete_error(
            "Failed to copy temp file over database file",
            &temp,
        ))?;

        self.notify(DeletePhase::DeleteTemp);
        wait_for_file(&temp, FileCondition::Writable, &self.budget);
        fs::remove_file(&temp).map_err(delete_error("Failed to remove temp file", &temp))?;

        Ok(())
    }

    fn notify(&mut self, phase: DeletePhase) {
        log_event_with_fields(
            Event::DeletePhaseEntered,
            Severity::Trace,
            &[("phase", phase.as_str())],
        );
        if let Some(observer) = self.observer.as_mut() {
            observer(phase);
        }
    }
}

/// Maps an I/O error from one delete step to `StorageDeleteError` naming `path`.
fn delete_error<'a>(
    message: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> StorageError + 'a {
    move |e| {
        StorageError::delete_failed(message, e)
            .with_details(format!("path: {}", path.display()))
    }
}

fn warn(event: Event, err: &StorageError) {
    log_event_with_fields(
        event,
        Severity::Warn,
        &[("code", err.code().code()), ("error", &err.to_string())],
    );
}
