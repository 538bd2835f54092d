//! Bounded liveness poll
//!
//! Some filesystems do not make a delete or create visible to the very next
//! operation. Before each step of the swap that depends on the previous one,
//! the store checks a file predicate, sleeping `interval` between checks, at
//! most `max_attempts` times.
//!
//! The poll never fails. When the budget runs out it reports `GaveUp` and the
//! caller issues the dependent operation anyway; any real problem surfaces
//! as that operation's I/O error.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::config::StoreConfig;
use crate::observability::{log_event_with_fields, Event, Severity};

/// Filesystem predicates the delete protocol waits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCondition {
    /// File exists and is not read-only
    Writable,
    /// Nothing exists at the path
    Absent,
}

impl FileCondition {
    /// Evaluates the predicate against the current filesystem state.
    pub fn holds(self, path: &Path) -> bool {
        match self {
            FileCondition::Writable => fs::metadata(path)
                .map(|m| m.is_file() && !m.permissions().readonly())
                .unwrap_or(false),
            FileCondition::Absent => !path.exists(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileCondition::Writable => "writable",
            FileCondition::Absent => "absent",
        }
    }
}

/// How long one poll may wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget {
    interval: Duration,
    max_attempts: u64,
}

impl PollBudget {
    pub fn new(interval: Duration, max_attempts: u64) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Budget of `wait_ms / unit_ms` sleeps of `unit_ms` each.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(
            Duration::from_millis(config.unit_sleep_time_ms()),
            config.max_poll_attempts(),
        )
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u64 {
        self.max_attempts
    }
}

/// Result of one poll. `sleeps` counts how many intervals were slept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Satisfied { sleeps: u64 },
    GaveUp { sleeps: u64 },
}

impl PollOutcome {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, PollOutcome::Satisfied { .. })
    }

    pub fn sleeps(&self) -> u64 {
        match *self {
            PollOutcome::Satisfied { sleeps } | PollOutcome::GaveUp { sleeps } => sleeps,
        }
    }
}

/// Checks `predicate`, sleeping between checks, until it holds or the
/// budget is spent. The predicate is evaluated at most `max_attempts + 1`
/// times.
pub fn poll_until<F>(budget: &PollBudget, mut predicate: F) -> PollOutcome
where
    F: FnMut() -> bool,
{
    let mut sleeps = 0;
    loop {
        if predicate() {
            return PollOutcome::Satisfied { sleeps };
        }
        if sleeps >= budget.max_attempts {
            return PollOutcome::GaveUp { sleeps };
        }
        thread::sleep(budget.interval);
        sleeps += 1;
    }
}

/// Waits for `condition` to hold on `path`. Logs a warning on give-up.
pub fn wait_for_file(path: &Path, condition: FileCondition, budget: &PollBudget) -> PollOutcome {
    let outcome = poll_until(budget, || condition.holds(path));
    if let PollOutcome::GaveUp { sleeps } = outcome {
        log_event_with_fields(
            Event::PollGaveUp,
            Severity::Warn,
            &[
                ("condition", condition.as_str()),
                ("path", &path.display().to_string()),
                ("sleeps", &sleeps.to_string()),
            ],
        );
    }
    outcome
}
