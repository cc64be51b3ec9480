//! Timestamped, append-only activity log.

use std::fmt;

use chrono::{DateTime, Local};

use parley_shared::constants::LOG_TIME_FORMAT;

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Local wall-clock time of the append
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format(LOG_TIME_FORMAT),
            self.message
        )
    }
}

/// Entries are never mutated or removed; the log lives as long as the session.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `message` with the current local time and append it.
    pub fn append(&mut self, message: impl Into<String>) -> &LogEntry {
        self.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
        })
    }

    fn push(&mut self, entry: LogEntry) -> &LogEntry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
