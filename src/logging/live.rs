//! In-memory live log history
//!
//! Keeps structured entries for an interactive viewer, trimmed to the most
//! recent `limit` records.

use std::collections::VecDeque;
use std::sync::RwLock;

use chrono::{DateTime, Local};

use crate::level::Level;

/// A single live log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Timestamp when the log was recorded
    pub timestamp: DateTime<Local>,
    /// Log level
    pub level: Level,
    /// Subsystem that produced the log
    pub subsystem: String,
    /// Log message
    pub message: String,
}

impl LogEntry {
    /// Create a new log entry stamped with the current time
    pub fn new(level: Level, subsystem: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            subsystem: subsystem.into(),
            message: message.into(),
        }
    }
}

/// Thread-safe bounded history of live entries
#[derive(Debug)]
pub struct LiveHistory {
    entries: RwLock<VecDeque<LogEntry>>,
    limit: usize,
}

impl LiveHistory {
    /// Create a history that keeps at most `limit` entries (0 keeps everything)
    pub fn new(limit: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(limit.min(1024))),
            limit,
        }
    }

    /// Push a new entry, dropping the oldest ones past the limit
    pub fn push(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.write() {
            entries.push_back(entry);
            if self.limit > 0 {
                while entries.len() > self.limit {
                    entries.pop_front();
                }
            }
        }
    }

    /// Get all entries, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .read()
            .map(|e| e.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Warnings and worse, oldest first
    pub fn alerts(&self) -> Vec<LogEntry> {
        self.entries
            .read()
            .map(|e| e.iter().filter(|x| x.level.is_alert()).cloned().collect())
            .unwrap_or_default()
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the history is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_retrieve() {
        let history = LiveHistory::new(100);

        history.push(LogEntry::new(Level::Info, "test", "message 1"));
        history.push(LogEntry::new(Level::Warning, "test", "warning 1"));
        history.push(LogEntry::new(Level::Error, "test", "error 1"));

        let entries = history.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "message 1");
        assert_eq!(entries[1].message, "warning 1");
        assert_eq!(entries[2].message, "error 1");

        let alerts = history.alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].level, Level::Warning);
    }

    #[test]
    fn test_trims_to_limit_keeping_newest() {
        let history = LiveHistory::new(3);

        for i in 0..5 {
            history.push(LogEntry::new(Level::Info, "test", format!("msg {}", i)));
        }

        assert_eq!(history.len(), 3);
        let entries = history.entries();
        assert_eq!(entries[0].message, "msg 2");
        assert_eq!(entries[2].message, "msg 4");
    }

    #[test]
    fn test_zero_limit_is_unbounded() {
        let history = LiveHistory::new(0);
        for i in 0..50 {
            history.push(LogEntry::new(Level::Debug, "test", i.to_string()));
        }
        assert_eq!(history.len(), 50);

        history.clear();
        assert!(history.is_empty());
    }
}
