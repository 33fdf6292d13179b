//! Severity levels

use serde::{Deserialize, Serialize};

/// Log level of a record
///
/// `UserEvent`, `Performance` and `Success` are informational categories: they
/// filter at `Info` severity but keep their own tag and hook slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Trace,
    Debug,
    Info,
    UserEvent,
    Performance,
    Success,
    Notice,
    Warning,
    Error,
    Critical,
    Fault,
}

impl Level {
    /// Every level, in declaration order
    pub const ALL: [Level; 11] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::UserEvent,
        Level::Performance,
        Level::Success,
        Level::Notice,
        Level::Warning,
        Level::Error,
        Level::Critical,
        Level::Fault,
    ];

    /// Numeric severity used for threshold filtering
    pub fn severity(&self) -> u8 {
        match self {
            Level::Trace => 0,
            Level::Debug => 1,
            Level::Info | Level::UserEvent | Level::Performance | Level::Success => 2,
            Level::Notice => 3,
            Level::Warning => 4,
            Level::Error => 5,
            Level::Critical => 6,
            Level::Fault => 7,
        }
    }

    /// Whether a record at this level passes the given minimum
    pub fn passes(&self, min: Level) -> bool {
        self.severity() >= min.severity()
    }

    /// Fixed-width tag written at the start of each session line
    pub fn tag(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::UserEvent => "EVENT",
            Level::Performance => "PERFR",
            Level::Success => "SCCSS",
            Level::Notice => "NOTICE",
            Level::Warning => "WARNG",
            Level::Error => "ERROR",
            Level::Critical => "CRITCL",
            Level::Fault => "FAULT",
        }
    }

    /// Inverse of `level as u8`
    pub(crate) fn from_index(index: u8) -> Self {
        Level::ALL
            .get(index as usize)
            .copied()
            .unwrap_or(Level::Fault)
    }

    /// Check if this level is a warning or worse (for alerts)
    pub fn is_alert(&self) -> bool {
        self.severity() >= Level::Warning.severity()
    }
}

impl Default for Level {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Level::Debug
        } else {
            Level::Info
        }
    }
}
