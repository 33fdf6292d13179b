//! Logger façade
//!
//! A [`Logger`] is the shared handle callers log through. Each accepted
//! record is forwarded to `tracing`, appended to the session buffer, pushed
//! to the live history when enabled, and handed to any registered hooks.

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Local;
use uuid::Uuid;

use crate::config::Config;
use crate::error::Result;
use crate::hooks::Hooks;
use crate::level::Level;
use crate::logging::{
    self, format_timestamp, LiveHistory, LogEntry, SessionAccumulator, SessionWriter,
};

/// Tag written for the unrecoverable-fault path
const FATAL_TAG: &str = "FATAL";

/// Shared logging handle
pub struct Logger {
    min_level: AtomicU8,
    /// Level to restore when verbose mode is switched off
    level_before_verbose: Mutex<Option<Level>>,
    live_enabled: AtomicBool,
    default_subsystem: String,
    retention_days: u64,
    writer: Arc<SessionWriter>,
    history: SessionAccumulator,
    live: LiveHistory,
    hooks: Hooks,
}

impl Logger {
    /// Create a logger with a fresh session id
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let session_id = Uuid::new_v4().to_string().to_uppercase();
        Self::with_session_id(config, session_id)
    }

    /// Create a logger with an explicit session id
    pub fn with_session_id(config: Config, session_id: impl Into<String>) -> Result<Arc<Self>> {
        config.validate()?;

        let writer = Arc::new(SessionWriter::new(session_id, config.writer_settings()));
        let history = SessionAccumulator::new(config.file_limit, writer.clone());

        Ok(Arc::new(Self {
            min_level: AtomicU8::new(config.min_level as u8),
            level_before_verbose: Mutex::new(None),
            live_enabled: AtomicBool::new(config.enable_live_logging),
            default_subsystem: config.default_subsystem,
            retention_days: config.retention_days,
            writer,
            history,
            live: LiveHistory::new(config.file_limit),
            hooks: Hooks::new(),
        }))
    }

    /// Identifier written into session headers
    pub fn session_id(&self) -> &str {
        self.writer.session_id()
    }

    /// Subsystem used by the level shortcuts
    pub fn default_subsystem(&self) -> &str {
        &self.default_subsystem
    }

    /// Current minimum level
    pub fn min_level(&self) -> Level {
        Level::from_index(self.min_level.load(Ordering::Relaxed))
    }

    /// Change the minimum level
    pub fn set_min_level(&self, level: Level) {
        self.min_level.store(level as u8, Ordering::Relaxed);
    }

    /// Check if a record at `level` would be accepted
    pub fn is_enabled(&self, level: Level) -> bool {
        level.passes(self.min_level())
    }

    /// Switch verbose mode: on drops the minimum to `Trace`, off restores
    /// the level that was active before
    pub fn set_verbose(&self, verbose: bool) {
        let mut previous = self
            .level_before_verbose
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if verbose {
            if previous.is_none() {
                *previous = Some(self.min_level());
            }
            self.set_min_level(Level::Trace);
        } else if let Some(level) = previous.take() {
            self.set_min_level(level);
        }
    }

    /// Check if verbose mode is on
    pub fn is_verbose(&self) -> bool {
        self.level_before_verbose
            .lock()
            .map(|p| p.is_some())
            .unwrap_or(false)
    }

    /// Enable or disable feeding the live history
    pub fn set_live_logging(&self, enabled: bool) {
        self.live_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Check if the live history is being fed
    pub fn live_logging_enabled(&self) -> bool {
        self.live_enabled.load(Ordering::Relaxed)
    }

    /// Live history for viewers
    pub fn live(&self) -> &LiveHistory {
        &self.live
    }

    /// Hook registry
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Current session text, oldest line first
    pub fn history_text(&self) -> String {
        self.history.converge()
    }

    /// Number of lines buffered for the current session
    pub fn pending_lines(&self) -> usize {
        self.history.len()
    }

    /// Log `message` at `level` under `subsystem`
    #[track_caller]
    pub fn log(&self, level: Level, subsystem: &str, message: &str) {
        if !self.is_enabled(level) {
            return;
        }
        let category = category_of(Location::caller());
        self.dispatch(level, level.tag(), subsystem, &category, message);
    }

    #[track_caller]
    pub fn trace(&self, message: impl AsRef<str>) {
        self.log(Level::Trace, &self.default_subsystem, message.as_ref());
    }

    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(Level::Debug, &self.default_subsystem, message.as_ref());
    }

    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Level::Info, &self.default_subsystem, message.as_ref());
    }

    #[track_caller]
    pub fn user_event(&self, message: impl AsRef<str>) {
        self.log(Level::UserEvent, &self.default_subsystem, message.as_ref());
    }

    #[track_caller]
    pub fn performance(&self, message: impl AsRef<str>) {
        self.log(Level::Performance, &self.default_subsystem, message.as_ref());
    }

    #[track_caller]
    pub fn success(&self, message: impl AsRef<str>) {
        self.log(Level::Success, &self.default_subsystem, message.as_ref());
    }

    #[track_caller]
    pub fn notice(&self, message: impl AsRef<str>) {
        self.log(Level::Notice, &self.default_subsystem, message.as_ref());
    }

    #[track_caller]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(Level::Warning, &self.default_subsystem, message.as_ref());
    }

    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Level::Error, &self.default_subsystem, message.as_ref());
    }

    #[track_caller]
    pub fn critical(&self, message: impl AsRef<str>) {
        self.log(Level::Critical, &self.default_subsystem, message.as_ref());
    }

    #[track_caller]
    pub fn fault(&self, message: impl AsRef<str>) {
        self.log(Level::Fault, &self.default_subsystem, message.as_ref());
    }

    /// Record an unrecoverable fault, save the session, and panic
    ///
    /// Bypasses the level filter. The message hook and the fault hook run
    /// before the session is saved.
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>) -> ! {
        let message = message.as_ref();
        let subsystem = self.default_subsystem.as_str();
        let category = category_of(Location::caller());

        tracing::error!(subsystem, category = category.as_str(), "{}", message);
        let line = format_line(FATAL_TAG, subsystem, &category, message);
        self.history.add(line.clone());
        self.hooks.call_message(message);
        self.hooks.call(Level::Fault, subsystem, message);
        // Errors are reported by save_current_session; the panic goes ahead regardless
        let _ = self.save_current_session();

        panic!("{}", line);
    }

    /// Write the buffered session to its log file without clearing it
    pub fn save_current_session(&self) -> Result<PathBuf> {
        self.history.save().map_err(|e| {
            tracing::warn!("Failed to save diagnostics file: {}", e);
            e
        })
    }

    /// Write the buffered session and start a new one
    ///
    /// The buffer is only cleared if the write succeeded.
    pub fn flush_session(&self) -> Result<PathBuf> {
        self.history.flush()
    }

    /// Resolve (and create if needed) the log directory
    pub fn log_directory(&self) -> Result<PathBuf> {
        self.writer.settings().location.resolve()
    }

    /// Remove family log files older than the configured retention
    pub fn clean_old_logs(&self) -> Result<usize> {
        let directory = self.log_directory()?;
        logging::clean_old_logs(
            &directory,
            &self.writer.settings().base_file_name,
            self.retention_days,
        )
    }

    fn dispatch(&self, level: Level, tag: &str, subsystem: &str, category: &str, message: &str) {
        passthrough(level, subsystem, category, message);

        self.history.add(format_line(tag, subsystem, category, message));

        if self.live_logging_enabled() {
            self.live.push(LogEntry::new(level, subsystem, message));
        }

        self.hooks.call_message(message);
        self.hooks.call(level, subsystem, message);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("session_id", &self.session_id())
            .field("min_level", &self.min_level())
            .field("default_subsystem", &self.default_subsystem)
            .field("pending_lines", &self.pending_lines())
            .finish()
    }
}

/// `"{TAG} {timestamp} [{subsystem}] [{category}] {message}"`, tag padded to six columns
fn format_line(tag: &str, subsystem: &str, category: &str, message: &str) -> String {
    format!(
        "{:<6} {} [{}] [{}] {}",
        tag,
        format_timestamp(&Local::now()),
        subsystem,
        category,
        message
    )
}

/// Call-site category: source file stem and line, e.g. `main:42`
fn category_of(location: &Location<'_>) -> String {
    let stem = Path::new(location.file())
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNDEFINED");
    format!("{}:{}", stem, location.line())
}

/// Forward a record to `tracing`
fn passthrough(level: Level, subsystem: &str, category: &str, message: &str) {
    match level {
        Level::Trace => tracing::trace!(subsystem, category, "{}", message),
        Level::Debug => tracing::debug!(subsystem, category, "{}", message),
        Level::Info | Level::UserEvent | Level::Performance | Level::Success => {
            tracing::info!(subsystem, category, "{}", message)
        }
        Level::Notice | Level::Warning => tracing::warn!(subsystem, category, "{}", message),
        Level::Error | Level::Critical | Level::Fault => {
            tracing::error!(subsystem, category, "{}", message)
        }
    }
}
