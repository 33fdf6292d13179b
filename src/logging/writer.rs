//! Session file writer
//!
//! Formats a converged session and writes it to the file chosen by the
//! naming policy, either appending or replacing the file atomically.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use tempfile::NamedTempFile;

use crate::error::Result;

use super::history::SessionSink;
use super::location::LogLocation;
use super::naming::{self, AppendingMode};

/// Mode for newly created log files, readable by other users
#[cfg(unix)]
const LOG_FILE_MODE: u32 = 0o644;

/// Timestamp layout used in session headers and log lines
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Format a timestamp for log output
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// File settings a writer needs to place a session
#[derive(Debug, Clone)]
pub struct WriterSettings {
    /// Where the log directory is
    pub location: LogLocation,
    /// Family base name (`{base}.log`, `{base}-N.log`)
    pub base_file_name: String,
    /// How sessions are distributed across files
    pub mode: AppendingMode,
    /// Line threshold for [`AppendingMode::RollAtLineLimit`]
    pub line_limit: usize,
    /// Wrap each session in header and footer markers
    pub header_and_footer: bool,
}

/// Writes sessions to the log family
///
/// Saves are serialized so two threads never interleave writes into the same
/// file or race on picking the next file name.
#[derive(Debug)]
pub struct SessionWriter {
    session_id: String,
    settings: WriterSettings,
    save_lock: Mutex<()>,
}

impl SessionWriter {
    /// Create a writer for the given session
    pub fn new(session_id: impl Into<String>, settings: WriterSettings) -> Self {
        Self {
            session_id: session_id.into(),
            settings,
            save_lock: Mutex::new(()),
        }
    }

    /// Session identifier written into headers and footers
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Settings this writer was created with
    pub fn settings(&self) -> &WriterSettings {
        &self.settings
    }

    /// Wrap a session body for writing
    pub fn format_session(&self, body: &str, at: &DateTime<Local>) -> String {
        if self.settings.header_and_footer {
            format!(
                "--- LOG FOR SESSION {id} AT {ts} ---\n\n{body}\n\n--- END LOG FOR SESSION {id} ---\n",
                id = self.session_id,
                ts = format_timestamp(at),
                body = body,
            )
        } else {
            format!("{}\n", body)
        }
    }

    /// Write `session_text` to the family, returning the file it went to
    pub fn save(&self, session_text: &str) -> Result<PathBuf> {
        let _guard = self
            .save_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let directory = self.settings.location.resolve()?;
        let target = naming::resolve(
            &directory,
            &self.settings.base_file_name,
            self.settings.mode,
            self.settings.line_limit,
        );
        let path = target.path_in(&directory);
        let content = self.format_session(session_text, &Local::now());

        if target.append && path.exists() {
            append_to(&path, &content)?;
        } else {
            replace_atomically(&directory, &path, &content)?;
        }

        Ok(path)
    }
}

impl SessionSink for SessionWriter {
    fn persist(&self, session_text: &str) -> Result<PathBuf> {
        self.save(session_text)
    }
}

fn append_to(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Write into a temp file beside `path`, then rename it over `path`
fn replace_atomically(directory: &Path, path: &Path, content: &str) -> Result<()> {
    let mut temp = NamedTempFile::new_in(directory)?;
    set_log_permissions(temp.as_file(), path)?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;
    temp.persist(path)?;
    Ok(())
}

/// Temp files start out owner-only; give them the mode of the file being
/// replaced, or [`LOG_FILE_MODE`] for a new one
#[cfg(unix)]
fn set_log_permissions(file: &File, replacing: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(replacing)
        .map(|meta| meta.permissions().mode() & 0o777)
        .unwrap_or(LOG_FILE_MODE);
    file.set_permissions(fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_log_permissions(_file: &File, _replacing: &Path) -> Result<()> {
    Ok(())
}
