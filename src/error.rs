//! Error types for session persistence and configuration

use std::io;
use std::path::PathBuf;

/// Result type for logroll operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, naming or writing log files
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to create log directory
    #[error("Failed to create log directory at {path}: {source}")]
    CreateDirectory {
        /// The path that failed to be created
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// The platform has no per-user data directory
    #[error("Could not determine the application support directory")]
    NoDataDirectory,

    /// The running executable's directory could not be determined
    #[error("Could not determine the executable directory")]
    NoExecutableDirectory,

    /// Failed to move a freshly written session file into place
    #[error("Failed to persist log file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Config file could not be parsed
    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config could not be serialized
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
