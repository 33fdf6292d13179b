//! Log directory resolution
//!
//! Maps a [`LogLocation`] to a concrete directory, creating it (and any
//! missing parents) when needed. Nothing here ever deletes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where log files should be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogLocation {
    /// An absolute path. If it names an existing directory the files go
    /// there; otherwise they go to its parent directory.
    Absolute { path: PathBuf },
    /// Relative to the running executable's directory, optionally in a subdirectory
    Relative {
        #[serde(default)]
        subpath: Option<PathBuf>,
    },
    /// The per-user application data directory, optionally in a subdirectory
    ApplicationSupport {
        #[serde(default)]
        subpath: Option<PathBuf>,
    },
}

impl Default for LogLocation {
    fn default() -> Self {
        LogLocation::ApplicationSupport { subpath: None }
    }
}

impl LogLocation {
    /// Resolve to an existing directory
    pub fn resolve(&self) -> Result<PathBuf> {
        match self {
            LogLocation::Absolute { path } => {
                let path = expand_home(path);
                if path.is_dir() {
                    Ok(path)
                } else {
                    let parent = path
                        .parent()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| PathBuf::from("/"));
                    ensure_dir(&parent)?;
                    Ok(parent)
                }
            }
            LogLocation::Relative { subpath } => {
                let exe_dir = executable_dir()?;
                within(exe_dir, subpath.as_deref())
            }
            LogLocation::ApplicationSupport { subpath } => {
                let data_dir = dirs::data_dir().ok_or(Error::NoDataDirectory)?;
                within(data_dir, subpath.as_deref())
            }
        }
    }
}

/// Join an optional subdirectory onto `base`, creating it if given
fn within(base: PathBuf, subpath: Option<&Path>) -> Result<PathBuf> {
    match subpath {
        Some(sub) => {
            let dir = base.join(sub);
            ensure_dir(&dir)?;
            Ok(dir)
        }
        None => Ok(base),
    }
}

/// Directory containing the running executable
pub fn executable_dir() -> Result<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .ok_or(Error::NoExecutableDirectory)
}

/// Create `dir` with intermediate directories if it does not exist
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| Error::CreateDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

fn expand_home(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}
