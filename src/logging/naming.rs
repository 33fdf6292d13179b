//! Log file naming and rotation
//!
//! All files of one log live flat in a directory as a *family*:
//! `{base}.log`, `{base}-1.log`, `{base}-2.log`, ... The target for each save
//! is computed fresh from the directory listing; nothing is cached.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extension shared by every file in a family
pub const LOG_EXTENSION: &str = "log";

/// How sessions are distributed across log files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppendingMode {
    /// Every session is appended to `{base}.log`
    #[default]
    AppendToExisting,
    /// Every session gets a new numbered file
    AlwaysCreateNew,
    /// Append to the newest file until it holds `line_limit` lines, then roll
    RollAtLineLimit,
}

/// The file a session should be written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    /// File name inside the log directory
    pub file_name: String,
    /// Append to the file if it exists, instead of replacing it
    pub append: bool,
}

impl FileTarget {
    fn create(file_name: String) -> Self {
        Self {
            file_name,
            append: false,
        }
    }

    fn append(file_name: String) -> Self {
        Self {
            file_name,
            append: true,
        }
    }

    /// Full path of the target inside `directory`
    pub fn path_in(&self, directory: &Path) -> PathBuf {
        directory.join(&self.file_name)
    }
}

/// Position of a file within a family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyMember {
    /// `{base}.log`
    Base,
    /// `{base}-N.log` with N >= 1
    Numbered(u64),
}

/// `{base}.log`
pub fn base_file_name(base: &str) -> String {
    format!("{}.{}", base, LOG_EXTENSION)
}

/// `{base}-{number}.log`
pub fn numbered_file_name(base: &str, number: u64) -> String {
    format!("{}-{}.{}", base, number, LOG_EXTENSION)
}

/// Classify a path as a member of the `base` family, if it is one
pub fn classify(path: &Path, base: &str) -> Option<FamilyMember> {
    if path.extension().and_then(|e| e.to_str()) != Some(LOG_EXTENSION) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem == base {
        return Some(FamilyMember::Base);
    }

    let suffix = stem.strip_prefix(base)?.strip_prefix('-')?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match suffix.parse::<u64>() {
        Ok(n) if n >= 1 => Some(FamilyMember::Numbered(n)),
        _ => None,
    }
}

/// All family members in `directory`
///
/// A directory that cannot be listed has no members.
pub fn family_members(directory: &Path, base: &str) -> Vec<(PathBuf, FamilyMember)> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Could not list {}: {}", directory.display(), e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            classify(&path, base).map(|member| (path, member))
        })
        .collect()
}

/// Number of files in the family, base file included
pub fn count_family_files(directory: &Path, base: &str) -> usize {
    family_members(directory, base).len()
}

/// Highest N among `{base}-N.log` files, ignoring gaps
pub fn highest_numbered(directory: &Path, base: &str) -> Option<u64> {
    family_members(directory, base)
        .into_iter()
        .filter_map(|(_, member)| match member {
            FamilyMember::Numbered(n) => Some(n),
            FamilyMember::Base => None,
        })
        .max()
}

/// Count lines in a file; an unreadable file counts as empty
pub fn count_lines(path: &Path) -> usize {
    fs::read_to_string(path)
        .map(|content| content.lines().count())
        .unwrap_or(0)
}

/// Pick the file the next session goes to
///
/// In [`AppendingMode::AlwaysCreateNew`] the suffix is the number of family
/// files already present, not the highest suffix plus one. Deleting a file
/// from the middle of the sequence therefore makes the next save reuse an
/// existing name.
///
/// In [`AppendingMode::RollAtLineLimit`] a highest suffix of `u64::MAX`
/// cannot be followed, so that file keeps receiving appends past the limit.
pub fn resolve(directory: &Path, base: &str, mode: AppendingMode, line_limit: usize) -> FileTarget {
    match mode {
        AppendingMode::AppendToExisting => FileTarget::append(base_file_name(base)),

        AppendingMode::AlwaysCreateNew => match count_family_files(directory, base) {
            0 => FileTarget::create(base_file_name(base)),
            count => FileTarget::create(numbered_file_name(base, count as u64)),
        },

        AppendingMode::RollAtLineLimit => {
            if let Some(highest) = highest_numbered(directory, base) {
                let name = numbered_file_name(base, highest);
                match highest.checked_add(1) {
                    Some(next) if count_lines(&directory.join(&name)) >= line_limit => {
                        FileTarget::create(numbered_file_name(base, next))
                    }
                    _ => FileTarget::append(name),
                }
            } else {
                let name = base_file_name(base);
                let base_path = directory.join(&name);
                if !base_path.exists() {
                    FileTarget::create(name)
                } else if count_lines(&base_path) < line_limit {
                    FileTarget::append(name)
                } else {
                    FileTarget::create(numbered_file_name(base, 1))
                }
            }
        }
    }
}
