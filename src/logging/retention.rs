//! Log file retention management
//!
//! Handles cleanup of old files in a log family based on age.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::error::Result;

use super::naming::family_members;

/// Default retention period in days
pub const DEFAULT_RETENTION_DAYS: u64 = 7;

/// Delete family log files older than `retention_days`
///
/// Only `{base}.log` and `{base}-N.log` are considered. Returns the number
/// of files deleted.
pub fn clean_old_logs(logs_dir: &Path, base: &str, retention_days: u64) -> Result<usize> {
    if !logs_dir.exists() {
        return Ok(0);
    }

    let retention_duration = Duration::from_secs(retention_days * 24 * 60 * 60);
    let cutoff = SystemTime::now()
        .checked_sub(retention_duration)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut deleted_count = 0;

    for (path, _) in family_members(logs_dir, base) {
        let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => continue,
        };

        if modified < cutoff {
            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!("Removed old log file {}", path.display());
                    deleted_count += 1;
                }
                Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }

    Ok(deleted_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_cleanup_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        let count = clean_old_logs(temp_dir.path(), "Log", DEFAULT_RETENTION_DAYS).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_cleanup_nonexistent_dir() {
        let path = Path::new("/nonexistent/path/for/testing");
        let count = clean_old_logs(path, "Log", DEFAULT_RETENTION_DAYS).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_cleanup_keeps_recent_files() {
        let temp_dir = TempDir::new().unwrap();

        let log_file = temp_dir.path().join("Log-1.log");
        File::create(&log_file)
            .unwrap()
            .write_all(b"test log content")
            .unwrap();

        let count = clean_old_logs(temp_dir.path(), "Log", DEFAULT_RETENTION_DAYS).unwrap();
        assert_eq!(count, 0);
        assert!(log_file.exists());
    }

    #[test]
    fn test_zero_day_retention_removes_only_family() {
        let temp_dir = TempDir::new().unwrap();

        let base = temp_dir.path().join("Log.log");
        let numbered = temp_dir.path().join("Log-2.log");
        let other = temp_dir.path().join("other.log");
        let wrong_ext = temp_dir.path().join("Log.txt");
        for path in [&base, &numbered, &other, &wrong_ext] {
            File::create(path).unwrap().write_all(b"test").unwrap();
        }
        std::thread::sleep(Duration::from_millis(20));

        let count = clean_old_logs(temp_dir.path(), "Log", 0).unwrap();
        assert_eq!(count, 2);

        assert!(!base.exists());
        assert!(!numbered.exists());
        assert!(other.exists());
        assert!(wrong_ext.exists());
    }
}
