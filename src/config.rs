//! Configuration management for logroll

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::level::Level;
use crate::logging::{AppendingMode, LogLocation, WriterSettings, DEFAULT_RETENTION_DAYS};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Records below this level are dropped
    #[serde(default)]
    pub min_level: Level,

    /// Subsystem used by the level shortcuts (default: "Default")
    #[serde(default = "default_subsystem")]
    pub default_subsystem: String,

    /// Base name of the log file family (default: "Log")
    #[serde(default = "default_log_file_name")]
    pub default_log_file_name: String,

    /// Feed accepted records into the live history
    #[serde(default)]
    pub enable_live_logging: bool,

    /// Where log files are written (default: application support directory)
    #[serde(default)]
    pub log_location: LogLocation,

    /// How sessions are distributed across files
    #[serde(default)]
    pub appending_mode: AppendingMode,

    /// Lines buffered before a session is flushed, and the roll threshold
    /// for line-limited files (default: 2500)
    #[serde(default = "default_file_limit")]
    pub file_limit: usize,

    /// Wrap each saved session in header and footer markers (default: true)
    #[serde(default = "default_true")]
    pub write_session_header_and_footer: bool,

    /// Age in days after which family files are removed by retention cleanup
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,
}

fn default_subsystem() -> String {
    "Default".to_string()
}

fn default_log_file_name() -> String {
    "Log".to_string()
}

fn default_file_limit() -> usize {
    2_500
}

fn default_true() -> bool {
    true
}

fn default_retention_days() -> u64 {
    DEFAULT_RETENTION_DAYS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_level: Level::default(),
            default_subsystem: default_subsystem(),
            default_log_file_name: default_log_file_name(),
            enable_live_logging: false,
            log_location: LogLocation::default(),
            appending_mode: AppendingMode::default(),
            file_limit: default_file_limit(),
            write_session_header_and_footer: default_true(),
            retention_days: default_retention_days(),
        }
    }
}

impl Config {
    /// Load configuration from the default file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from `path`, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.file_limit == 0 {
            return Err(Error::Config("file_limit must be greater than 0".to_string()));
        }
        if self.default_log_file_name.is_empty() {
            return Err(Error::Config(
                "default_log_file_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings for the session writer
    pub fn writer_settings(&self) -> WriterSettings {
        WriterSettings {
            location: self.log_location.clone(),
            base_file_name: self.default_log_file_name.clone(),
            mode: self.appending_mode,
            line_limit: self.file_limit,
            header_and_footer: self.write_session_header_and_footer,
        }
    }
}

/// Get the base configuration directory (`<config dir>/logroll`)
/// Falls back to ./.logroll if the platform config directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine config directory, using current directory");
        PathBuf::from(".logroll")
    })
}

/// Try to get the base configuration directory
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("logroll"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_subsystem, "Default");
        assert_eq!(config.default_log_file_name, "Log");
        assert_eq!(config.file_limit, 2_500);
        assert!(config.write_session_header_and_footer);
        assert!(!config.enable_live_logging);
        assert_eq!(config.appending_mode, AppendingMode::AppendToExisting);
        assert_eq!(
            config.log_location,
            LogLocation::ApplicationSupport { subpath: None }
        );
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.min_level = Level::Warning;
        config.appending_mode = AppendingMode::RollAtLineLimit;
        config.log_location = LogLocation::Relative {
            subpath: Some(PathBuf::from("logs")),
        };

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            appending_mode = "always_create_new"
            file_limit = 100

            [log_location]
            kind = "absolute"
            path = "/var/log/app"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.appending_mode, AppendingMode::AlwaysCreateNew);
        assert_eq!(parsed.file_limit, 100);
        assert_eq!(parsed.default_log_file_name, "Log");
        assert_eq!(
            parsed.log_location,
            LogLocation::Absolute {
                path: PathBuf::from("/var/log/app")
            }
        );
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let mut config = Config::default();
        config.default_subsystem = "App".to_string();
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_zero_file_limit_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "file_limit = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_config_dir_does_not_panic() {
        let dir = config_dir();
        assert!(dir.ends_with("logroll") || dir.ends_with(".logroll"));
    }
}
