/// Runtime configuration for the tracker server
///
/// Settings come from the command line (see `main.rs`) and are resolved here
/// into a validated `Config`. The database location falls back through a
/// chain of per-user directories until one is writable.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analytics::{check_window, DEFAULT_WINDOW_DAYS};
use crate::domain::WeekStart;

/// Directory name used under home and the current directory
const HIDDEN_DIR: &str = ".life_tracker";
/// Directory name used under the platform data and config directories
const PLATFORM_DIR: &str = "life_tracker";
const DATABASE_FILE: &str = "tracker.db";

/// Errors that can occur while resolving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Cannot prepare database location {path}: {source}")]
    Location {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolved server settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    /// Trailing window used by the analytics snapshot
    pub window_days: u32,
    /// First day of the week in the calendar month grid
    pub week_start: WeekStart,
}

impl Config {
    /// Settings with defaults for everything but the database path
    pub fn new(database_path: PathBuf) -> Self {
        Self { database_path, window_days: DEFAULT_WINDOW_DAYS, week_start: WeekStart::default() }
    }

    pub fn with_window_days(mut self, window_days: u32) -> Result<Self, ConfigError> {
        self.window_days = check_window(window_days).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(self)
    }

    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    /// Use `database` if given (creating its parent directory), otherwise
    /// the first writable default location
    pub fn resolve_database_path(database: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        match database {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    create_dir(parent)?;
                }
                Ok(path)
            }
            None => default_database_path(),
        }
    }
}

/// Get the default database path with robust fallback strategy
///
/// Tries home, the platform data directory, the platform config directory
/// and the current directory in that order, then the temp directory.
pub fn default_database_path() -> Result<PathBuf, ConfigError> {
    let candidates = [
        dirs::home_dir().map(|p| p.join(HIDDEN_DIR)),
        dirs::data_dir().map(|p| p.join(PLATFORM_DIR)),
        dirs::config_dir().map(|p| p.join(PLATFORM_DIR)),
        std::env::current_dir().ok().map(|p| p.join(HIDDEN_DIR)),
    ];

    for dir in candidates.iter().flatten() {
        if is_writable_dir(dir) {
            return Ok(dir.join(DATABASE_FILE));
        }
        tracing::debug!("Skipping unwritable database directory {}", dir.display());
    }

    let temp = std::env::temp_dir().join(PLATFORM_DIR);
    create_dir(&temp)?;
    tracing::warn!("Using temporary directory for database: {}", temp.display());
    Ok(temp.join(DATABASE_FILE))
}

/// Create `dir` if needed and check a file can be written inside it
fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let marker = dir.join(".write_check");
    match std::fs::write(&marker, b"ok") {
        Ok(()) => {
            let _ = std::fs::remove_file(&marker);
            true
        }
        Err(_) => false,
    }
}

fn create_dir(dir: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(dir).map_err(|source| ConfigError::Location { path: dir.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("tracker.db"));
        assert_eq!(config.window_days, 30);
        assert_eq!(config.week_start, WeekStart::Sunday);
    }

    #[test]
    fn test_window_bounds_rejected() {
        let config = Config::new(PathBuf::from("tracker.db"));
        assert!(matches!(config.with_window_days(0), Err(ConfigError::Invalid(_))));

        let config = Config::new(PathBuf::from("tracker.db"));
        assert!(matches!(config.with_window_days(u32::MAX), Err(ConfigError::Invalid(_))));

        let config = Config::new(PathBuf::from("tracker.db")).with_window_days(7).unwrap();
        assert_eq!(config.window_days, 7);
    }

    #[test]
    fn test_explicit_path_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("life.db");

        let resolved = Config::resolve_database_path(Some(path.clone())).unwrap();
        assert_eq!(resolved, path);
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_writable_dir_leaves_no_marker() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_writable_dir(&dir.path().join("data")));
        assert!(!dir.path().join("data").join(".write_check").exists());
    }
}
