//! Path management for manhours-cli
//!
//! ## Path Resolution Order
//!
//! 1. `MANHOURS_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory (`~/.config/manhours-cli` on Linux,
//!    `%APPDATA%\manhours-cli` on Windows, `~/Library/Application Support/manhours-cli`
//!    on macOS)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::ManhoursError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "MANHOURS_DATA_DIR";

/// Manages all paths used by manhours-cli
#[derive(Debug, Clone)]
pub struct ManhoursPaths {
    /// Base directory for all manhours-cli data
    base_dir: PathBuf,
}

impl ManhoursPaths {
    /// Create a new ManhoursPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home/config directory can be determined.
    pub fn new() -> Result<Self, ManhoursError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create ManhoursPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to groups.json (item groups and their items)
    pub fn groups_file(&self) -> PathBuf {
        self.data_dir().join("groups.json")
    }

    /// Get the path to manpower.json
    pub fn manpower_file(&self) -> PathBuf {
        self.data_dir().join("manpower.json")
    }

    /// Get the path to session.json (open working set + ledger)
    pub fn session_file(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), ManhoursError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ManhoursError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| ManhoursError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if manhours-cli has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, ManhoursError> {
    let dirs = BaseDirs::new().ok_or_else(|| {
        ManhoursError::Config("Could not determine the home directory".into())
    })?;
    Ok(dirs.config_dir().join("manhours-cli"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ManhoursPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ManhoursPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ManhoursPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.groups_file(),
            temp_dir.path().join("data").join("groups.json")
        );
        assert_eq!(
            paths.session_file(),
            temp_dir.path().join("data").join("session.json")
        );
    }
}
