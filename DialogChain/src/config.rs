//! Persisted editor configuration
//!
//! Stored as JSON in the platform config directory
//! (`<config_dir>/DialogChain/config.json`). Nothing in the library reads it
//! implicitly; callers load it and pass the values they need.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Maximum number of recent files to track
const MAX_RECENT_FILES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Reference localization XML used for text lookup and the
    /// modification-mode merge. May start with `~`.
    #[serde(default)]
    pub localization_path: Option<String>,
    /// Whether new documents default to modification mode
    #[serde(default)]
    pub is_modification_default: bool,
    /// Recently opened dialogs (most recent first)
    #[serde(default)]
    pub recent_files: Vec<String>,
}

impl EditorConfig {
    /// Get the config file path
    ///
    /// # Errors
    /// Returns [`Error::ConfigDirNotFound`] if the platform has no config directory.
    pub fn config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("DialogChain").join("config.json"))
            .ok_or(Error::ConfigDirNotFound)
    }

    /// Load config from the platform config directory, or return default
    ///
    /// # Errors
    /// Returns an error if an existing config file cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path()?)
    }

    /// Save config to the platform config directory
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::config_path()?)
    }

    /// Load config from `path`. A missing file yields the default config.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(Error::file_access(path, e)),
        }
    }

    /// Save config to `path`, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::file_access(parent, e))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| Error::file_access(path, e))?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// The localization path with `~` expanded.
    #[must_use]
    pub fn resolved_localization_path(&self) -> Option<PathBuf> {
        self.localization_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
    }

    /// Add a file to the recent files list
    pub fn add_recent_file(&mut self, path: &str) {
        self.recent_files.retain(|p| p != path);
        self.recent_files.insert(0, path.to_string());
        self.recent_files.truncate(MAX_RECENT_FILES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load_from(dir.path().join("config.json")).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = EditorConfig {
            localization_path: Some("~/loca/english.xml".to_string()),
            is_modification_default: true,
            ..EditorConfig::default()
        };
        config.add_recent_file("a.lsx");
        config.save_to(&path).unwrap();
        assert_eq!(EditorConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"is_modification_default": true}"#).unwrap();
        let config = EditorConfig::load_from(&path).unwrap();
        assert!(config.is_modification_default);
        assert!(config.recent_files.is_empty());

        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            EditorConfig::load_from(&path),
            Err(Error::JsonError(_))
        ));
    }

    #[test]
    fn test_recent_files_are_bounded() {
        let mut config = EditorConfig::default();
        for i in 0..15 {
            config.add_recent_file(&format!("{i}.lsx"));
        }
        config.add_recent_file("3.lsx");
        assert_eq!(config.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(config.recent_files[0], "3.lsx");
        assert_eq!(config.recent_files[1], "14.lsx");
    }

    #[test]
    fn test_resolved_localization_path() {
        let config = EditorConfig {
            localization_path: Some("/tmp/english.xml".to_string()),
            ..EditorConfig::default()
        };
        assert_eq!(
            config.resolved_localization_path(),
            Some(PathBuf::from("/tmp/english.xml"))
        );
        let empty = EditorConfig {
            localization_path: Some("  ".to_string()),
            ..EditorConfig::default()
        };
        assert_eq!(empty.resolved_localization_path(), None);
    }
}
