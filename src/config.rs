//! Run configuration loading.
//!
//! Configuration is stored as a JSON record and merged field-by-field over
//! built-in defaults, so a partial file is valid:
//!
//! ```json
//! {
//!   "target_folder": "/home/user/Downloads",
//!   "method": "type_date",
//!   "recursive": false,
//!   "delete_empty": true,
//!   "watch_mode": false,
//!   "custom_rules": { ".xyz": "Special" }
//! }
//! ```
//!
//! The loaded value is immutable for the duration of a run; CLI overrides are
//! applied before the engine is constructed.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// All of these are fatal: they are reported before any file is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the explicitly requested path.
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),
    /// Configuration file exists but could not be parsed.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// IO error while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The target folder does not exist or is not a directory.
    #[error("target folder does not exist or is not a directory: {0}")]
    TargetMissing(PathBuf),
}

/// Organization scheme controlling the nesting order of category and date
/// segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum OrganizeMode {
    /// `{category}/{year}/{month}/`
    TypeDate,
    /// `{year}/{month}/{category}/`
    DateType,
    /// `{category}/`
    Type,
}

impl Default for OrganizeMode {
    fn default() -> Self {
        OrganizeMode::TypeDate
    }
}

/// Immutable settings for one organize run or watch session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizeConfig {
    /// Directory whose contents get organized.
    pub target_folder: PathBuf,
    /// Organization scheme.
    pub method: OrganizeMode,
    /// Scan nested directories too.
    pub recursive: bool,
    /// Remove directories left empty after moves.
    pub delete_empty: bool,
    /// Keep running and organize new files as they appear.
    pub watch_mode: bool,
    /// Extension-to-category overrides, e.g. `".xyz" -> "Special"`.
    pub custom_rules: HashMap<String, String>,
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        Self {
            target_folder: default_target(),
            method: OrganizeMode::default(),
            recursive: false,
            delete_empty: true,
            watch_mode: false,
            custom_rules: HashMap::new(),
        }
    }
}

/// Platform downloads directory, falling back to the current directory.
fn default_target() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl OrganizeConfig {
    /// Load configuration, with fallback to defaults.
    ///
    /// Lookup order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. `downsort.json` in the current directory
    /// 3. `downsort/config.json` in the platform config directory
    /// 4. Built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested file is missing, or if any
    /// found file cannot be read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from("downsort.json");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("downsort").join("config.json");
            if user_config.exists() {
                return Self::load_from_file(&user_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Checks that the target folder is usable before any file is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.target_folder.is_dir() {
            return Err(ConfigError::TargetMissing(self.target_folder.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_values() {
        let config = OrganizeConfig::default();
        assert_eq!(config.method, OrganizeMode::TypeDate);
        assert!(!config.recursive);
        assert!(config.delete_empty);
        assert!(!config.watch_mode);
        assert!(config.custom_rules.is_empty());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("config.json");
        let mut file = fs::File::create(&config_path).expect("Failed to create config");
        write!(
            file,
            r#"{{
                "target_folder": "/tmp/inbox",
                "method": "date_type",
                "recursive": true,
                "custom_rules": {{ ".xyz": "Special" }}
            }}"#
        )
        .expect("Failed to write config");

        let config = OrganizeConfig::load(Some(&config_path)).expect("Failed to load config");
        assert_eq!(config.target_folder, PathBuf::from("/tmp/inbox"));
        assert_eq!(config.method, OrganizeMode::DateType);
        assert!(config.recursive);
        // Fields absent from the file keep their defaults
        assert!(config.delete_empty);
        assert_eq!(config.custom_rules.get(".xyz"), Some(&"Special".to_string()));
    }

    #[test]
    fn test_load_missing_explicit_file_is_an_error() {
        let result = OrganizeConfig::load(Some(Path::new("/nonexistent/config.json")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_json_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "not json").expect("Failed to write config");

        let result = OrganizeConfig::load(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_missing_target() {
        let config = OrganizeConfig {
            target_folder: PathBuf::from("/nonexistent/target"),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TargetMissing(_))
        ));
    }

    #[test]
    fn test_mode_serde_names() {
        assert_eq!(
            serde_json::to_string(&OrganizeMode::TypeDate).unwrap(),
            "\"type_date\""
        );
        assert_eq!(
            serde_json::from_str::<OrganizeMode>("\"type\"").unwrap(),
            OrganizeMode::Type
        );
    }
}
