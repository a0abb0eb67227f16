//! Configuration management

use crate::error::{EncoreError, EncoreResult, ErrorContext};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoreConfig {
    pub api: ApiSettings,
    pub storage: StorageSettings,
    pub access: AccessSettings,
}

/// Backend endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL the REST paths are resolved against
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string sent on every request
    pub user_agent: String,
}

/// Durable storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding the persisted session entries
    pub data_dir: String,
}

/// Role-policy settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessSettings {
    /// Whether admins pass teacher-gated visibility checks. The backend
    /// itself checks roles strictly, so this defaults to false.
    pub admin_inherits_teacher: bool,
}

impl Default for EncoreConfig {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: "http://localhost:8000/api".to_string(),
                timeout_seconds: 30,
                user_agent: "encore/0.1".to_string(),
            },
            storage: StorageSettings {
                data_dir: "~/.encore".to_string(),
            },
            access: AccessSettings {
                admin_inherits_teacher: false,
            },
        }
    }
}

impl EncoreConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> EncoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EncoreError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: EncoreConfig = toml::from_str(&content).map_err(|e| EncoreError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> EncoreResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| EncoreError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config file location (`~/.encore/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".encore").join("config.toml"))
    }

    /// Resolve the storage directory, expanding a leading `~`
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(rest) = self.storage.data_dir.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(&self.storage.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EncoreConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.timeout_seconds, 30);
        assert!(!config.access.admin_inherits_teacher);
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = EncoreConfig::default();
        config.api.base_url = "https://school.example.com/api".to_string();
        config.access.admin_inherits_teacher = true;
        config.save_to_file(&path).unwrap();

        let loaded = EncoreConfig::from_file(&path).unwrap();
        assert_eq!(loaded.api.base_url, "https://school.example.com/api");
        assert!(loaded.access.admin_inherits_teacher);
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let err = EncoreConfig::from_file("/nonexistent/encore.toml").unwrap_err();
        assert!(matches!(err, EncoreError::Config { .. }));
    }
}
