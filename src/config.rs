//! Configuration handling for the profile editor

use crate::upload::FileConstraints;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment override for the object storage root
pub const STORAGE_ROOT_ENV: &str = "PROFILE_TUI_STORAGE_ROOT";
/// Environment override for the public URL prefix of stored objects
pub const PUBLIC_URL_ENV: &str = "PROFILE_TUI_PUBLIC_URL";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Directory where uploaded objects are written
    pub storage_root: Option<PathBuf>,
    /// Public URL prefix for stored objects (defaults to file:// URLs)
    pub public_base_url: Option<String>,
    /// Identity file location
    pub identity_path: Option<PathBuf>,
    /// Avatar file constraints
    pub avatar: Option<FileConstraints>,
}

#[allow(dead_code)]
impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "profile-tui", "profile-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)?;
                serde_json::from_str(&content)?
            }
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(root) = var(STORAGE_ROOT_ENV) {
            self.storage_root = Some(PathBuf::from(root));
        }
        if let Some(url) = var(PUBLIC_URL_ENV) {
            self.public_base_url = Some(url);
        }
    }

    /// Storage root, falling back to the platform data dir
    pub fn storage_root_or_default(&self) -> PathBuf {
        self.storage_root.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.data_dir().join("objects"))
                .unwrap_or_else(|| PathBuf::from("objects"))
        })
    }

    pub fn identity_path_or_default(&self) -> PathBuf {
        self.identity_path.clone().unwrap_or_else(|| {
            crate::identity::LocalIdentityProvider::default_path()
                .unwrap_or_else(|| PathBuf::from("identity.json"))
        })
    }

    pub fn avatar_constraints(&self) -> FileConstraints {
        self.avatar.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.storage_root.is_none());
        assert!(config.public_base_url.is_none());
        assert!(config.identity_path.is_none());
        assert_eq!(config.avatar_constraints(), FileConstraints::default());
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: AppConfig = serde_json::from_str("{}").unwrap();
        assert!(parsed.avatar.is_none());
    }

    #[test]
    fn test_avatar_override() {
        let json = r#"{
            "avatar": {
                "accept": ["image/png"],
                "max_size_bytes": 1024,
                "min_width": 10, "max_width": 20,
                "min_height": 10, "max_height": 20
            },
            "unknown_field": "value"
        }"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        let constraints = parsed.avatar_constraints();
        assert_eq!(constraints.accept, vec!["image/png".to_string()]);
        assert_eq!(constraints.max_width, 20);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = AppConfig {
            storage_root: Some(PathBuf::from("/from/file")),
            ..Default::default()
        };
        config.apply_env(|key| match key {
            STORAGE_ROOT_ENV => Some("/from/env".to_string()),
            PUBLIC_URL_ENV => Some("https://cdn.test".to_string()),
            _ => None,
        });
        assert_eq!(config.storage_root, Some(PathBuf::from("/from/env")));
        assert_eq!(config.public_base_url.as_deref(), Some("https://cdn.test"));
    }

    #[test]
    fn test_explicit_paths_win_over_defaults() {
        let config = AppConfig {
            storage_root: Some(PathBuf::from("/srv/objects")),
            identity_path: Some(PathBuf::from("/srv/id.json")),
            ..Default::default()
        };
        assert_eq!(config.storage_root_or_default(), PathBuf::from("/srv/objects"));
        assert_eq!(config.identity_path_or_default(), PathBuf::from("/srv/id.json"));
    }

    #[test]
    fn test_serialization_round_trip_keeps_overrides() {
        let config = AppConfig {
            public_base_url: Some("https://cdn.test".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.public_base_url, config.public_base_url);
    }

    #[test]
    fn test_load_returns_ok() {
        let result = AppConfig::load();
        assert!(result.is_ok());
    }
}
