//! Loading, saving and resetting the viewer configuration

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::ViewerConfig;

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// Owns a configuration and the file it is persisted to
#[derive(Debug)]
pub struct ConfigManager {
    config: ViewerConfig,
    config_path: PathBuf,
    dirty: bool,
}

impl ConfigManager {
    /// Load from `path`, falling back to defaults when the file is missing or unreadable
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let config_path = path.into();
        let config = Self::load_from_path(&config_path).unwrap_or_else(|| {
            tracing::info!("No usable config at {:?}, using defaults", config_path);
            ViewerConfig::new()
        });

        Self {
            config,
            config_path,
            dirty: false,
        }
    }

    fn load_from_path(path: &Path) -> Option<ViewerConfig> {
        let content = std::fs::read_to_string(path).ok()?;
        match Self::parse(&content) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file: {}", e);
                None
            }
        }
    }

    /// Parse RON text into a configuration
    pub fn parse(content: &str) -> Result<ViewerConfig, ConfigError> {
        let mut config: ViewerConfig =
            ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        if config.version < ViewerConfig::CURRENT_VERSION {
            tracing::debug!(
                "Upgrading config from version {} to {}",
                config.version,
                ViewerConfig::CURRENT_VERSION
            );
            config.version = ViewerConfig::CURRENT_VERSION;
        }
        Ok(config)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Mutable access (marks as dirty)
    pub fn config_mut(&mut self) -> &mut ViewerConfig {
        self.dirty = true;
        &mut self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the configuration back to disk if it changed
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(&self.config_path, &content).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::info!("Saved config to {:?}", self.config_path);
        self.dirty = false;
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        self.config = ViewerConfig::new();
        self.dirty = true;
    }

    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("walkthrough-config-{}-{}", std::process::id(), name))
            .join("viewer.ron")
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let manager = ConfigManager::load(temp_path("missing"));
        assert_eq!(manager.config(), &ViewerConfig::new());
        assert!(!manager.is_dirty());
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_path("roundtrip");
        let mut manager = ConfigManager::load(&path);
        manager.config_mut().camera.orbit_speed = 12.0;
        assert!(manager.is_dirty());
        manager.save().unwrap();
        assert!(!manager.is_dirty());

        let reloaded = ConfigManager::load(&path);
        assert_eq!(reloaded.config().camera.orbit_speed, 12.0);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            ConfigManager::parse("not ron at all ("),
            Err(ConfigError::Deserialize(_))
        ));
    }

    #[test]
    fn test_reset_marks_dirty() {
        let mut manager = ConfigManager::load(temp_path("reset"));
        manager.reset_to_defaults();
        assert!(manager.is_dirty());
    }
}
