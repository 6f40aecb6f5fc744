//! Configuration service implementation.
//!
//! Loads `AppConfig` from `config.toml` (by default
//! `~/.config/agrimarket/config.toml`). A missing file is not an error.

use std::fs;
use std::path::{Path, PathBuf};

use agrimarket_core::config::AppConfig;
use agrimarket_core::error::{MarketError, Result};
use tracing::{debug, info};

use crate::paths::AgrimarketPaths;

/// Configuration service bound to one config file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the platform default config file.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: AgrimarketPaths::config_file()?,
        })
    }

    /// Uses an explicit config file (e.g. from `--config`).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the configuration, falling back to defaults when the file is absent.
    pub fn load(&self) -> Result<AppConfig> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No config file, using defaults");
                return Ok(AppConfig::default());
            }
            Err(e) => {
                return Err(MarketError::config(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let config = AppConfig::from_toml_str(&content)?;
        info!(path = %self.path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Writes the configuration, creating the parent directory if needed.
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, config.to_toml_string()?)?;
        Ok(())
    }
}

/// Picks the store directory: explicit override, then config, then platform default.
pub fn resolve_store_dir(config: &AppConfig, override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = &config.data_dir {
        return Ok(dir.clone());
    }
    Ok(AgrimarketPaths::store_dir()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(service.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("nested").join("config.toml"));

        let mut config = AppConfig::default();
        config.lookup.enabled = false;
        config.data_dir = Some(temp_dir.path().join("store"));
        service.save(&config).unwrap();

        assert_eq!(service.load().unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[lookup\nenabled = maybe").unwrap();

        assert!(ConfigService::with_path(path).load().is_err());
    }

    #[test]
    fn test_store_dir_precedence() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/from/config")),
            ..AppConfig::default()
        };

        assert_eq!(
            resolve_store_dir(&config, Some(Path::new("/from/flag"))).unwrap(),
            PathBuf::from("/from/flag")
        );
        assert_eq!(
            resolve_store_dir(&config, None).unwrap(),
            PathBuf::from("/from/config")
        );
    }
}
