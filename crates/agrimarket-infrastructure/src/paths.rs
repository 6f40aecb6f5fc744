//! Path management for agrimarket configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/agrimarket/        # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/agrimarket/   # Data directory
//! └── store/                   # JsonFileStore (one <key>.json per collection)
//!     ├── farmers.json
//!     ├── products.json
//!     ├── current_farmer.json
//!     ├── product_views.json
//!     └── login_history.json
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "agrimarket";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for agrimarket_core::MarketError {
    fn from(e: PathError) -> Self {
        agrimarket_core::MarketError::config(e.to_string())
    }
}

/// Platform-specific locations (XDG on Linux, the usual places elsewhere).
pub struct AgrimarketPaths;

impl AgrimarketPaths {
    /// Returns the agrimarket configuration directory (e.g. `~/.config/agrimarket/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the agrimarket data directory (e.g. `~/.local/share/agrimarket/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default store directory.
    pub fn store_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("store"))
    }
}
