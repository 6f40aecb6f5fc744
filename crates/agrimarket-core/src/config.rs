use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_GEOLOCATION_URL: &str = "https://ipapi.co/json/";
pub const DEFAULT_POSTAL_URL: &str = "https://api.postalpincode.in/pincode";

fn default_true() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_geolocation_url() -> String {
    DEFAULT_GEOLOCATION_URL.to_string()
}

fn default_postal_url() -> String {
    DEFAULT_POSTAL_URL.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Settings for the best-effort metadata lookups.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LookupSettings {
    /// When false, no network lookup is attempted and metadata stays "Unknown".
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Upper bound for each individual lookup.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_geolocation_url")]
    pub geolocation_url: String,
    /// Base URL; the 6-digit code is appended as a path segment.
    #[serde(default = "default_postal_url")]
    pub postal_url: String,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            timeout_ms: default_timeout_ms(),
            geolocation_url: default_geolocation_url(),
            postal_url: default_postal_url(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Application configuration, read from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Directory holding the store files. Falls back to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub lookup: LookupSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
