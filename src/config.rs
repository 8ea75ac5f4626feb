//! Persisted dashboard settings stored as TOML in the `.chemviz` folder.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::{app_dirs, fs_util};

/// Default filename used to store the settings.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable that replaces the configured backend base URL.
pub const API_BASE_ENV: &str = "CHEMVIZ_API_BASE";

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";

/// Top-level settings file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub auth: AuthSettings,
}

/// Where the backend lives and how patiently we talk to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Backend origin including the `/api/` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Endpoint hit once at startup to validate credentials.
    #[serde(default = "default_probe_path")]
    pub probe_path: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Applied to both reads and writes.
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            probe_path: default_probe_path(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

impl ApiSettings {
    /// Parse the base URL, forcing a trailing slash so relative joins keep the prefix.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        normalize_base_url(&self.base_url)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

/// Credential gate tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSettings {
    /// How many rejected (401) credential pairs are tolerated before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_probe_path() -> String {
    "history/".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_read_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

/// Errors that may occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config directory unavailable: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    #[error("Invalid backend URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Resolve the settings file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load settings from disk, writing a default file on first launch.
///
/// `CHEMVIZ_API_BASE` takes precedence over the stored base URL but is never
/// written back.
pub fn load_or_default() -> Result<AppSettings, ConfigError> {
    let path = config_path()?;
    let mut settings = if path.exists() {
        load_from(&path)?
    } else {
        let defaults = AppSettings::default();
        save_to_path(&defaults, &path)?;
        tracing::info!("Wrote default settings to {}", path.display());
        defaults
    };
    if let Ok(base) = std::env::var(API_BASE_ENV) {
        if !base.trim().is_empty() {
            settings.api.base_url = base.trim().to_string();
        }
    }
    settings.api.parsed_base_url()?;
    Ok(settings)
}

/// Read settings from a specific TOML file.
pub fn load_from(path: &Path) -> Result<AppSettings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Write settings to a specific path, replacing any previous contents atomically.
pub fn save_to_path(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    fs_util::atomic_write(path, data.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a backend base URL and make sure it ends with `/`.
pub fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason,
    };
    let mut url = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
