use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default view filters applied at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewDefaults {
    pub show_inactive: bool,
    pub max_level: u32,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            show_inactive: true,
            max_level: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Input poll timeout in milliseconds (frame cadence).
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 100 }
    }
}

/// Dashboard configuration, loaded from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub view: ViewDefaults,
    pub ui: UiConfig,
    /// Log file path; defaults to the platform data dir when unset.
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConsoleConfig {
    /// Platform default location: `<config-dir>/downline/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("downline").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `path` is
    /// `None`. A missing file yields the defaults; unreadable or
    /// malformed TOML is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        if !resolved.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&resolved).map_err(|source| ConfigError::Read {
            path: resolved.clone(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: resolved.clone(),
            source,
        })?;
        tracing::debug!(path = %resolved.display(), "config loaded");
        Ok(config)
    }
}
