//! Optional application configuration, read from `~/.santri/santri.toml`.
//!
//! ```toml
//! [app]
//! data_dir = "/srv/santri/data"
//! theme = "dark"
//! ```
//!
//! The config file only seeds startup choices (where the key-value records
//! live, the initial theme before one has been persisted); everything the
//! user changes at runtime is persisted through the key-value store instead.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SantriConfig {
    pub app: Option<AppSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppSection {
    pub data_dir: Option<String>,
    /// Initial theme when no persisted theme record exists.
    pub theme: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

fn config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".santri").join("santri.toml"))
}

impl SantriConfig {
    /// Load the config file, if one exists. `Ok(None)` means "no config",
    /// which is the common case.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse { path, source: err })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Directory holding the persisted key-value records: the configured
    /// override, or `~/.santri/data`.
    #[must_use]
    pub fn data_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = self.app.as_ref().and_then(|app| app.data_dir.as_deref()) {
            return Some(PathBuf::from(dir));
        }
        Self::default_data_dir()
    }

    #[must_use]
    pub fn default_data_dir() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".santri").join("data"))
    }
}
