//! JSON settings file on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::SettingsError;
use super::model::Settings;

/// File name used under the home directory.
const DEFAULT_FILE_NAME: &str = ".bluebikes_config.json";

/// Reads and writes [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.bluebikes_config.json`, or the current directory when there is no
    /// home directory.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME))
    }

    /// Load settings. A missing file yields the defaults.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents).map_err(|e| SettingsError::Json {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Write settings, blanking the API key unless it should be remembered.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let io_error = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(&settings.persisted()).map_err(|e| {
            SettingsError::Json {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;

        std::fs::write(&self.path, json).map_err(io_error)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
