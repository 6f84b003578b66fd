//! Configuration loading from and saving to disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{DotConfig, Settings};
use crate::config::validation::{validate_settings, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(serde_json::Error),
    Validation(Vec<ValidationError>),
    ApiKeyMissing(PathBuf),
    NoHomeDir,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Serialize error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::ApiKeyMissing(path) => write!(
                f,
                "API key not found at {}. Request a key from the orderbook operator and save it to that file",
                path.display()
            ),
            ConfigError::NoHomeDir => write!(f, "Could not determine the home directory"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate settings from a TOML file.
///
/// A missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let settings = match fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            Settings::default()
        }
        Err(e) => return Err(ConfigError::Io(e)),
    };

    validate_settings(&settings).map_err(ConfigError::Validation)?;

    Ok(settings)
}

/// Load the wallet keys.
///
/// Absent or unparsable files yield an empty config.
pub fn load_dot_config(path: &Path) -> DotConfig {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return DotConfig::default(),
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unparsable config file");
            DotConfig::default()
        }
    }
}

/// Overwrite the wallet key file with the full config.
pub fn save_dot_config(path: &Path, config: &DotConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(ConfigError::Io)?;
    }
    let json = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    fs::write(path, json).map_err(ConfigError::Io)
}

/// Explicit handle to the persisted wallet keys.
///
/// Loaded once at startup and passed to the command handlers, which mutate
/// it field by field and then call [`ConfigStore::persist`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    config: DotConfig,
}

impl ConfigStore {
    /// Load the store from `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = load_dot_config(&path);
        Self { path, config }
    }

    /// Current in-memory config.
    pub fn config(&self) -> &DotConfig {
        &self.config
    }

    /// Mutable access to the in-memory config.
    pub fn config_mut(&mut self) -> &mut DotConfig {
        &mut self.config
    }

    /// Write the whole in-memory config back to disk.
    pub fn persist(&self) -> Result<(), ConfigError> {
        save_dot_config(&self.path, &self.config)?;
        tracing::debug!(path = %self.path.display(), "Config saved");
        Ok(())
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
