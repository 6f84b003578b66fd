//! Fixed file locations under the config directory.

use std::path::{Path, PathBuf};

use crate::config::loader::ConfigError;

/// Directory name created under the user's home directory.
pub const CONFIG_DIR_NAME: &str = ".swapctl";

/// Wallet key file.
pub const DOT_CONFIG_FILE: &str = "config.json";

/// Orderbook API key file. Must exist before any command runs.
pub const API_KEY_FILE: &str = "api_key";

/// Optional network settings file.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Resolved paths of every file the CLI reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub dir: PathBuf,
    pub dot_config: PathBuf,
    pub api_key: PathBuf,
    pub settings: PathBuf,
}

impl ConfigPaths {
    /// Paths rooted at an explicit directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            dot_config: dir.join(DOT_CONFIG_FILE),
            api_key: dir.join(API_KEY_FILE),
            settings: dir.join(SETTINGS_FILE),
            dir,
        }
    }

    /// Paths rooted at `~/.swapctl`.
    pub fn from_home() -> Result<Self, ConfigError> {
        let home = home::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::in_dir(home.join(CONFIG_DIR_NAME)))
    }

    /// Read the orderbook API key.
    ///
    /// A missing or empty file is fatal: nothing talks to the orderbook
    /// without it.
    pub fn read_api_key(&self) -> Result<String, ConfigError> {
        read_api_key(&self.api_key)
    }
}

fn read_api_key(path: &Path) -> Result<String, ConfigError> {
    let key = match std::fs::read_to_string(path) {
        Ok(content) => content.trim().to_string(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::ApiKeyMissing(path.to_path_buf()));
        }
        Err(e) => return Err(ConfigError::Io(e)),
    };

    if key.is_empty() {
        return Err(ConfigError::ApiKeyMissing(path.to_path_buf()));
    }
    Ok(key)
}
