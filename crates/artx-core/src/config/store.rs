//! Locating and loading artx.toml.

use std::path::{Path, PathBuf};

use super::{ArtxConfig, parser};

/// File name of the configuration document.
pub const CONFIG_FILE_NAME: &str = "artx.toml";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Store at the platform config directory (`~/.config/artx/artx.toml` on Linux).
    pub fn from_default_location() -> anyhow::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("artx");
        Ok(Self::from_path(config_dir.join(CONFIG_FILE_NAME)))
    }

    pub fn from_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the configuration; a missing file yields defaults.
    pub fn load(&self) -> anyhow::Result<ArtxConfig> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "config file not found, using defaults");
            return Ok(ArtxConfig::new());
        }
        parser::parse_artx_toml(&self.config_path)
    }
}
