//! Schema for artx.toml.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::HostPaths;

/// Default program used for cloning.
pub const DEFAULT_CLONE_PROGRAM: &str = "git";

/// Default upper bound for a single clone.
pub const DEFAULT_CLONE_TIMEOUT_SECS: u64 = 300;

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtxConfig {
    pub paths: PathsConfig,
    pub clone: CloneConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Host installation root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    /// Host model storage root. Defaults to `<base_dir>/models`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models_dir: Option<PathBuf>,
}

/// `[clone]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloneConfig {
    pub program: PathBuf,
    pub timeout_secs: u64,
    /// Remove the partially written destination when a clone times out.
    pub cleanup_on_timeout: bool,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_CLONE_PROGRAM),
            timeout_secs: DEFAULT_CLONE_TIMEOUT_SECS,
            cleanup_on_timeout: false,
        }
    }
}

impl CloneConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ArtxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build host paths, using `fallback_base` when no base directory is configured.
    pub fn host_paths(&self, fallback_base: &Path) -> HostPaths {
        let base = self
            .paths
            .base_dir
            .clone()
            .unwrap_or_else(|| fallback_base.to_path_buf());
        let paths = HostPaths::new(base);
        match &self.paths.models_dir {
            Some(models) => paths.with_models_dir(models.clone()),
            None => paths,
        }
    }
}
