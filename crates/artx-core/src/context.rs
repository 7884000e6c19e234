//! Application context for unified dependency injection.

use std::path::Path;

use crate::config::{ArtxConfig, CloneConfig, HostPaths};
use crate::install::RepositoryInstaller;
use crate::listing::PathLister;
use crate::nodes::NodeRegistry;

/// Explicit host configuration handed to every service.
///
/// Frontends create this once and pass it to commands and nodes; the core
/// never reads host paths from ambient state.
#[derive(Debug, Clone)]
pub struct AppContext {
    paths: HostPaths,
    clone: CloneConfig,
}

impl AppContext {
    pub fn new(paths: HostPaths, clone: CloneConfig) -> Self {
        Self { paths, clone }
    }

    /// Build a context from a loaded config, falling back to `fallback_base`
    /// when the config names no base directory.
    pub fn from_config(config: &ArtxConfig, fallback_base: &Path) -> Self {
        Self::new(config.host_paths(fallback_base), config.clone.clone())
    }

    pub fn paths(&self) -> &HostPaths {
        &self.paths
    }

    pub fn clone_config(&self) -> &CloneConfig {
        &self.clone
    }

    pub fn path_lister(&self) -> PathLister {
        PathLister::new(self.paths.clone())
    }

    /// Installer backed by the configured git program.
    pub fn installer(&self) -> RepositoryInstaller {
        RepositoryInstaller::from_config(self.paths.clone(), &self.clone)
    }

    pub fn node_registry(&self) -> NodeRegistry {
        NodeRegistry::builtin()
    }
}
