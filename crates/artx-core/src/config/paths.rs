//! Host filesystem roots and install-target resolution.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::types::Category;

/// Name of the node-package directory under the host base directory.
pub const CUSTOM_NODES_DIR: &str = "custom_nodes";

/// Name of the default models directory under the host base directory.
pub const MODELS_DIR: &str = "models";

/// Filesystem roots supplied by the host environment.
///
/// Neither path is checked for existence here; callers that touch the
/// filesystem report missing directories themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostPaths {
    base_dir: PathBuf,
    models_dir: PathBuf,
}

impl HostPaths {
    /// Create host paths with the default `<base>/models` directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let models_dir = base_dir.join(MODELS_DIR);
        Self {
            base_dir,
            models_dir,
        }
    }

    /// Override the models directory.
    pub fn with_models_dir(mut self, models_dir: impl Into<PathBuf>) -> Self {
        self.models_dir = models_dir.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn custom_nodes_dir(&self) -> PathBuf {
        self.base_dir.join(CUSTOM_NODES_DIR)
    }

    /// Directory that repositories of the given category are cloned into.
    pub fn category_dir(&self, category: Category) -> PathBuf {
        match category {
            Category::NodePackages => self.custom_nodes_dir(),
            Category::ModelAssets => self.models_dir.clone(),
        }
    }
}

/// A resolved clone destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallTarget {
    pub base_directory: PathBuf,
    pub destination_path: PathBuf,
}

impl InstallTarget {
    pub fn resolve(paths: &HostPaths, category: Category, repo_name: &str) -> Self {
        let base_directory = paths.category_dir(category);
        let destination_path = base_directory.join(repo_name);
        Self {
            base_directory,
            destination_path,
        }
    }

    /// True when the destination is a direct child of the base directory.
    pub fn is_contained(&self) -> bool {
        self.destination_path.parent() == Some(self.base_directory.as_path())
            && self.destination_path.file_name().is_some()
    }
}
