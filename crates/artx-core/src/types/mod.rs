//! Shared core types used across the installer and node layers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where a cloned repository is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Node packages, installed under `<base>/custom_nodes`.
    #[serde(rename = "custom_nodes")]
    NodePackages,
    /// Model assets, installed under the models directory.
    #[serde(rename = "models")]
    ModelAssets,
}

impl Default for Category {
    fn default() -> Self {
        Self::NodePackages
    }
}

impl Category {
    pub const ALL: [Category; 2] = [Category::NodePackages, Category::ModelAssets];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::NodePackages => "custom_nodes",
            Category::ModelAssets => "models",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "custom_nodes" | "custom-nodes" | "nodes" => Ok(Category::NodePackages),
            "models" | "model" => Ok(Category::ModelAssets),
            other => Err(format!(
                "Unknown install category: '{}'. Use 'custom_nodes' or 'models'",
                other
            )),
        }
    }
}
