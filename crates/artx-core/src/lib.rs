//! ArtX Core Library
//!
//! Domain logic for the ArtX host nodes: listing directories under the host
//! base path and installing GitHub repositories as node packages or model
//! assets.

pub mod config;
pub mod context;
pub mod error;
pub mod git;
pub mod install;
pub mod listing;
pub mod nodes;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ArtxConfig, CloneConfig, ConfigStore, HostPaths, InstallTarget};
    pub use crate::context::AppContext;

    // Errors
    pub use crate::error::ErrorKind;

    // Install
    pub use crate::git::{GitCloner, GitHubRepo, RepoCloner};
    pub use crate::install::{InstallOutcome, InstallReport, RepoMetadata, RepositoryInstaller};
    pub use crate::types::Category;

    // Listing
    pub use crate::listing::{DirectoryListing, ListError, ModelsListing, PathLister};

    // Nodes
    pub use crate::nodes::{Node, NodeInputs, NodeOutput, NodeRegistry};
}
