//! Git operations for installing repositories.
//!
//! This module provides:
//! - Validation of GitHub repository URLs
//! - Cloning through an external git executable with a timeout

mod cloner;
mod url;

pub use cloner::{CloneError, CloneOutput, GitCloner, RepoCloner};
pub use url::{GITHUB_PREFIX, GitHubRepo, RepoUrlError};
