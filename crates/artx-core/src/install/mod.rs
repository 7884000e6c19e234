//! Installing GitHub repositories into the host's node or model directories.

pub mod installer;
pub mod outcome;
pub mod probe;

pub use installer::RepositoryInstaller;
pub use outcome::{InstallOutcome, InstallReport, UNKNOWN_ERROR};
pub use probe::{DEPENDENCY_MANIFESTS, README_FILES, RepoMetadata};

#[cfg(test)]
mod tests;
