//! The repository install workflow.
//!
//! URL validation → destination resolution → collision check → clone →
//! manifest probe. Each step short-circuits into an [`InstallOutcome`].

use std::path::Path;

use crate::config::{CloneConfig, HostPaths, InstallTarget};
use crate::git::{CloneError, GitCloner, GitHubRepo, RepoCloner, RepoUrlError};
use crate::types::Category;

use super::outcome::{InstallOutcome, InstallReport, UNKNOWN_ERROR};
use super::probe::RepoMetadata;

#[derive(Debug)]
pub struct RepositoryInstaller {
    paths: HostPaths,
    cloner: Box<dyn RepoCloner>,
    cleanup_on_timeout: bool,
}

impl RepositoryInstaller {
    pub fn new(paths: HostPaths, cloner: Box<dyn RepoCloner>) -> Self {
        Self {
            paths,
            cloner,
            cleanup_on_timeout: false,
        }
    }

    /// Installer backed by [`GitCloner`] with the configured program and timeout.
    pub fn from_config(paths: HostPaths, config: &CloneConfig) -> Self {
        Self::new(paths, Box::new(GitCloner::from_config(config)))
            .with_cleanup_on_timeout(config.cleanup_on_timeout)
    }

    /// Remove the partial destination when a clone times out.
    pub fn with_cleanup_on_timeout(mut self, cleanup: bool) -> Self {
        self.cleanup_on_timeout = cleanup;
        self
    }

    pub fn paths(&self) -> &HostPaths {
        &self.paths
    }

    /// Validate the URL and compute where it would be cloned, without
    /// touching the filesystem.
    pub fn resolve(
        &self,
        repository_url: &str,
        category: Category,
    ) -> Result<(GitHubRepo, InstallTarget), RepoUrlError> {
        let repo = GitHubRepo::parse(repository_url)?;
        let target = InstallTarget::resolve(&self.paths, category, &repo.name);
        if !target.is_contained() {
            return Err(RepoUrlError::UnsafeName(repo.name));
        }
        Ok((repo, target))
    }

    pub fn install(&self, repository_url: &str, category: Category) -> InstallOutcome {
        let (repo, target) = match self.resolve(repository_url, category) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::warn!(url = repository_url, error = %err, "rejected repository url");
                return InstallOutcome::InvalidUrl {
                    reason: err.to_string(),
                };
            }
        };
        let destination = target.destination_path;
        tracing::debug!(
            owner = %repo.owner,
            name = %repo.name,
            destination = %destination.display(),
            "resolved install target"
        );

        // symlink_metadata so a dangling symlink still blocks the install.
        match std::fs::symlink_metadata(&destination) {
            Ok(_) => {
                tracing::warn!(path = %destination.display(), "install destination already exists");
                return InstallOutcome::AlreadyExists { path: destination };
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                return InstallOutcome::Unexpected {
                    message: format!("Failed to inspect {}: {}", destination.display(), err),
                };
            }
        }

        if let Err(err) = std::fs::create_dir_all(&target.base_directory) {
            return InstallOutcome::Unexpected {
                message: format!(
                    "Failed to create install directory {}: {}",
                    target.base_directory.display(),
                    err
                ),
            };
        }

        match self.cloner.clone_repo(&repo.url, &destination) {
            Ok(_) => {
                let metadata = RepoMetadata::inspect(&destination);
                tracing::info!(
                    url = %repo.url,
                    destination = %destination.display(),
                    "repository cloned"
                );
                InstallOutcome::Success {
                    destination,
                    metadata,
                }
            }
            Err(CloneError::Failed { status, stderr }) => {
                tracing::warn!(url = %repo.url, ?status, "clone failed");
                let stderr = if stderr.trim().is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    stderr
                };
                InstallOutcome::CloneFailed { stderr }
            }
            Err(CloneError::TimedOut { timeout }) => {
                tracing::warn!(url = %repo.url, ?timeout, "clone timed out");
                let removed = self.cleanup_on_timeout && remove_partial(&destination);
                InstallOutcome::CloneTimedOut {
                    timeout_secs: timeout.as_secs(),
                    partial_path: destination,
                    removed,
                }
            }
            Err(CloneError::ToolMissing { program }) => {
                tracing::warn!(program = %program.display(), "clone program not found");
                InstallOutcome::ToolMissing { program }
            }
            Err(err @ CloneError::Io { .. }) => InstallOutcome::Unexpected {
                message: err.to_string(),
            },
        }
    }

    /// Run [`Self::install`] and pair the outcome with its request.
    pub fn install_report(&self, repository_url: &str, category: Category) -> InstallReport {
        let outcome = self.install(repository_url, category);
        InstallReport::new(repository_url.trim(), category, outcome)
    }
}

fn remove_partial(path: &Path) -> bool {
    if !path.exists() {
        return true;
    }
    match std::fs::remove_dir_all(path) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to remove partial clone");
            false
        }
    }
}
