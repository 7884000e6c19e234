//! Install outcomes and their display text.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use super::probe::RepoMetadata;
use crate::error::ErrorKind;
use crate::git::GITHUB_PREFIX;
use crate::types::Category;

/// Stderr placeholder when a failed clone printed nothing.
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Result of a single install request. Every failure is a variant here;
/// nothing escapes the installer as a panic or error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstallOutcome {
    Success {
        destination: PathBuf,
        metadata: RepoMetadata,
    },
    AlreadyExists {
        path: PathBuf,
    },
    InvalidUrl {
        reason: String,
    },
    CloneFailed {
        stderr: String,
    },
    CloneTimedOut {
        timeout_secs: u64,
        partial_path: PathBuf,
        /// Whether the partial checkout was deleted after the timeout.
        removed: bool,
    },
    ToolMissing {
        program: PathBuf,
    },
    Unexpected {
        message: String,
    },
}

impl InstallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InstallOutcome::Success { .. })
    }

    /// Failure classification; `None` for success.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            InstallOutcome::Success { .. } => None,
            InstallOutcome::AlreadyExists { .. } => Some(ErrorKind::PreconditionFailed),
            InstallOutcome::InvalidUrl { .. } => Some(ErrorKind::InvalidInput),
            InstallOutcome::CloneFailed { .. } => Some(ErrorKind::ExternalToolFailure),
            InstallOutcome::CloneTimedOut { .. } => Some(ErrorKind::Timeout),
            InstallOutcome::ToolMissing { .. } => Some(ErrorKind::ToolUnavailable),
            InstallOutcome::Unexpected { .. } => Some(ErrorKind::UnexpectedFailure),
        }
    }
}

/// An outcome together with the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub url: String,
    pub category: Category,
    pub outcome: InstallOutcome,
}

impl InstallReport {
    pub fn new(url: impl Into<String>, category: Category, outcome: InstallOutcome) -> Self {
        Self {
            url: url.into(),
            category,
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Human-readable summary for display in a host panel or terminal.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Installing {} into {}...",
            self.url.trim(),
            self.category
        );

        match &self.outcome {
            InstallOutcome::Success {
                destination,
                metadata,
            } => {
                let _ = writeln!(out, "Cloned into: {}", destination.display());
                if let Some(name) = &metadata.dependency_file_name {
                    let _ = writeln!(out, "Found dependency file: {}", name);
                    let _ = writeln!(out, "Dependencies may need to be installed manually");
                }
                if let Some(name) = &metadata.readme_file_name {
                    let _ = writeln!(out, "Found readme: {}", name);
                }
                out.push_str(
                    "\nInstallation complete. Restart the host application to load the new nodes.",
                );
            }
            InstallOutcome::AlreadyExists { path } => {
                let _ = writeln!(out, "Destination already exists: {}", path.display());
                out.push_str("Delete it first to reinstall.");
            }
            InstallOutcome::InvalidUrl { reason } => {
                let _ = write!(
                    out,
                    "Invalid GitHub URL: {} (expected {}<owner>/<repo>)",
                    reason, GITHUB_PREFIX
                );
            }
            InstallOutcome::CloneFailed { stderr } => {
                let _ = write!(out, "Clone failed: {}", stderr);
            }
            InstallOutcome::CloneTimedOut {
                timeout_secs,
                partial_path,
                removed,
            } => {
                if *removed {
                    let _ = write!(
                        out,
                        "Clone timed out after {}s; partial checkout at {} was removed. Check your network connection.",
                        timeout_secs,
                        partial_path.display()
                    );
                } else {
                    let _ = write!(
                        out,
                        "Clone timed out after {}s; partial checkout left at {}. Delete it before retrying.",
                        timeout_secs,
                        partial_path.display()
                    );
                }
            }
            InstallOutcome::ToolMissing { program } => {
                let _ = write!(
                    out,
                    "{} executable not found; make sure git is installed",
                    program.display()
                );
            }
            InstallOutcome::Unexpected { message } => {
                let _ = write!(out, "Installation failed: {}", message);
            }
        }

        out
    }
}
