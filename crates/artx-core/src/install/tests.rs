//! Tests for the install workflow, driven by an in-memory cloner.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;

use super::*;
use crate::config::HostPaths;
use crate::error::ErrorKind;
use crate::git::{CloneError, CloneOutput, RepoCloner};
use crate::types::Category;

#[derive(Debug, Clone)]
enum Behavior {
    /// Create the destination with these files.
    Succeed(Vec<&'static str>),
    Fail(&'static str),
    /// Create the destination, then report a timeout.
    TimeOut,
    Missing,
}

type CallLog = Arc<Mutex<Vec<(String, PathBuf)>>>;

#[derive(Debug)]
struct FakeCloner {
    behavior: Behavior,
    calls: CallLog,
}

impl FakeCloner {
    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: CallLog::default(),
        }
    }
}

impl RepoCloner for FakeCloner {
    fn clone_repo(&self, url: &str, destination: &Path) -> Result<CloneOutput, CloneError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), destination.to_path_buf()));
        match &self.behavior {
            Behavior::Succeed(files) => {
                std::fs::create_dir_all(destination).unwrap();
                for file in files {
                    std::fs::write(destination.join(file), "x").unwrap();
                }
                Ok(CloneOutput::default())
            }
            Behavior::Fail(stderr) => Err(CloneError::Failed {
                status: Some(128),
                stderr: stderr.to_string(),
            }),
            Behavior::TimeOut => {
                std::fs::create_dir_all(destination.join(".git")).unwrap();
                Err(CloneError::TimedOut {
                    timeout: self.timeout(),
                })
            }
            Behavior::Missing => Err(CloneError::ToolMissing {
                program: PathBuf::from("git"),
            }),
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(300)
    }
}

fn installer(temp: &TempDir, behavior: Behavior) -> (RepositoryInstaller, CallLog) {
    let cloner = FakeCloner::new(behavior);
    let calls = Arc::clone(&cloner.calls);
    let paths = HostPaths::new(temp.path().join("host"));
    (RepositoryInstaller::new(paths, Box::new(cloner)), calls)
}

#[test]
fn node_package_installs_under_custom_nodes() {
    let temp = TempDir::new().unwrap();
    let (installer, calls) = installer(&temp, Behavior::Succeed(vec!["README.md"]));

    let outcome = installer.install("https://github.com/org/cool-nodes", Category::NodePackages);

    let expected = temp.path().join("host/custom_nodes/cool-nodes");
    match &outcome {
        InstallOutcome::Success {
            destination,
            metadata,
        } => {
            assert_eq!(destination, &expected);
            assert!(metadata.has_readme);
            assert!(!metadata.has_dependency_manifest);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    let calls = calls.lock().unwrap();
    assert_eq!(
        calls.as_slice(),
        &[("https://github.com/org/cool-nodes".to_string(), expected)]
    );
}

#[test]
fn model_asset_installs_under_models_dir() {
    let temp = TempDir::new().unwrap();
    let cloner = FakeCloner::new(Behavior::Succeed(vec![]));
    let paths = HostPaths::new(temp.path().join("host")).with_models_dir(temp.path().join("m"));
    let installer = RepositoryInstaller::new(paths, Box::new(cloner));

    let outcome = installer.install("https://github.com/org/weights", Category::ModelAssets);

    assert_eq!(
        outcome,
        InstallOutcome::Success {
            destination: temp.path().join("m/weights"),
            metadata: RepoMetadata::default(),
        }
    );
}

#[test]
fn invalid_urls_never_reach_the_cloner() {
    let temp = TempDir::new().unwrap();
    let (installer, calls) = installer(&temp, Behavior::Succeed(vec![]));

    for (url, reason) in [
        ("https://gitlab.com/org/repo", "not a github url"),
        ("https://github.com/org", "malformed path"),
        ("https://github.com/org/..", "unsafe repository name"),
    ] {
        let outcome = installer.install(url, Category::NodePackages);
        assert_eq!(
            outcome,
            InstallOutcome::InvalidUrl {
                reason: reason.to_string()
            }
        );
        assert_eq!(outcome.kind(), Some(ErrorKind::InvalidInput));
    }

    assert!(calls.lock().unwrap().is_empty());
    assert!(!temp.path().join("host").exists());
}

#[test]
fn existing_destination_is_left_alone() {
    let temp = TempDir::new().unwrap();
    let (installer, calls) = installer(&temp, Behavior::Succeed(vec![]));
    let existing = temp.path().join("host/custom_nodes/repo");
    std::fs::create_dir_all(&existing).unwrap();
    std::fs::write(existing.join("keep.txt"), "mine").unwrap();

    for _ in 0..2 {
        let outcome = installer.install("https://github.com/org/repo", Category::NodePackages);
        assert_eq!(
            outcome,
            InstallOutcome::AlreadyExists {
                path: existing.clone()
            }
        );
        assert_eq!(outcome.kind(), Some(ErrorKind::PreconditionFailed));
    }

    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(
        std::fs::read_to_string(existing.join("keep.txt")).unwrap(),
        "mine"
    );
}

#[test]
fn existing_file_also_blocks_install() {
    let temp = TempDir::new().unwrap();
    let (installer, _) = installer(&temp, Behavior::Succeed(vec![]));
    let models = temp.path().join("host/models");
    std::fs::create_dir_all(&models).unwrap();
    std::fs::write(models.join("repo"), "file").unwrap();

    let outcome = installer.install("https://github.com/org/repo", Category::ModelAssets);

    assert!(matches!(outcome, InstallOutcome::AlreadyExists { .. }));
}

#[test]
fn failed_clone_carries_stderr() {
    let temp = TempDir::new().unwrap();
    let (installer, _) = installer(&temp, Behavior::Fail("fatal: repository not found"));

    let outcome = installer.install("https://github.com/org/nope", Category::NodePackages);

    assert_eq!(
        outcome,
        InstallOutcome::CloneFailed {
            stderr: "fatal: repository not found".to_string()
        }
    );
    assert_eq!(outcome.kind(), Some(ErrorKind::ExternalToolFailure));
}

#[test]
fn failed_clone_without_stderr_reports_unknown_error() {
    let temp = TempDir::new().unwrap();
    let (installer, _) = installer(&temp, Behavior::Fail("  \n"));

    let outcome = installer.install("https://github.com/org/nope", Category::NodePackages);

    assert_eq!(
        outcome,
        InstallOutcome::CloneFailed {
            stderr: UNKNOWN_ERROR.to_string()
        }
    );
}

#[test]
fn timeout_leaves_partial_checkout_by_default() {
    let temp = TempDir::new().unwrap();
    let (installer, _) = installer(&temp, Behavior::TimeOut);
    let dest = temp.path().join("host/custom_nodes/slow");

    let outcome = installer.install("https://github.com/org/slow", Category::NodePackages);

    assert_eq!(
        outcome,
        InstallOutcome::CloneTimedOut {
            timeout_secs: 300,
            partial_path: dest.clone(),
            removed: false,
        }
    );
    assert_eq!(outcome.kind(), Some(ErrorKind::Timeout));
    assert!(dest.exists());

    // The leftover directory blocks a retry.
    let retry = installer.install("https://github.com/org/slow", Category::NodePackages);
    assert!(matches!(retry, InstallOutcome::AlreadyExists { .. }));
}

#[test]
fn timeout_cleanup_removes_partial_checkout() {
    let temp = TempDir::new().unwrap();
    let (installer, _) = installer(&temp, Behavior::TimeOut);
    let installer = installer.with_cleanup_on_timeout(true);
    let dest = temp.path().join("host/custom_nodes/slow");

    let outcome = installer.install("https://github.com/org/slow", Category::NodePackages);

    assert!(matches!(
        outcome,
        InstallOutcome::CloneTimedOut { removed: true, .. }
    ));
    assert!(!dest.exists());
}

#[test]
fn missing_tool_is_distinct_from_failure() {
    let temp = TempDir::new().unwrap();
    let (installer, _) = installer(&temp, Behavior::Missing);

    let outcome = installer.install("https://github.com/org/repo", Category::NodePackages);

    assert_eq!(
        outcome,
        InstallOutcome::ToolMissing {
            program: PathBuf::from("git")
        }
    );
    assert_eq!(outcome.kind(), Some(ErrorKind::ToolUnavailable));
}

mod render_tests {
    use super::*;

    #[test]
    fn success_lists_found_files() {
        let report = InstallReport::new(
            "https://github.com/org/repo",
            Category::NodePackages,
            InstallOutcome::Success {
                destination: PathBuf::from("/host/custom_nodes/repo"),
                metadata: RepoMetadata {
                    has_dependency_manifest: true,
                    dependency_file_name: Some("requirements.txt".into()),
                    has_readme: true,
                    readme_file_name: Some("README.md".into()),
                },
            },
        );

        let text = report.render();
        assert!(text.starts_with("Installing https://github.com/org/repo into custom_nodes..."));
        assert!(text.contains("Cloned into: /host/custom_nodes/repo"));
        assert!(text.contains("Found dependency file: requirements.txt"));
        assert!(text.contains("Found readme: README.md"));
        assert!(text.ends_with("Restart the host application to load the new nodes."));
    }

    #[test]
    fn already_exists_names_the_path() {
        let report = InstallReport::new(
            "https://github.com/org/repo",
            Category::ModelAssets,
            InstallOutcome::AlreadyExists {
                path: PathBuf::from("/host/models/repo"),
            },
        );

        let text = report.render();
        assert!(text.contains("into models..."));
        assert!(text.contains("Destination already exists: /host/models/repo"));
        assert!(!report.is_success());
    }

    #[test]
    fn timeout_mentions_leftover() {
        let report = InstallReport::new(
            "https://github.com/org/repo",
            Category::NodePackages,
            InstallOutcome::CloneTimedOut {
                timeout_secs: 300,
                partial_path: PathBuf::from("/host/custom_nodes/repo"),
                removed: false,
            },
        );

        assert!(
            report
                .render()
                .contains("timed out after 300s; partial checkout left at /host/custom_nodes/repo")
        );
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(InstallOutcome::CloneFailed {
            stderr: "boom".into(),
        })
        .unwrap();
        assert_eq!(json["status"], "clone_failed");
        assert_eq!(json["stderr"], "boom");
    }
}
