//! End-to-end install tests against real and stand-in git executables.

mod support;

use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;

use artx_core::config::{ArtxConfig, HostPaths};
use artx_core::context::AppContext;
use artx_core::git::GitCloner;
use artx_core::install::{InstallOutcome, RepositoryInstaller};
use artx_core::types::Category;

use support::git::{git_available, init_fixture_repo};

/// Installer whose git rewrites `https://github.com/` to a local fixture root.
fn offline_installer(host: &Path, fixtures: &Path) -> RepositoryInstaller {
    let cloner = GitCloner::new("git", Duration::from_secs(60)).with_config(
        format!("url.file://{}/.insteadOf", fixtures.display()),
        "https://github.com/",
    );
    RepositoryInstaller::new(HostPaths::new(host), Box::new(cloner))
}

#[test]
fn clones_fixture_repository_and_probes_metadata() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let temp = TempDir::new().unwrap();
    let fixtures = temp.path().join("fixtures");
    init_fixture_repo(
        &fixtures.join("acme/fancy-nodes"),
        &[
            ("pyproject.toml", "[project]\nname = \"fancy\"\n"),
            ("requirements.txt", "numpy\n"),
            ("readme.md", "# Fancy\n"),
            ("__init__.py", ""),
        ],
    );
    let host = temp.path().join("host");

    let outcome = offline_installer(&host, &fixtures)
        .install("https://github.com/acme/fancy-nodes", Category::NodePackages);

    let dest = host.join("custom_nodes/fancy-nodes");
    match outcome {
        InstallOutcome::Success {
            destination,
            metadata,
        } => {
            assert_eq!(destination, dest);
            assert_eq!(
                metadata.dependency_file_name.as_deref(),
                Some("requirements.txt")
            );
            assert_eq!(metadata.readme_file_name.as_deref(), Some("readme.md"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(dest.join(".git").is_dir());
    assert!(dest.join("__init__.py").is_file());
}

#[test]
fn clone_of_missing_repository_reports_git_stderr() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let temp = TempDir::new().unwrap();
    let fixtures = temp.path().join("fixtures");
    std::fs::create_dir_all(&fixtures).unwrap();
    let host = temp.path().join("host");

    let outcome = offline_installer(&host, &fixtures)
        .install("https://github.com/acme/does-not-exist", Category::ModelAssets);

    match outcome {
        InstallOutcome::CloneFailed { stderr } => assert!(!stderr.is_empty()),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn missing_git_program_is_tool_missing() {
    let temp = TempDir::new().unwrap();
    let mut config = ArtxConfig::new();
    config.clone.program = temp.path().join("bin/not-git");
    let ctx = AppContext::from_config(&config, temp.path());

    let outcome = ctx
        .installer()
        .install("https://github.com/acme/repo", Category::NodePackages);

    assert!(matches!(outcome, InstallOutcome::ToolMissing { .. }));
    assert!(!temp.path().join("custom_nodes/repo").exists());
}

#[cfg(unix)]
mod fake_git {
    use super::*;
    use crate::support::git::fake_git;

    fn ctx_with_program(temp: &TempDir, body: &str, timeout_secs: u64, cleanup: bool) -> AppContext {
        let mut config = ArtxConfig::new();
        config.paths.base_dir = Some(temp.path().join("host"));
        config.clone.program = fake_git(&temp.path().join("bin"), body);
        config.clone.timeout_secs = timeout_secs;
        config.clone.cleanup_on_timeout = cleanup;
        AppContext::from_config(&config, temp.path())
    }

    #[test]
    fn timeout_keeps_partial_directory_by_default() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_with_program(&temp, "mkdir -p \"$3/.git\"\nexec sleep 30", 1, false);

        let report = ctx
            .installer()
            .install_report("https://github.com/acme/slow", Category::NodePackages);

        let dest = temp.path().join("host/custom_nodes/slow");
        assert_eq!(
            report.outcome,
            InstallOutcome::CloneTimedOut {
                timeout_secs: 1,
                partial_path: dest.clone(),
                removed: false,
            }
        );
        assert!(dest.exists());
        assert!(report.render().contains("partial checkout left at"));
    }

    #[test]
    fn timeout_cleanup_removes_partial_directory() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_with_program(&temp, "mkdir -p \"$3/.git\"\nexec sleep 30", 1, true);

        let outcome = ctx
            .installer()
            .install("https://github.com/acme/slow", Category::ModelAssets);

        assert!(matches!(
            outcome,
            InstallOutcome::CloneTimedOut { removed: true, .. }
        ));
        assert!(!temp.path().join("host/models/slow").exists());
    }

    #[test]
    fn non_zero_exit_without_output_is_unknown_error() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_with_program(&temp, "exit 1", 30, false);

        let outcome = ctx
            .installer()
            .install("https://github.com/acme/repo", Category::NodePackages);

        assert_eq!(
            outcome,
            InstallOutcome::CloneFailed {
                stderr: "unknown error".to_string()
            }
        );
    }

    #[test]
    fn receives_clone_url_and_destination() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_with_program(
            &temp,
            "[ \"$1\" = clone ] || exit 2\nmkdir -p \"$3\"\necho \"$2\" > \"$3/README.txt\"",
            30,
            false,
        );

        let outcome = ctx.installer().install(
            "https://github.com/acme/tools/tree/main",
            Category::NodePackages,
        );

        let dest = temp.path().join("host/custom_nodes/tools");
        assert!(outcome.is_success(), "{outcome:?}");
        assert_eq!(
            std::fs::read_to_string(dest.join("README.txt")).unwrap().trim(),
            "https://github.com/acme/tools/tree/main"
        );
    }
}
