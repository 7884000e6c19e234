//! Post-clone inspection of well-known metadata files.

use std::path::Path;

use serde::Serialize;

/// Dependency manifests, probed in order; the first present one wins.
pub const DEPENDENCY_MANIFESTS: [&str; 2] = ["requirements.txt", "pyproject.toml"];

/// Readme files, probed in order; the first present one wins.
pub const README_FILES: [&str; 3] = ["README.md", "readme.md", "README.txt"];

/// What the manifest probe found in a freshly cloned repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoMetadata {
    pub has_dependency_manifest: bool,
    pub dependency_file_name: Option<String>,
    pub has_readme: bool,
    pub readme_file_name: Option<String>,
}

impl RepoMetadata {
    pub fn inspect(dir: &Path) -> Self {
        let dependency = first_present(dir, &DEPENDENCY_MANIFESTS);
        let readme = first_present(dir, &README_FILES);
        Self {
            has_dependency_manifest: dependency.is_some(),
            dependency_file_name: dependency.map(str::to_string),
            has_readme: readme.is_some(),
            readme_file_name: readme.map(str::to_string),
        }
    }
}

fn first_present(dir: &Path, candidates: &[&'static str]) -> Option<&'static str> {
    candidates
        .iter()
        .copied()
        .find(|name| dir.join(name).exists())
}
