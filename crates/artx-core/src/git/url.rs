//! GitHub repository URL validation.

use serde::Serialize;

/// Literal prefix every accepted repository URL starts with.
pub const GITHUB_PREFIX: &str = "https://github.com/";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoUrlError {
    #[error("not a github url")]
    NotGitHub,
    #[error("malformed path")]
    MalformedPath,
    #[error("unsafe repository name")]
    UnsafeName(String),
}

/// A validated `https://github.com/<owner>/<repo>[...]` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitHubRepo {
    /// The URL as given (surrounding whitespace removed), passed to the clone.
    pub url: String,
    pub owner: String,
    /// Second path segment, used verbatim as the destination directory name.
    pub name: String,
}

impl GitHubRepo {
    /// Validate a repository URL and extract owner and name.
    ///
    /// Segments after the repository name (e.g. `/tree/main`) are ignored for
    /// naming but kept in the URL handed to the clone.
    pub fn parse(input: &str) -> Result<Self, RepoUrlError> {
        let url = input.trim();
        let rest = url
            .strip_prefix(GITHUB_PREFIX)
            .ok_or(RepoUrlError::NotGitHub)?;

        let mut segments = rest.split('/');
        let owner = segments.next().unwrap_or_default();
        let name = segments.next().unwrap_or_default();
        if owner.is_empty() || name.is_empty() {
            return Err(RepoUrlError::MalformedPath);
        }
        if !is_safe_repo_name(name) {
            return Err(RepoUrlError::UnsafeName(name.to_string()));
        }

        Ok(Self {
            url: url.to_string(),
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

/// GitHub repository names only contain ASCII alphanumerics, `-`, `_` and `.`.
/// `.` and `..` would escape the category directory.
fn is_safe_repo_name(name: &str) -> bool {
    name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
