//! Directory listings under the host base and models directories.

use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::config::HostPaths;
use crate::error::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("Path does not exist: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Path is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },
    #[error("Path escapes the base directory: {}", path.display())]
    OutsideBase { path: PathBuf },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ListError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ListError::NotFound { .. } | ListError::NotADirectory { .. } => {
                ErrorKind::PreconditionFailed
            }
            ListError::OutsideBase { .. } => ErrorKind::InvalidInput,
            ListError::Io { .. } => ErrorKind::UnexpectedFailure,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ListError::NotFound { path }
            | ListError::NotADirectory { path }
            | ListError::OutsideBase { path }
            | ListError::Io { path, .. } => path,
        }
    }
}

/// Point-in-time snapshot of a directory's immediate children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryListing {
    pub requested_path: String,
    pub resolved_path: PathBuf,
    pub directories: Vec<String>,
    pub files: Vec<String>,
}

impl DirectoryListing {
    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    pub fn render(&self) -> String {
        if self.is_empty() {
            return format!("{} is empty", self.resolved_path.display());
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "Contents of {} ({}):",
            self.resolved_path.display(),
            self.requested_path
        );
        if !self.directories.is_empty() {
            let _ = writeln!(out, "Directories ({}):", self.directory_count());
            for name in &self.directories {
                let _ = writeln!(out, "- {}", name);
            }
        }
        if !self.files.is_empty() {
            let _ = writeln!(out, "Files ({}):", self.file_count());
            for name in &self.files {
                let _ = writeln!(out, "- {}", name);
            }
        }
        let _ = write!(
            out,
            "\nTotal: {} directories, {} files",
            self.directory_count(),
            self.file_count()
        );
        out
    }
}

/// Subdirectories of the host models directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelsListing {
    pub models_dir: PathBuf,
    pub directories: Vec<String>,
}

impl ModelsListing {
    pub fn render(&self) -> String {
        if self.directories.is_empty() {
            return "Models directory is empty".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "Models directory ({}) contains:",
            self.models_dir.display()
        );
        for name in &self.directories {
            let _ = writeln!(out, "- {}", name);
        }
        let _ = write!(out, "\nTotal: {} directories", self.directories.len());
        out
    }
}

/// Lists directories relative to the host base directory.
#[derive(Debug, Clone)]
pub struct PathLister {
    paths: HostPaths,
}

impl PathLister {
    pub fn new(paths: HostPaths) -> Self {
        Self { paths }
    }

    /// Resolve a path against the base directory; empty or `.` is the base itself.
    ///
    /// Absolute paths and `..` components are rejected so a listing never
    /// leaves the base directory.
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf, ListError> {
        let relative = Path::new(relative_path.trim());
        let escapes = relative.components().any(|component| {
            matches!(
                component,
                Component::RootDir | Component::Prefix(_) | Component::ParentDir
            )
        });
        if escapes {
            return Err(ListError::OutsideBase {
                path: relative.to_path_buf(),
            });
        }
        if relative.as_os_str().is_empty() || relative == Path::new(".") {
            Ok(self.paths.base_dir().to_path_buf())
        } else {
            Ok(self.paths.base_dir().join(relative))
        }
    }

    pub fn list(&self, relative_path: &str) -> Result<DirectoryListing, ListError> {
        let resolved = self.resolve(relative_path)?;
        tracing::debug!(requested = relative_path, resolved = %resolved.display(), "listing directory");

        let (directories, files) = read_children(&resolved)?;
        let requested_path = match relative_path.trim() {
            "" => ".".to_string(),
            other => other.to_string(),
        };

        Ok(DirectoryListing {
            requested_path,
            resolved_path: resolved,
            directories,
            files,
        })
    }

    /// List the subdirectories of the models directory; plain files are skipped.
    pub fn list_models(&self) -> Result<ModelsListing, ListError> {
        let models_dir = self.paths.models_dir().to_path_buf();
        let (directories, _) = read_children(&models_dir)?;
        Ok(ModelsListing {
            models_dir,
            directories,
        })
    }
}

/// Read the immediate children of `dir`, split into sorted directory and file names.
fn read_children(dir: &Path) -> Result<(Vec<String>, Vec<String>), ListError> {
    let metadata = match std::fs::metadata(dir) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ListError::NotFound {
                path: dir.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ListError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };
    if !metadata.is_dir() {
        return Err(ListError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let io_err = |source: std::io::Error| ListError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut directories = Vec::new();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        // Path::is_dir follows symlinks; a dangling link counts as a file.
        if entry.path().is_dir() {
            directories.push(name);
        } else {
            files.push(name);
        }
    }
    directories.sort();
    files.sort();

    Ok((directories, files))
}
