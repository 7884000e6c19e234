//! Failure taxonomy shared by the listing and install operations.

use serde::Serialize;

/// Broad classification of a failed operation.
///
/// Both [`crate::install::InstallOutcome`] and [`crate::listing::ListError`]
/// map onto these kinds so callers can react without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request itself is malformed (e.g. not a GitHub URL).
    InvalidInput,
    /// The filesystem is not in the state the operation requires.
    PreconditionFailed,
    /// The version-control client ran and reported failure.
    ExternalToolFailure,
    /// The version-control client did not finish in time.
    Timeout,
    /// The version-control client could not be started.
    ToolUnavailable,
    /// Anything else (permission errors, broken pipes, ...).
    UnexpectedFailure,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::PreconditionFailed => "precondition_failed",
            ErrorKind::ExternalToolFailure => "external_tool_failure",
            ErrorKind::Timeout => "timeout",
            ErrorKind::ToolUnavailable => "tool_unavailable",
            ErrorKind::UnexpectedFailure => "unexpected_failure",
        }
    }
}
