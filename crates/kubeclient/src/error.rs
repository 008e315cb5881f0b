//! Error types for cluster client operations.
//!
//! Errors are categorized so the wait engine can tell "the resource is not
//! there yet" apart from "the tool failed", and so callers get actionable
//! feedback. Output from the cluster tool is classified in exactly one place,
//! [`Error::from_command_output`].

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::command::Command;

/// Result type for cluster client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of client errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The targeted resource does not exist (expected while polling)
    NotFound,
    /// The cluster tool exited abnormally or could not be started
    Execution,
    /// A descriptor path is missing or unreadable
    Path,
    /// A wait ran out of budget
    Timeout,
    /// Invalid client or wait configuration
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::NotFound => "Resource not found",
            Self::Execution => "Cluster tool failed",
            Self::Path => "Descriptor path problem",
            Self::Timeout => "Timed out waiting for resource",
            Self::Config => "Invalid configuration",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::NotFound => "Check the resource type, name and namespace",
            Self::Execution => "Inspect the captured stderr of the failed command",
            Self::Path => "Verify the descriptor files or directories exist",
            Self::Timeout => "Describe the resource and check its events, or raise the timeout",
            Self::Config => "Check the config file and command-line settings",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A single descriptor file that failed during a batch apply.
#[derive(Debug)]
pub struct BatchFailure {
    /// Descriptor file the subcommand was applied to
    pub path: PathBuf,
    /// Why the invocation failed
    pub error: Error,
}

/// Errors that can occur while driving the cluster tool.
#[derive(Debug, Error)]
pub enum Error {
    /// The targeted resource does not exist
    #[error("resource not found: {stderr}")]
    NotFound {
        /// Rendered command line that reported the missing resource
        command: String,
        /// Standard error output of the tool
        stderr: String,
    },

    /// The server does not know the requested resource type
    #[error("unknown resource type ({command}): {stderr}")]
    UnknownResourceType {
        /// Rendered command line
        command: String,
        /// Standard error output of the tool
        stderr: String,
    },

    /// The tool exited abnormally for any other reason
    #[error("command failed ({command}): {stderr}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit code, if the process exited normally
        status: Option<i32>,
        /// Standard error output of the tool
        stderr: String,
    },

    /// The tool binary could not be started at all
    #[error("failed to execute {binary}: {source}")]
    Spawn {
        /// Binary that could not be started
        binary: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The tool binary is not on `PATH`
    #[error("{0} not found on PATH")]
    ToolNotFound(String),

    /// A top-level batch path does not exist
    #[error("no such file or directory: {}", .0.display())]
    PathNotFound(PathBuf),

    /// A directory of a descriptor tree could not be listed
    #[error("failed to read descriptor tree at {}: {source}", .path.display())]
    ReadDir {
        /// Path that could not be listed
        path: PathBuf,
        /// Underlying traversal error
        #[source]
        source: walkdir::Error,
    },

    /// One or more descriptor files failed during a batch apply.
    ///
    /// Displays the first failure in traversal order; every failure is kept.
    #[error("{}", batch_message(.failures))]
    Batch {
        /// Failures in traversal order (never empty)
        failures: Vec<BatchFailure>,
    },

    /// A wait ran out of budget
    #[error("timed out after {timeout:?} waiting for {what}")]
    Timeout {
        /// Resource type and name being waited on
        what: String,
        /// Budget that elapsed
        timeout: Duration,
    },

    /// Resource state did not have the expected shape
    #[error("unexpected resource state: {0}")]
    InvalidState(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Prefix the API server puts on errors for a missing resource.
const NOT_FOUND_MARKER: &str = "Error from server (NotFound)";

/// Reported when the resource type itself is unknown to the server.
const UNKNOWN_TYPE_MARKER: &str = "doesn't have a resource type";

fn batch_message(failures: &[BatchFailure]) -> String {
    match failures.first() {
        Some(first) if failures.len() == 1 => {
            format!("{}: {}", first.path.display(), first.error)
        }
        Some(first) => format!(
            "{}: {} (and {} more failed descriptor(s))",
            first.path.display(),
            first.error,
            failures.len() - 1
        ),
        None => "batch failed".to_string(),
    }
}

impl Error {
    /// Classify a failed invocation from its exit status and stderr.
    pub fn from_command_output(command: &Command, status: Option<i32>, stderr: &str) -> Self {
        let stderr = stderr.trim().to_string();

        if stderr.contains(NOT_FOUND_MARKER) {
            return Error::NotFound {
                command: command.to_string(),
                stderr,
            };
        }

        if stderr.contains(UNKNOWN_TYPE_MARKER) {
            return Error::UnknownResourceType {
                command: command.to_string(),
                stderr,
            };
        }

        Error::CommandFailed {
            command: command.to_string(),
            status,
            stderr,
        }
    }

    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::CommandFailed { .. }
            | Error::UnknownResourceType { .. }
            | Error::Spawn { .. }
            | Error::ToolNotFound(_)
            | Error::Batch { .. } => ErrorCategory::Execution,
            Error::PathNotFound(_) | Error::ReadDir { .. } => ErrorCategory::Path,
            Error::Timeout { .. } => ErrorCategory::Timeout,
            Error::InvalidConfig(_) => ErrorCategory::Config,
            _ => ErrorCategory::Other,
        }
    }

    /// Whether the targeted resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Whether a wait ran out of budget.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// The per-file failures of a batch apply, empty for any other error.
    pub fn batch_failures(&self) -> &[BatchFailure] {
        match self {
            Error::Batch { failures } => failures,
            _ => &[],
        }
    }
}
