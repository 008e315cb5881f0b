//! Common types shared by the client, the executors and the wait engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cluster command-line tool the client drives.
///
/// The subcommand vocabulary is the same for every tool; only the binary,
/// the default namespace and how elevated privileges are obtained differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Upstream Kubernetes `kubectl`
    #[default]
    Kubectl,
    /// OpenShift `oc`
    Oc,
}

impl Tool {
    /// Binary name looked up on `PATH`.
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Kubectl => "kubectl",
            Self::Oc => "oc",
        }
    }

    /// Namespace a fresh client starts in.
    pub fn default_namespace(&self) -> &'static str {
        match self {
            Self::Kubectl => "default",
            Self::Oc => "myproject",
        }
    }

    /// Whether privileged operations require logging in as another user.
    pub fn requires_admin_login(&self) -> bool {
        matches!(self, Self::Oc)
    }

    /// All supported tools.
    pub fn all() -> &'static [Tool] {
        &[Self::Kubectl, Self::Oc]
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary())
    }
}

/// Captured result of a successful tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Exit code (`None` if terminated by a signal)
    pub status: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ExecOutput {
    /// Output of a process that exited with status 0.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Captured standard output.
    pub fn out(&self) -> &str {
        &self.stdout
    }

    /// Captured standard error.
    pub fn err(&self) -> &str {
        &self.stderr
    }
}

impl From<std::process::Output> for ExecOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
