//! Executors run command lines against the cluster tool.
//!
//! The [`Executor`] trait is the seam between the client and the outside
//! world:
//! - [`ProcessExecutor`] spawns the real binary
//! - [`MockExecutor`] answers from a script and records every call
//!
//! # Testing
//!
//! ```
//! use kubeclient::executor::{Executor, MockExecutor, MockResponse};
//! use kubeclient::Command;
//!
//! let mock = MockExecutor::new();
//! mock.on("get pod web-0", [MockResponse::NotFound]);
//!
//! let cmd = Command::namespaced("kubectl", "default", ["get", "pod", "web-0"]);
//! assert!(mock.execute(&cmd, None).unwrap_err().is_not_found());
//! assert_eq!(mock.calls().len(), 1);
//! ```

use crate::command::Command;
use crate::error::{Error, Result};
use crate::types::ExecOutput;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

/// Runs command lines and classifies their failures.
pub trait Executor: Send + Sync {
    /// Run `command`, piping `stdin` to it when given.
    ///
    /// A nonzero exit is reported as [`Error::NotFound`] when the tool says the
    /// resource is missing and as [`Error::CommandFailed`] otherwise.
    fn execute(&self, command: &Command, stdin: Option<&str>) -> Result<ExecOutput>;

    /// Check whether `binary` can be executed.
    fn is_available(&self, binary: &str) -> bool;
}

/// Executor that spawns the real cluster tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    /// Create a new ProcessExecutor.
    pub fn new() -> Self {
        Self
    }
}

impl Executor for ProcessExecutor {
    fn execute(&self, command: &Command, stdin: Option<&str>) -> Result<ExecOutput> {
        log::debug!("running: {command}");

        let mut child = std::process::Command::new(command.binary())
            .args(command.args())
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Spawn {
                binary: command.binary().to_string(),
                source,
            })?;

        // Feed stdin from another thread so a chatty child can't fill its
        // stdout pipe while we are still writing.
        let writer = match (stdin, child.stdin.take()) {
            (Some(input), Some(mut pipe)) => {
                let input = input.to_string();
                Some(thread::spawn(move || pipe.write_all(input.as_bytes())))
            }
            _ => None,
        };

        let output = ExecOutput::from(child.wait_with_output()?);
        let written = match writer.map(thread::JoinHandle::join) {
            None => Ok(()),
            Some(Ok(written)) => written,
            Some(Err(_)) => return Err(Error::InvalidState("stdin writer panicked".to_string())),
        };

        check_output(command, output, written)
    }

    fn is_available(&self, binary: &str) -> bool {
        which::which(binary).is_ok()
    }
}

/// Classify a finished invocation.
///
/// A failed exit wins over a stdin write error, since a child that exits
/// early closes its end of the pipe.
fn check_output(command: &Command, output: ExecOutput, written: io::Result<()>) -> Result<ExecOutput> {
    if !output.success() {
        if let Err(e) = written {
            log::debug!("stdin of {command} not fully written: {e}");
        }
        return Err(Error::from_command_output(
            command,
            output.status,
            &output.stderr,
        ));
    }

    written?;
    Ok(output)
}

/// Scripted answer of a [`MockExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Exit 0 with this stdout
    Ok(String),
    /// Exit 1 reporting a missing resource
    NotFound,
    /// Exit 1 with this stderr
    Fail(String),
}

impl MockResponse {
    /// Successful response with `stdout`.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self::Ok(stdout.into())
    }

    /// Failed response with `stderr`.
    pub fn fail(stderr: impl Into<String>) -> Self {
        Self::Fail(stderr.into())
    }

    fn into_result(self, command: &Command) -> Result<ExecOutput> {
        match self {
            Self::Ok(stdout) => Ok(ExecOutput::ok(stdout)),
            Self::NotFound => Err(Error::from_command_output(
                command,
                Some(1),
                "Error from server (NotFound): resource not found",
            )),
            Self::Fail(stderr) => Err(Error::from_command_output(command, Some(1), &stderr)),
        }
    }
}

#[derive(Debug)]
struct Rule {
    pattern: String,
    responses: VecDeque<MockResponse>,
}

#[derive(Debug, Default)]
struct MockState {
    rules: Vec<Rule>,
    calls: Vec<(Command, Option<String>)>,
    unavailable: bool,
}

/// In-memory executor for tests.
///
/// Each rule matches commands whose rendered form contains its pattern; the
/// first matching rule answers. A rule's responses are consumed in order and
/// the last one repeats forever. Unmatched commands succeed with empty output.
/// Clones share rules and the call log.
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    state: Arc<Mutex<MockState>>,
}

impl MockExecutor {
    /// Create a mock that succeeds on everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands containing `pattern` with `responses`.
    pub fn on(&self, pattern: &str, responses: impl IntoIterator<Item = MockResponse>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.rules.push(Rule {
            pattern: pattern.to_string(),
            responses: responses.into_iter().collect(),
        });
    }

    /// Make the availability probe fail.
    pub fn set_unavailable(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.unavailable = true;
    }

    /// Every command executed so far, in order.
    pub fn calls(&self) -> Vec<Command> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.calls.iter().map(|(cmd, _)| cmd.clone()).collect()
    }

    /// Every command rendered as a string, in order.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    /// Number of executed commands containing `pattern`.
    pub fn count(&self, pattern: &str) -> usize {
        self.call_lines()
            .iter()
            .filter(|line| line.contains(pattern))
            .count()
    }

    /// Stdin passed to each call that had one.
    pub fn stdin_log(&self) -> Vec<String> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .calls
            .iter()
            .filter_map(|(_, stdin)| stdin.clone())
            .collect()
    }
}

impl Executor for MockExecutor {
    fn execute(&self, command: &Command, stdin: Option<&str>) -> Result<ExecOutput> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .calls
            .push((command.clone(), stdin.map(ToString::to_string)));

        let line = command.to_string();
        let response = state
            .rules
            .iter_mut()
            .find(|rule| line.contains(&rule.pattern))
            .and_then(|rule| {
                if rule.responses.len() > 1 {
                    rule.responses.pop_front()
                } else {
                    rule.responses.front().cloned()
                }
            })
            .unwrap_or_else(|| MockResponse::ok(""));

        response.into_result(command)
    }

    fn is_available(&self, _binary: &str) -> bool {
        !self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unavailable
    }
}
