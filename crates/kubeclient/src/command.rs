//! Command lines issued to the cluster tool.

use std::fmt;

/// An immutable command line: binary name followed by its arguments.
///
/// Namespaced commands always start with
/// `<binary> --namespace <namespace>`, followed by the subcommand and its
/// arguments verbatim. Nothing is escaped or validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    tokens: Vec<String>,
}

impl Command {
    /// Build a command scoped to `namespace`.
    pub fn namespaced<I, S>(binary: &str, namespace: &str, rest: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = vec![
            binary.to_string(),
            "--namespace".to_string(),
            namespace.to_string(),
        ];
        tokens.extend(rest.into_iter().map(Into::into));
        Self { tokens }
    }

    /// Build a command without a namespace (e.g. `oc whoami`).
    pub fn raw<I, S>(binary: &str, rest: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = vec![binary.to_string()];
        tokens.extend(rest.into_iter().map(Into::into));
        Self { tokens }
    }

    /// The binary to execute.
    pub fn binary(&self) -> &str {
        &self.tokens[0]
    }

    /// Everything after the binary name.
    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    /// The full token list, binary included.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}
