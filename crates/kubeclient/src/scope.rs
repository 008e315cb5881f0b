//! Scoped execution contexts that restore themselves on drop.
//!
//! - [`AdminScope`]: elevated privileges for the lifetime of the guard. For
//!   `oc` this logs in as the admin user and logs back in as the previous user
//!   on drop; for `kubectl` it does nothing.
//! - [`NamespaceScope`]: a temporary namespace switch on a client.
//!
//! Both restore on every exit path, including `?` returns and panics.

use crate::client::Client;
use crate::command::Command;
use crate::error::Result;
use crate::executor::Executor;
use crate::types::Tool;
use std::ops::{Deref, DerefMut};

/// Elevated-privilege context, released on drop.
pub struct AdminScope<'a> {
    executor: &'a dyn Executor,
    binary: &'static str,
    previous_user: Option<String>,
}

impl<'a> AdminScope<'a> {
    /// A scope that changes nothing.
    pub(crate) fn noop(executor: &'a dyn Executor, tool: Tool) -> Self {
        Self {
            executor,
            binary: tool.binary(),
            previous_user: None,
        }
    }

    /// Enter the admin context for `tool`.
    ///
    /// Fails without changing anything if the current user cannot be
    /// determined or the admin login is rejected.
    pub(crate) fn enter(executor: &'a dyn Executor, tool: Tool, admin_user: &str) -> Result<Self> {
        if !tool.requires_admin_login() {
            return Ok(Self::noop(executor, tool));
        }

        let binary = tool.binary();
        let previous = executor
            .execute(&Command::raw(binary, ["whoami"]), None)?
            .stdout
            .trim()
            .to_string();

        executor.execute(&Command::raw(binary, ["login", "-u", admin_user]), None)?;
        log::debug!("switched {binary} user from {previous} to {admin_user}");

        Ok(Self {
            executor,
            binary,
            previous_user: Some(previous),
        })
    }

    /// Whether this scope actually switched users.
    pub fn is_elevated(&self) -> bool {
        self.previous_user.is_some()
    }
}

impl Drop for AdminScope<'_> {
    fn drop(&mut self) {
        let Some(user) = self.previous_user.take() else {
            return;
        };

        let login = Command::raw(self.binary, ["login", "-u", user.as_str()]);
        match self.executor.execute(&login, None) {
            Ok(_) => log::debug!("restored {} user {user}", self.binary),
            Err(e) => log::warn!("failed to restore {} user {user}: {e}", self.binary),
        }
    }
}

/// Temporary namespace switch on a [`Client`].
///
/// Dereferences to the client; the previous namespace comes back on drop.
pub struct NamespaceScope<'a> {
    client: &'a mut Client,
    previous: Option<String>,
}

impl<'a> NamespaceScope<'a> {
    pub(crate) fn enter(client: &'a mut Client, namespace: &str) -> Result<Self> {
        let previous = client.set_namespace(namespace)?;
        Ok(Self {
            client,
            previous: Some(previous),
        })
    }

    /// Namespace that will be restored.
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }
}

impl Deref for NamespaceScope<'_> {
    type Target = Client;

    fn deref(&self) -> &Client {
        self.client
    }
}

impl DerefMut for NamespaceScope<'_> {
    fn deref_mut(&mut self) -> &mut Client {
        self.client
    }
}

impl Drop for NamespaceScope<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            // previous was a valid namespace, so this cannot fail
            let _ = self.client.set_namespace(previous);
        }
    }
}
