//! The [`Client`] facade.

use crate::batch::{self, Subcommand};
use crate::clock::{Clock, SystemClock};
use crate::command::Command;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::executor::{Executor, ProcessExecutor};
use crate::readiness;
use crate::scope::{AdminScope, NamespaceScope};
use crate::types::{ExecOutput, Tool};
use crate::wait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Output template that lists resource names separated by spaces.
const NAME_LIST_TEMPLATE: &str = "jsonpath={range .items[*]}{.metadata.name} ";

/// High-level client for a cluster command-line tool.
///
/// Every command is issued against the client's current namespace. Mutating
/// operations return `&Self` so calls chain:
///
/// ```no_run
/// use kubeclient::{Client, Tool};
///
/// let client = Client::new(Tool::Kubectl)?;
/// client
///     .create(&["deploy/kafka"])?
///     .wait_for_stateful_set("my-cluster-zookeeper", Some(3))?
///     .wait_for_deployment("my-cluster-entity-operator")?;
/// # Ok::<(), kubeclient::Error>(())
/// ```
///
/// A client is meant to be used by one actor at a time; switching namespace
/// needs `&mut self`.
pub struct Client {
    tool: Tool,
    namespace: String,
    config: ClientConfig,
    executor: Box<dyn Executor>,
    clock: Box<dyn Clock>,
}

impl Client {
    /// Create a client that runs the real `tool` binary.
    ///
    /// Returns an error if the binary is not on `PATH`.
    pub fn new(tool: Tool) -> Result<Self> {
        let client = Self::with_executor(tool, Box::new(ProcessExecutor::new()));
        if !client.is_available() {
            return Err(Error::ToolNotFound(tool.binary().to_string()));
        }
        Ok(client)
    }

    /// Create a client with a custom executor (useful for testing).
    pub fn with_executor(tool: Tool, executor: Box<dyn Executor>) -> Self {
        Self {
            tool,
            namespace: tool.default_namespace().to_string(),
            config: ClientConfig::default(),
            executor,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the time source used by waits.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run batch and content operations with elevated privileges too.
    pub fn with_admin(mut self) -> Self {
        self.config.admin_by_default = true;
        self
    }

    /// Tool this client drives.
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Current configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether the tool binary can be executed.
    pub fn is_available(&self) -> bool {
        self.executor.is_available(self.tool.binary())
    }

    // =========================================================================
    // Namespace
    // =========================================================================

    /// Current namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Switch namespace, returning the previous one.
    pub fn set_namespace(&mut self, namespace: impl Into<String>) -> Result<String> {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(Error::InvalidConfig("namespace must not be empty".to_string()));
        }
        log::debug!("namespace {} -> {namespace}", self.namespace);
        Ok(std::mem::replace(&mut self.namespace, namespace))
    }

    /// Switch namespace until the returned guard is dropped.
    pub fn in_namespace(&mut self, namespace: &str) -> Result<NamespaceScope<'_>> {
        NamespaceScope::enter(self, namespace)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Build a command in the current namespace.
    pub fn command<I, S>(&self, rest: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Command::namespaced(self.tool.binary(), &self.namespace, rest)
    }

    fn run<I, S>(&self, rest: I, stdin: Option<&str>) -> Result<ExecOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.executor.execute(&self.command(rest), stdin)
    }

    /// Enter the elevated-privilege scope.
    pub fn admin_scope(&self) -> Result<AdminScope<'_>> {
        AdminScope::enter(self.executor.as_ref(), self.tool, &self.config.admin_user)
    }

    fn default_scope(&self) -> Result<AdminScope<'_>> {
        if self.config.admin_by_default {
            self.admin_scope()
        } else {
            Ok(AdminScope::noop(self.executor.as_ref(), self.tool))
        }
    }

    // =========================================================================
    // Batch Operations
    // =========================================================================

    /// `create -f` every descriptor under `paths`, ascending.
    pub fn create(&self, paths: &[impl AsRef<Path>]) -> Result<&Self> {
        self.apply(Subcommand::Create, paths)
    }

    /// `replace -f` every descriptor under `paths`, ascending.
    pub fn replace(&self, paths: &[impl AsRef<Path>]) -> Result<&Self> {
        self.apply(Subcommand::Replace, paths)
    }

    /// `delete -f` every descriptor under `paths`, descending.
    pub fn delete(&self, paths: &[impl AsRef<Path>]) -> Result<&Self> {
        self.apply(Subcommand::Delete, paths)
    }

    /// Apply `subcommand` to every descriptor under `paths`.
    ///
    /// All descriptors are attempted; failures come back together as
    /// [`Error::Batch`]. A missing path fails before anything runs.
    pub fn apply(&self, subcommand: Subcommand, paths: &[impl AsRef<Path>]) -> Result<&Self> {
        let _scope = self.default_scope()?;
        batch::apply_paths(subcommand, paths, |file| {
            let file = std::path::absolute(file)?;
            self.run(
                [
                    subcommand.as_str().to_string(),
                    "-f".to_string(),
                    file.display().to_string(),
                ],
                None,
            )?;
            Ok(())
        })?;
        Ok(self)
    }

    /// `create -f -` with `content` on stdin.
    pub fn create_content(&self, content: &str) -> Result<&Self> {
        self.apply_content(Subcommand::Create, content)
    }

    /// `replace -f -` with `content` on stdin.
    pub fn replace_content(&self, content: &str) -> Result<&Self> {
        self.apply_content(Subcommand::Replace, content)
    }

    /// `delete -f -` with `content` on stdin.
    pub fn delete_content(&self, content: &str) -> Result<&Self> {
        self.apply_content(Subcommand::Delete, content)
    }

    fn apply_content(&self, subcommand: Subcommand, content: &str) -> Result<&Self> {
        let _scope = self.default_scope()?;
        self.run([subcommand.as_str(), "-f", "-"], Some(content))?;
        Ok(self)
    }

    /// `delete <type> <name>`.
    pub fn delete_by_name(&self, resource_type: &str, name: &str) -> Result<&Self> {
        self.run(["delete", resource_type, name], None)?;
        Ok(self)
    }

    /// Create a namespace with elevated privileges.
    pub fn create_namespace(&self, name: &str) -> Result<&Self> {
        let _scope = self.admin_scope()?;
        self.run(["create", "namespace", name], None)?;
        Ok(self)
    }

    /// Delete a namespace with elevated privileges.
    pub fn delete_namespace(&self, name: &str) -> Result<&Self> {
        let _scope = self.admin_scope()?;
        self.run(["delete", "namespace", name], None)?;
        Ok(self)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Run `command` inside `pod`.
    pub fn exec<I, S>(&self, pod: &str, command: I) -> Result<ExecOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = vec!["exec".to_string(), pod.to_string(), "--".to_string()];
        args.extend(command.into_iter().map(Into::into));
        self.run(args, None)
    }

    /// A resource as YAML.
    pub fn get(&self, resource_type: &str, name: &str) -> Result<String> {
        Ok(self.run(["get", resource_type, name, "-o", "yaml"], None)?.stdout)
    }

    /// A resource as a JSON string.
    pub fn get_json(&self, resource_type: &str, name: &str) -> Result<String> {
        Ok(self.run(["get", resource_type, name, "-o", "json"], None)?.stdout)
    }

    /// Names of every resource of `resource_type`.
    pub fn list(&self, resource_type: &str) -> Result<Vec<String>> {
        let output = self.run(["get", resource_type, "-o", NAME_LIST_TEMPLATE], None)?;
        Ok(output
            .stdout
            .split_whitespace()
            .map(ToString::to_string)
            .collect())
    }

    /// `describe <type> <name>`.
    pub fn describe(&self, resource_type: &str, name: &str) -> Result<String> {
        Ok(self.run(["describe", resource_type, name], None)?.stdout)
    }

    /// Logs of `pod`.
    pub fn logs(&self, pod: &str) -> Result<String> {
        Ok(self.run(["logs", pod], None)?.stdout)
    }

    /// Parsed `.metadata.creationTimestamp` of a resource.
    pub fn resource_creation_timestamp(
        &self,
        resource_type: &str,
        name: &str,
    ) -> Result<DateTime<Utc>> {
        let state: Value = serde_json::from_str(&self.get_json(resource_type, name)?)?;
        readiness::creation_timestamp(&state)
    }

    // =========================================================================
    // Waits
    // =========================================================================

    /// Poll `<type> <name>` as JSON until `ready` holds, within the readiness
    /// budget. A missing resource counts as not ready.
    pub fn wait_for<P>(&self, resource_type: &str, name: &str, ready: P) -> Result<&Self>
    where
        P: FnMut(&Value) -> Result<bool>,
    {
        wait::wait_for_state(
            self.clock.as_ref(),
            &self.config.readiness,
            &format!("{resource_type} {name}"),
            || self.get_json(resource_type, name),
            ready,
        )?;
        Ok(self)
    }

    /// Wait until a deployment reports all replicas ready.
    pub fn wait_for_deployment(&self, name: &str) -> Result<&Self> {
        self.wait_for("deployment", name, |state| Ok(readiness::deployment_ready(state)))
    }

    /// Wait until every container of a pod is ready.
    pub fn wait_for_pod(&self, name: &str) -> Result<&Self> {
        self.wait_for("pod", name, |state| Ok(readiness::pod_ready(state)))
    }

    /// Wait until a stateful set has rolled out.
    ///
    /// With `expected_pods` set, the set must run exactly that many replicas
    /// and each pod `<name>-0` .. `<name>-(n-1)` is then waited on in turn.
    pub fn wait_for_stateful_set(&self, name: &str, expected_pods: Option<u32>) -> Result<&Self> {
        self.wait_for("statefulset", name, |state| {
            if !readiness::stateful_set_ready(state, expected_pods) {
                return Ok(false);
            }
            if let Some(count) = expected_pods {
                log::debug!("waiting for pods of statefulset {name}");
                for ordinal in 0..count {
                    self.wait_for_pod(&format!("{name}-{ordinal}"))?;
                }
            }
            Ok(true)
        })
    }

    /// Wait until a resource exists.
    pub fn wait_for_resource_creation(&self, resource_type: &str, name: &str) -> Result<&Self> {
        self.wait_for(resource_type, name, |_| Ok(true))
    }

    /// Wait until a resource is gone, within the deletion budget.
    pub fn wait_for_resource_deletion(&self, resource_type: &str, name: &str) -> Result<&Self> {
        wait::wait_for_absence(
            self.clock.as_ref(),
            &self.config.deletion,
            &format!("{resource_type} {name} removal"),
            || self.get(resource_type, name),
        )?;
        Ok(self)
    }

    /// Wait until a resource was (re)created strictly after `since`, within
    /// the deletion budget.
    pub fn wait_for_resource_update(
        &self,
        resource_type: &str,
        name: &str,
        since: DateTime<Utc>,
    ) -> Result<&Self> {
        wait::poll_until(
            self.clock.as_ref(),
            &self.config.deletion,
            &format!("{resource_type} {name} update"),
            || match self.resource_creation_timestamp(resource_type, name) {
                Ok(created) => Ok(created > since),
                Err(e) if e.is_not_found() => Ok(false),
                Err(e) => Err(e),
            },
        )?;
        Ok(self)
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tool.binary())
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("tool", &self.tool)
            .field("namespace", &self.namespace)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::executor::{MockExecutor, MockResponse};
    use crate::wait::WaitConfig;
    use chrono::TimeZone;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Harness {
        client: Client,
        mock: MockExecutor,
        clock: ManualClock,
    }

    fn harness(tool: Tool) -> Harness {
        let mock = MockExecutor::new();
        let clock = ManualClock::new();
        let fast = WaitConfig::new(Duration::from_secs(1), Duration::from_secs(30)).unwrap();
        let client = Client::with_executor(tool, Box::new(mock.clone()))
            .with_clock(Box::new(clock.clone()))
            .with_config(
                ClientConfig::default()
                    .with_readiness(fast)
                    .with_deletion(fast),
            );
        Harness {
            client,
            mock,
            clock,
        }
    }

    fn descriptors(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "apiVersion: v1\n").unwrap();
        }
        dir
    }

    /// File names passed to `-f`, in call order.
    fn applied_files(mock: &MockExecutor) -> Vec<String> {
        mock.calls()
            .iter()
            .filter_map(|cmd| {
                let args = cmd.args();
                let pos = args.iter().position(|a| a == "-f")?;
                let file = Path::new(&args[pos + 1]);
                Some(file.file_name()?.to_string_lossy().to_string())
            })
            .collect()
    }

    #[test]
    fn test_commands_use_current_namespace() {
        let mut h = harness(Tool::Kubectl);
        assert_eq!(h.client.namespace(), "default");

        h.client.describe("pod", "web-0").unwrap();
        let previous = h.client.set_namespace("kafka").unwrap();
        assert_eq!(previous, "default");
        h.client.logs("web-0").unwrap();
        let previous = h.client.set_namespace(previous).unwrap();
        assert_eq!(previous, "kafka");
        h.client.logs("web-0").unwrap();

        assert_eq!(
            h.mock.call_lines(),
            [
                "kubectl --namespace default describe pod web-0",
                "kubectl --namespace kafka logs web-0",
                "kubectl --namespace default logs web-0",
            ]
        );
    }

    #[test]
    fn test_empty_namespace_rejected() {
        let mut h = harness(Tool::Kubectl);
        assert!(h.client.set_namespace("").is_err());
        assert_eq!(h.client.namespace(), "default");
    }

    #[test]
    fn test_namespace_scope_restores() {
        let mut h = harness(Tool::Oc);
        {
            let scoped = h.client.in_namespace("kafka").unwrap();
            assert_eq!(scoped.namespace(), "kafka");
            assert_eq!(scoped.previous(), Some("myproject"));
            scoped.logs("broker-0").unwrap();
        }
        assert_eq!(h.client.namespace(), "myproject");
        assert_eq!(
            h.mock.call_lines(),
            ["oc --namespace kafka logs broker-0"]
        );
    }

    #[test]
    fn test_create_tree_ascending() {
        let h = harness(Tool::Kubectl);
        let dir = descriptors(&["02-b.yaml", "01-a.yaml", "sub/01-c.yaml", "notes.txt"]);

        h.client.create(&[dir.path()]).unwrap();

        assert_eq!(applied_files(&h.mock), ["01-a.yaml", "02-b.yaml", "01-c.yaml"]);
        let first = &h.mock.calls()[0];
        assert_eq!(&first.tokens()[..4], ["kubectl", "--namespace", "default", "create"]);
        assert!(Path::new(&first.tokens()[5]).is_absolute());
    }

    #[test]
    fn test_delete_tree_descending() {
        let h = harness(Tool::Kubectl);
        let dir = descriptors(&["02-b.yaml", "01-a.yaml", "sub/01-c.yaml"]);

        h.client.delete(&[dir.path()]).unwrap();

        assert_eq!(applied_files(&h.mock), ["01-c.yaml", "02-b.yaml", "01-a.yaml"]);
        assert!(h.mock.call_lines().iter().all(|l| l.contains(" delete -f ")));
    }

    #[test]
    fn test_batch_continues_and_reports_first_failure() {
        let h = harness(Tool::Kubectl);
        let dir = descriptors(&["a.yaml", "b.yaml", "c.yaml"]);
        h.mock.on("a.yaml", [MockResponse::fail("a is invalid")]);
        h.mock.on("c.yaml", [MockResponse::fail("c is invalid")]);

        let err = h.client.create(&[dir.path()]).unwrap_err();

        assert_eq!(applied_files(&h.mock), ["a.yaml", "b.yaml", "c.yaml"]);
        let failures = err.batch_failures();
        assert_eq!(failures.len(), 2);
        assert!(failures[0].path.ends_with("a.yaml"));
        assert!(failures[0].error.to_string().contains("a is invalid"));
    }

    #[test]
    fn test_replace_surfaces_failures() {
        let h = harness(Tool::Kubectl);
        let dir = descriptors(&["a.yaml"]);
        h.mock.on("replace", [MockResponse::fail("conflict")]);
        assert!(h.client.replace(&[dir.path()]).is_err());
    }

    #[test]
    fn test_missing_path_runs_nothing() {
        let h = harness(Tool::Kubectl);
        let dir = descriptors(&["a.yaml"]);
        let err = h
            .client
            .create(&[dir.path().join("a.yaml"), dir.path().join("nope")])
            .unwrap_err();
        assert!(matches!(err, Error::PathNotFound(_)));
        assert!(h.mock.calls().is_empty());
    }

    #[test]
    fn test_content_goes_to_stdin() {
        let h = harness(Tool::Kubectl);
        h.client
            .create_content("kind: ConfigMap")
            .unwrap()
            .replace_content("kind: Secret")
            .unwrap()
            .delete_content("kind: Service")
            .unwrap();

        assert_eq!(
            h.mock.call_lines(),
            [
                "kubectl --namespace default create -f -",
                "kubectl --namespace default replace -f -",
                "kubectl --namespace default delete -f -",
            ]
        );
        assert_eq!(
            h.mock.stdin_log(),
            ["kind: ConfigMap", "kind: Secret", "kind: Service"]
        );
    }

    #[test]
    fn test_oc_namespace_lifecycle_runs_as_admin() {
        let h = harness(Tool::Oc);
        h.mock.on("oc whoami", [MockResponse::ok("developer\n")]);

        h.client.create_namespace("kafka").unwrap();

        assert_eq!(
            h.mock.call_lines(),
            [
                "oc whoami",
                "oc login -u system:admin",
                "oc --namespace myproject create namespace kafka",
                "oc login -u developer",
            ]
        );
    }

    #[test]
    fn test_admin_scope_restored_when_operation_fails() {
        let h = harness(Tool::Oc);
        h.mock.on("oc whoami", [MockResponse::ok("developer")]);
        h.mock.on("delete namespace", [MockResponse::fail("forbidden")]);

        assert!(h.client.delete_namespace("kafka").is_err());
        assert_eq!(
            h.mock.call_lines().last().map(String::as_str),
            Some("oc login -u developer")
        );
    }

    #[test]
    fn test_kubectl_namespace_lifecycle_has_no_login() {
        let h = harness(Tool::Kubectl);
        h.client.create_namespace("kafka").unwrap().delete_namespace("kafka").unwrap();
        assert_eq!(
            h.mock.call_lines(),
            [
                "kubectl --namespace default create namespace kafka",
                "kubectl --namespace default delete namespace kafka",
            ]
        );
    }

    #[test]
    fn test_with_admin_elevates_batch_operations() {
        let h = harness(Tool::Oc);
        let client = h.client.with_admin();
        h.mock.on("oc whoami", [MockResponse::ok("developer")]);

        client.create_content("kind: ConfigMap").unwrap();

        assert_eq!(h.mock.count("oc login -u system:admin"), 1);
        assert_eq!(
            h.mock.call_lines().last().map(String::as_str),
            Some("oc login -u developer")
        );
    }

    #[test]
    fn test_exec_and_queries() {
        let h = harness(Tool::Kubectl);
        h.mock.on("exec", [MockResponse::ok("hello\n")]);
        h.mock.on("get cm -o", [MockResponse::ok("alpha beta  gamma ")]);

        let out = h.client.exec("web-0", ["echo", "hello"]).unwrap();
        assert_eq!(out.out(), "hello\n");
        assert_eq!(h.client.list("cm").unwrap(), ["alpha", "beta", "gamma"]);
        h.client.get("cm", "alpha").unwrap();

        assert_eq!(
            h.mock.call_lines(),
            [
                "kubectl --namespace default exec web-0 -- echo hello",
                "kubectl --namespace default get cm -o jsonpath={range .items[*]}{.metadata.name} ",
                "kubectl --namespace default get cm alpha -o yaml",
            ]
        );
    }

    #[test]
    fn test_list_empty() {
        let h = harness(Tool::Kubectl);
        assert!(h.client.list("pods").unwrap().is_empty());
    }

    #[test]
    fn test_get_not_found_is_typed() {
        let h = harness(Tool::Kubectl);
        h.mock.on("get pod ghost", [MockResponse::NotFound]);
        assert!(h.client.get("pod", "ghost").unwrap_err().is_not_found());
    }

    #[test]
    fn test_wait_for_deployment_polls_until_ready() {
        let h = harness(Tool::Kubectl);
        h.mock.on(
            "get deployment web -o json",
            [
                MockResponse::NotFound,
                MockResponse::ok(r#"{"status":{"replicas":3}}"#),
                MockResponse::ok(r#"{"status":{"replicas":3,"readyReplicas":2}}"#),
                MockResponse::ok(r#"{"status":{"replicas":3,"readyReplicas":3}}"#),
            ],
        );

        h.client.wait_for_deployment("web").unwrap();

        assert_eq!(h.mock.count("get deployment web"), 4);
        assert_eq!(h.clock.sleeps(), vec![Duration::from_secs(1); 3]);
    }

    #[test]
    fn test_wait_for_pod_times_out() {
        let h = harness(Tool::Kubectl);
        h.mock.on(
            "get pod web-0",
            [MockResponse::ok(r#"{"status":{"phase":"Pending"}}"#)],
        );

        let err = h.client.wait_for_pod("web-0").unwrap_err();

        assert!(err.is_timeout());
        assert!(err.to_string().contains("pod web-0"));
        assert!(h.clock.elapsed() >= Duration::from_secs(30));
        assert!(h.clock.elapsed() < Duration::from_secs(31));
    }

    #[test]
    fn test_wait_propagates_other_failures() {
        let h = harness(Tool::Kubectl);
        h.mock.on("get deployment web", [MockResponse::fail("Unauthorized")]);
        let err = h.client.wait_for_deployment("web").unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
        assert_eq!(h.mock.count("get deployment web"), 1);
    }

    #[test]
    fn test_wait_for_stateful_set_any_count() {
        let h = harness(Tool::Kubectl);
        h.mock.on(
            "get statefulset zk",
            [
                MockResponse::ok(r#"{"status":{"replicas":5,"currentReplicas":4}}"#),
                MockResponse::ok(r#"{"status":{"replicas":5,"currentReplicas":5}}"#),
            ],
        );

        h.client.wait_for_stateful_set("zk", None).unwrap();

        assert_eq!(h.mock.count("get statefulset zk"), 2);
        assert_eq!(h.mock.count("get pod"), 0);
    }

    #[test]
    fn test_wait_for_stateful_set_waits_for_each_pod() {
        let h = harness(Tool::Kubectl);
        h.mock.on(
            "get statefulset zk",
            [
                MockResponse::ok(r#"{"status":{"replicas":3,"currentReplicas":3}}"#),
            ],
        );
        h.mock.on(
            "get pod zk-",
            [MockResponse::ok(
                r#"{"status":{"containerStatuses":[{"ready":true}]}}"#,
            )],
        );

        h.client.wait_for_stateful_set("zk", Some(3)).unwrap();

        let pods: Vec<String> = h
            .mock
            .call_lines()
            .into_iter()
            .filter(|l| l.contains("get pod"))
            .collect();
        assert_eq!(
            pods,
            [
                "kubectl --namespace default get pod zk-0 -o json",
                "kubectl --namespace default get pod zk-1 -o json",
                "kubectl --namespace default get pod zk-2 -o json",
            ]
        );
    }

    #[test]
    fn test_wait_for_stateful_set_wrong_count_keeps_polling() {
        let h = harness(Tool::Kubectl);
        h.mock.on(
            "get statefulset zk",
            [
                MockResponse::ok(r#"{"status":{"replicas":2,"currentReplicas":2}}"#),
                MockResponse::ok(r#"{"status":{"replicas":3,"currentReplicas":3}}"#),
            ],
        );
        h.mock.on(
            "get pod zk-",
            [MockResponse::ok(
                r#"{"status":{"containerStatuses":[{"ready":true}]}}"#,
            )],
        );
        h.client.wait_for_stateful_set("zk", Some(3)).unwrap();
        assert_eq!(h.mock.count("get statefulset zk"), 2);
        assert_eq!(h.mock.count("get pod zk-"), 3);
    }

    #[test]
    fn test_wait_for_resource_creation() {
        let h = harness(Tool::Kubectl);
        h.mock.on(
            "get cm settings",
            [MockResponse::NotFound, MockResponse::ok("{}")],
        );
        h.client.wait_for_resource_creation("cm", "settings").unwrap();
        assert_eq!(h.mock.count("get cm settings -o json"), 2);
    }

    #[test]
    fn test_wait_for_resource_deletion() {
        let h = harness(Tool::Kubectl);
        h.mock.on(
            "get cm settings",
            [
                MockResponse::ok("kind: ConfigMap"),
                MockResponse::ok("kind: ConfigMap"),
                MockResponse::NotFound,
            ],
        );

        h.client.wait_for_resource_deletion("cm", "settings").unwrap();

        assert_eq!(h.mock.count("get cm settings -o yaml"), 3);
        assert_eq!(h.clock.sleeps().len(), 2);
    }

    #[test]
    fn test_wait_for_resource_deletion_immediate() {
        let h = harness(Tool::Kubectl);
        h.mock.on("get cm settings", [MockResponse::NotFound]);
        h.client.wait_for_resource_deletion("cm", "settings").unwrap();
        assert_eq!(h.mock.count("get cm settings"), 1);
        assert!(h.clock.sleeps().is_empty());
    }

    #[test]
    fn test_wait_for_resource_deletion_fails_on_client_errors() {
        let h = harness(Tool::Kubectl);
        h.mock.on(
            "get cm settings",
            [MockResponse::fail("error: context \"prod\" not found")],
        );
        h.mock.on(
            "get deploymnet web",
            [MockResponse::fail(
                "error: the server doesn't have a resource type \"deploymnet\"",
            )],
        );

        let err = h
            .client
            .wait_for_resource_deletion("cm", "settings")
            .unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));

        let err = h
            .client
            .wait_for_resource_deletion("deploymnet", "web")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownResourceType { .. }));

        assert_eq!(h.mock.count("get "), 2);
        assert!(h.clock.sleeps().is_empty());
    }

    #[test]
    fn test_wait_for_deployment_fails_fast_on_unknown_type() {
        let h = harness(Tool::Kubectl);
        h.mock.on(
            "get deployment web",
            [MockResponse::fail(
                "error: the server doesn't have a resource type \"deployment\"",
            )],
        );
        assert!(h.client.wait_for_deployment("web").is_err());
        assert_eq!(h.mock.count("get deployment web"), 1);
    }

    #[test]
    fn test_wait_for_resource_update() {
        let h = harness(Tool::Kubectl);
        let since = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        h.mock.on(
            "get pod web-0 -o json",
            [
                MockResponse::NotFound,
                MockResponse::ok(r#"{"metadata":{"creationTimestamp":"2024-01-15T08:00:00Z"}}"#),
                MockResponse::ok(r#"{"metadata":{"creationTimestamp":"2024-01-15T08:00:05Z"}}"#),
            ],
        );

        h.client.wait_for_resource_update("pod", "web-0", since).unwrap();

        assert_eq!(h.mock.count("get pod web-0"), 3);
    }

    #[test]
    fn test_resource_creation_timestamp() {
        let h = harness(Tool::Kubectl);
        h.mock.on(
            "get kafka my-cluster -o json",
            [MockResponse::ok(
                r#"{"metadata":{"creationTimestamp":"2018-03-20T10:15:30Z"}}"#,
            )],
        );
        assert_eq!(
            h.client
                .resource_creation_timestamp("kafka", "my-cluster")
                .unwrap(),
            Utc.with_ymd_and_hms(2018, 3, 20, 10, 15, 30).unwrap()
        );
    }

    #[test]
    fn test_fluent_chain() {
        let h = harness(Tool::Kubectl);
        let dir = descriptors(&["a.yaml"]);
        h.mock.on(
            "get deployment web",
            [MockResponse::ok(r#"{"status":{"replicas":1,"readyReplicas":1}}"#)],
        );

        h.client
            .create(&[dir.path()])
            .and_then(|c| c.wait_for_deployment("web"))
            .and_then(|c| c.delete_by_name("deployment", "web"))
            .and_then(|c| c.wait_for_resource_deletion("cm", "gone"))
            .unwrap_err();

        // "get cm gone" succeeds with empty output on the mock, so the
        // deletion wait runs out of budget; everything before it ran.
        assert_eq!(h.mock.count("delete deployment web"), 1);
    }

    #[test]
    fn test_new_rejects_missing_binary() {
        let mock = MockExecutor::new();
        mock.set_unavailable();
        let client = Client::with_executor(Tool::Kubectl, Box::new(mock));
        assert!(!client.is_available());
        assert_eq!(client.to_string(), "kubectl");
    }
}
