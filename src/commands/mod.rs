// Batch commands
pub mod apply;

// Cluster commands
pub mod inspect;
pub mod namespace;
pub mod wait;

// Environment
pub mod check;

use anyhow::{Context, Result};
use kubeclient::{Client, ClientConfig, Tool};

use crate::Context as AppContext;
use crate::config::Settings;

/// Where and how to talk to the cluster, after merging flags over the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub tool: Tool,
    pub namespace: Option<String>,
    pub config: ClientConfig,
}

impl Target {
    pub fn resolve(ctx: &AppContext, settings: &Settings) -> Result<Self> {
        let mut config = settings.client_config()?;
        if ctx.admin {
            config.admin_by_default = true;
        }

        Ok(Self {
            tool: ctx.tool.or(settings.tool).unwrap_or_default(),
            namespace: ctx.namespace.clone().or_else(|| settings.namespace.clone()),
            config,
        })
    }

    /// Apply namespace and config to a freshly built client.
    pub fn configure(self, client: Client) -> Result<Client> {
        let mut client = client.with_config(self.config);
        if let Some(namespace) = self.namespace {
            client
                .set_namespace(namespace)
                .context("Invalid --namespace")?;
        }
        Ok(client)
    }
}

/// Build the client every cluster command runs against.
pub fn connect(ctx: &AppContext) -> Result<Client> {
    let settings = Settings::load(ctx.config_path.as_deref())?;
    let target = Target::resolve(ctx, &settings)?;
    let tool = target.tool;
    let client = Client::new(tool).with_context(|| format!("Cannot use {tool}"))?;
    let client = target.configure(client)?;
    log::debug!("using {client} in namespace {}", client.namespace());
    Ok(client)
}
