//! `kubekit wait ...`

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use kubeclient::Client;
use kubeclient::readiness::parse_timestamp;

use crate::Context as AppContext;
use crate::cli::WaitCommand;
use crate::{progress, ui};

pub fn run(ctx: &AppContext, cmd: WaitCommand) -> Result<()> {
    let client = super::connect(ctx)?;
    let what = describe(&cmd);

    let pb = progress::spinner(&format!("Waiting for {what}"), ctx.quiet);
    let result = wait(&client, cmd);
    progress::finish(&pb);
    result?;

    ui::success(&format!("{what} in {}", client.namespace()));
    Ok(())
}

fn describe(cmd: &WaitCommand) -> String {
    match cmd {
        WaitCommand::Deployment { name } => format!("deployment {name} ready"),
        WaitCommand::Pod { name } => format!("pod {name} ready"),
        WaitCommand::StatefulSet { name, pods: None } => format!("statefulset {name} ready"),
        WaitCommand::StatefulSet {
            name,
            pods: Some(pods),
        } => format!("statefulset {name} ready with {pods} pods"),
        WaitCommand::Created {
            resource_type,
            name,
        } => format!("{resource_type} {name} created"),
        WaitCommand::Deleted {
            resource_type,
            name,
        } => format!("{resource_type} {name} deleted"),
        WaitCommand::Updated {
            resource_type,
            name,
            ..
        } => format!("{resource_type} {name} recreated"),
    }
}

fn wait(client: &Client, cmd: WaitCommand) -> Result<()> {
    match cmd {
        WaitCommand::Deployment { name } => client.wait_for_deployment(&name)?,
        WaitCommand::Pod { name } => client.wait_for_pod(&name)?,
        WaitCommand::StatefulSet { name, pods } => client.wait_for_stateful_set(&name, pods)?,
        WaitCommand::Created {
            resource_type,
            name,
        } => client.wait_for_resource_creation(&resource_type, &name)?,
        WaitCommand::Deleted {
            resource_type,
            name,
        } => client.wait_for_resource_deletion(&resource_type, &name)?,
        WaitCommand::Updated {
            resource_type,
            name,
            since,
        } => {
            let since = resolve_since(client, &resource_type, &name, since.as_deref())?;
            log::info!("waiting for {resource_type} {name} created after {since}");
            client.wait_for_resource_update(&resource_type, &name, since)?
        }
    };
    Ok(())
}

/// `--since`, or the resource's current creation time.
fn resolve_since(
    client: &Client,
    resource_type: &str,
    name: &str,
    since: Option<&str>,
) -> Result<DateTime<Utc>> {
    match since {
        Some(raw) => parse_timestamp(raw).with_context(|| format!("Invalid --since {raw:?}")),
        None => client
            .resource_creation_timestamp(resource_type, name)
            .with_context(|| format!("Could not read creation time of {resource_type} {name}")),
    }
}
