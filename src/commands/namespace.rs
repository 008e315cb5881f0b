//! Namespace lifecycle, always run with elevated privileges.

use anyhow::Result;
use kubeclient::Client;

use crate::Context as AppContext;
use crate::cli::NamespaceCommand;
use crate::{progress, ui};

pub fn run(ctx: &AppContext, cmd: NamespaceCommand) -> Result<()> {
    let client = super::connect(ctx)?;
    match cmd {
        NamespaceCommand::Create { name } => create(&client, &name),
        NamespaceCommand::Delete { name, wait } => delete(ctx, &client, &name, wait),
    }
}

fn create(client: &Client, name: &str) -> Result<()> {
    client.create_namespace(name)?;
    ui::success(&format!("Created namespace {name}"));
    Ok(())
}

fn delete(ctx: &AppContext, client: &Client, name: &str, wait: bool) -> Result<()> {
    client.delete_namespace(name)?;
    if wait {
        let pb = progress::spinner(&format!("Waiting for namespace {name} to go away"), ctx.quiet);
        let result = client.wait_for_resource_deletion("namespace", name);
        progress::finish(&pb);
        result?;
    }
    ui::success(&format!("Deleted namespace {name}"));
    Ok(())
}
