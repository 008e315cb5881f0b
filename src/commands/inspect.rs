//! Read-only cluster queries and `exec`.

use anyhow::{Context, Result};
use kubeclient::Client;

use crate::Context as AppContext;
use crate::ui;

pub fn get(ctx: &AppContext, resource_type: &str, name: &str, json: bool) -> Result<()> {
    let client = super::connect(ctx)?;
    print!("{}", render_get(&client, resource_type, name, json)?);
    Ok(())
}

fn render_get(client: &Client, resource_type: &str, name: &str, json: bool) -> Result<String> {
    if !json {
        return Ok(client.get(resource_type, name)?);
    }

    let raw = client.get_json(resource_type, name)?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("{resource_type} {name} is not JSON"))?;
    Ok(serde_json::to_string_pretty(&value)? + "\n")
}

pub fn list(ctx: &AppContext, resource_type: &str) -> Result<()> {
    let client = super::connect(ctx)?;
    let names = client.list(resource_type)?;
    if names.is_empty() && !ctx.quiet {
        ui::info(&format!("No {resource_type} in {}", client.namespace()));
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

pub fn describe(ctx: &AppContext, resource_type: &str, name: &str) -> Result<()> {
    let client = super::connect(ctx)?;
    print!("{}", client.describe(resource_type, name)?);
    Ok(())
}

pub fn logs(ctx: &AppContext, pod: &str) -> Result<()> {
    let client = super::connect(ctx)?;
    print!("{}", client.logs(pod)?);
    Ok(())
}

pub fn exec(ctx: &AppContext, pod: &str, command: &[String]) -> Result<()> {
    let client = super::connect(ctx)?;
    let output = client
        .exec(pod, command.iter().map(String::as_str))
        .with_context(|| format!("exec in {pod} failed"))?;
    print!("{}", output.out());
    eprint!("{}", output.err());
    Ok(())
}
