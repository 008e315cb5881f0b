//! `kubekit check`: which cluster tools are usable, and with what settings.

use anyhow::{Result, bail};
use kubeclient::{Client, ProcessExecutor, Tool};

use crate::Context as AppContext;
use crate::config::{self, Settings};
use crate::ui;

pub fn run(ctx: &AppContext) -> Result<()> {
    ui::header("Cluster Tools");

    for tool in Tool::all() {
        let client = Client::with_executor(*tool, Box::new(ProcessExecutor::new()));
        if client.is_available() {
            ui::success(&format!("{tool} found"));
        } else {
            ui::warn(&format!("{tool} not found on PATH"));
        }
    }

    let settings = Settings::load(ctx.config_path.as_deref())?;
    let target = super::Target::resolve(ctx, &settings)?;

    ui::header("Settings");
    let config_path = match &ctx.config_path {
        Some(path) => path.display().to_string(),
        None => config::default_path()?.display().to_string(),
    };
    ui::kv("config", &config_path);
    ui::kv("tool", target.tool.binary());
    ui::kv(
        "namespace",
        target
            .namespace
            .as_deref()
            .unwrap_or(target.tool.default_namespace()),
    );
    ui::kv("admin", if target.config.admin_by_default { "yes" } else { "no" });
    if ctx.verbose > 0 {
        ui::kv("admin user", &target.config.admin_user);
        ui::kv("readiness", &format!("{:?}", target.config.readiness));
        ui::kv("deletion", &format!("{:?}", target.config.deletion));
    }

    let selected = Client::with_executor(target.tool, Box::new(ProcessExecutor::new()));
    if !selected.is_available() {
        println!();
        bail!("{} is required but was not found", target.tool);
    }

    println!();
    ui::success(&format!("Ready to use {}", target.tool));
    ui::dim(&format!("kubekit --tool {} create <dir>", target.tool));
    Ok(())
}
