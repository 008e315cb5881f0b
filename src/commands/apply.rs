//! `create`, `replace` and `delete` over descriptor trees or stdin.

use anyhow::{Context, Result, bail};
use kubeclient::{Client, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::Context as AppContext;
use crate::ui;

const STDIN: &str = "-";

pub fn run(ctx: &AppContext, subcommand: Subcommand, paths: &[PathBuf]) -> Result<()> {
    let client = super::connect(ctx)?;
    apply(&client, subcommand, paths, io::stdin().lock())
}

fn reads_stdin(paths: &[PathBuf]) -> Result<bool> {
    let dashes = paths.iter().filter(|p| p.as_path() == Path::new(STDIN)).count();
    match dashes {
        0 => Ok(false),
        1 if paths.len() == 1 => Ok(true),
        _ => bail!("'-' (stdin) cannot be combined with other paths"),
    }
}

fn apply(client: &Client, subcommand: Subcommand, paths: &[PathBuf], mut stdin: impl Read) -> Result<()> {
    if reads_stdin(paths)? {
        let mut content = String::new();
        stdin
            .read_to_string(&mut content)
            .context("Could not read descriptor from stdin")?;
        match subcommand {
            Subcommand::Create => client.create_content(&content)?,
            Subcommand::Replace => client.replace_content(&content)?,
            Subcommand::Delete => client.delete_content(&content)?,
        };
        ui::success(&format!("{subcommand} from stdin in {}", client.namespace()));
        return Ok(());
    }

    match client.apply(subcommand, paths) {
        Ok(_) => {
            ui::success(&format!(
                "{subcommand} finished for {} in {}",
                ui::plural(paths.len(), "path"),
                client.namespace()
            ));
            Ok(())
        }
        Err(err) if !err.batch_failures().is_empty() => {
            let failures = err.batch_failures();
            for failure in failures {
                ui::error(&failure.path.display().to_string());
                for line in failure.error.to_string().lines() {
                    ui::dim_err(line);
                }
            }
            bail!(
                "{subcommand} failed for {}",
                ui::plural(failures.len(), "descriptor")
            )
        }
        Err(err) => Err(err.into()),
    }
}
