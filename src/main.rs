mod cli;
mod commands;
mod config;
mod progress;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::path::PathBuf;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub tool: Option<kubeclient::Tool>,
    pub namespace: Option<String>,
    pub config_path: Option<PathBuf>,
    pub admin: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    if let Err(err) = run(cli) {
        report(&err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        tool: cli.tool.map(Into::into),
        namespace: cli.namespace,
        config_path: cli.config,
        admin: cli.admin,
    };

    match cli.command {
        Command::Check => commands::check::run(&ctx),
        Command::Create(args) => commands::apply::run(&ctx, kubeclient::Subcommand::Create, &args.paths),
        Command::Delete(args) => commands::apply::run(&ctx, kubeclient::Subcommand::Delete, &args.paths),
        Command::Replace(args) => {
            commands::apply::run(&ctx, kubeclient::Subcommand::Replace, &args.paths)
        }
        Command::Namespace(cmd) => commands::namespace::run(&ctx, cmd),
        Command::Get {
            resource_type,
            name,
            json,
        } => commands::inspect::get(&ctx, &resource_type, &name, json),
        Command::List { resource_type } => commands::inspect::list(&ctx, &resource_type),
        Command::Describe {
            resource_type,
            name,
        } => commands::inspect::describe(&ctx, &resource_type, &name),
        Command::Logs { pod } => commands::inspect::logs(&ctx, &pod),
        Command::Exec { pod, command } => commands::inspect::exec(&ctx, &pod, &command),
        Command::Wait(cmd) => commands::wait::run(&ctx, cmd),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "kubekit", &mut io::stdout());
            Ok(())
        }
    }
}

/// Print an error chain, with advice when it comes from the cluster tool.
fn report(err: &anyhow::Error) {
    ui::error(&err.to_string());
    for cause in err.chain().skip(1) {
        ui::dim_err(&format!("caused by: {cause}"));
    }

    if let Some(kube) = err.chain().find_map(|e| e.downcast_ref::<kubeclient::Error>()) {
        let category = kube.category();
        if category != kubeclient::ErrorCategory::Other {
            ui::dim_err(&format!("{}: {}", category.description(), category.advice()));
        }
    }
}
