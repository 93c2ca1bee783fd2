//! mdev CLI
//!
//! The command-line interface for creating MXOS programs and keeping their
//! component checkouts in step with their reference files.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialize logging: {}", "warning".yellow(), e);
    }
    tracing::debug!(verbose = cli.verbose, "Logging initialized");

    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::New {
            path,
            create_only,
            framework_url,
        } => commands::run_new(&path, create_only, framework_url.as_deref()),
        Commands::Import {
            url,
            path,
            reference,
            skip_resolve_libs,
        } => commands::run_import(&url, path.as_deref(), reference.as_deref(), skip_resolve_libs),
        Commands::Deploy { path, force } => commands::run_deploy(&path, force),
        Commands::Sync { path } => commands::run_sync(&path),
        Commands::Status { path, json } => commands::run_status(&path, json),
        Commands::List { path, json } => commands::run_list(&path, json),
    }
}
