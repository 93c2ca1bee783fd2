//! New command implementation

use std::path::Path;

use colored::Colorize;
use mdev_core::{FrameworkConfig, Workspace};

use super::print_fetch_report;
use crate::error::{CliError, Result};

/// Run the new command
pub fn run_new(path: &Path, create_only: bool, framework_url: Option<&str>) -> Result<()> {
    let framework = framework_config(framework_url)?;

    println!(
        "{} program {}",
        "Creating".green().bold(),
        path.display().to_string().cyan()
    );
    let (workspace, fetched) = Workspace::create(path, &framework, create_only)?;
    let root = workspace.program().root();

    match fetched {
        Some(report) => print_fetch_report(&report, root),
        None => println!(
            "  {} (run {} to fetch components)",
            "Skipped fetch".dimmed(),
            "mdev deploy".cyan()
        ),
    }

    println!();
    println!("{} {}", "Created".green().bold(), root);
    Ok(())
}

fn framework_config(framework_url: Option<&str>) -> Result<FrameworkConfig> {
    let mut framework = FrameworkConfig::default();
    if let Some(url) = framework_url {
        let url = url.trim();
        if url.is_empty() {
            return Err(CliError::user("Framework URL must not be empty"));
        }
        framework.url = url.to_string();
    }
    Ok(framework)
}
