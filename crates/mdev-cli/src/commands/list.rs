//! List command implementation

use std::path::Path;

use colored::Colorize;
use mdev_core::Workspace;

use super::ensure_directory;
use crate::error::Result;

/// Run the list command
pub fn run_list(path: &Path, json: bool) -> Result<()> {
    ensure_directory(path)?;
    let workspace = Workspace::open(path)?;
    let components = workspace.components()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&components)?);
        return Ok(());
    }

    println!("{}", "Components".bold());
    if components.is_empty() {
        println!("  {} (use {} to fetch)", "None".dimmed(), "mdev deploy".cyan());
        return Ok(());
    }
    for component in &components {
        println!(
            "  {} {:<16} {:<32} {}",
            "+".green(),
            component.name.cyan(),
            component.path,
            component.label.dimmed()
        );
    }
    Ok(())
}
