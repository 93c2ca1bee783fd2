//! Import command implementation

use std::path::Path;

use colored::Colorize;
use mdev_core::{ImportOptions, import_project};
use mdev_git::GitBackend;

use crate::error::Result;

/// Run the import command
pub fn run_import(
    url: &str,
    path: Option<&Path>,
    reference: Option<&str>,
    skip_resolve_libs: bool,
) -> Result<()> {
    let options = ImportOptions {
        reference: reference.map(str::to_string),
        resolve: !skip_resolve_libs,
    };

    println!("{} {}", "Importing".green().bold(), url.cyan());
    let dst = import_project(&GitBackend::new(), url, path, &options)?;

    if let Some(reference) = reference {
        println!("  {} {}", "Checked out".dimmed(), reference.cyan());
    }
    if skip_resolve_libs {
        println!(
            "  {} (run {} to fetch components)",
            "Skipped fetch".dimmed(),
            "mdev deploy".cyan()
        );
    }
    println!("{} {}", "Imported into".green().bold(), dst);
    Ok(())
}
