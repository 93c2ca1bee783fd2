//! Sync command implementation

use std::path::Path;

use colored::Colorize;
use mdev_core::Workspace;

use super::{display_path, ensure_directory};
use crate::error::Result;

/// Run the sync command
pub fn run_sync(path: &Path) -> Result<()> {
    ensure_directory(path)?;
    let workspace = Workspace::open(path)?;
    let root = workspace.scanner().root();

    let changes = workspace.sync()?;

    if changes.is_empty() {
        println!("{}", "All references already pinned".green());
        return Ok(());
    }

    println!("{} {} reference(s)", "Pinned".green().bold(), changes.len());
    for change in &changes {
        let from = if change.from.is_empty() {
            "(none)".to_string()
        } else {
            change.from.clone()
        };
        println!(
            "  {} {} -> {}",
            display_path(&change.reference_file, root).cyan(),
            from.dimmed(),
            change.to.yellow()
        );
    }
    Ok(())
}
