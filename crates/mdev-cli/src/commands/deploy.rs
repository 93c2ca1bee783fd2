//! Deploy command implementation

use std::path::Path;

use colored::Colorize;
use mdev_core::Workspace;

use super::{display_path, ensure_directory, print_fetch_report};
use crate::error::Result;

/// Run the deploy command
pub fn run_deploy(path: &Path, force: bool) -> Result<()> {
    ensure_directory(path)?;
    let workspace = Workspace::open(path)?;
    let root = workspace.scanner().root();

    let report = workspace.deploy(force)?;

    println!(
        "{} {} component(s)",
        "Checked out".green().bold(),
        report.checked_out.len()
    );
    for checkout in &report.checked_out {
        println!("  {} {}", "*".green(), display_path(checkout, root).cyan());
    }
    if let Some(fetched) = &report.fetched {
        print_fetch_report(fetched, root);
    }
    Ok(())
}
