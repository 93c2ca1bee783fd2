//! Status command implementation

use std::path::Path;

use colored::Colorize;
use mdev_core::{ComponentStatus, Workspace};

use super::ensure_directory;
use crate::error::Result;

/// Run the status command
pub fn run_status(path: &Path, json: bool) -> Result<()> {
    ensure_directory(path)?;
    let workspace = Workspace::open(path)?;
    let statuses = workspace.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    println!("{}", "Component Status".bold());
    println!();
    println!("{}:   {}", "Path".dimmed(), workspace.scanner().root());
    println!();

    if statuses.is_empty() {
        println!("  {} (use {} to fetch)", "None".dimmed(), "mdev deploy".cyan());
        return Ok(());
    }

    for status in &statuses {
        println!("  {}", format_status_line(status));
    }

    let drifted = statuses.iter().filter(|s| !s.is_clean()).count();
    println!();
    if drifted == 0 {
        println!("{}", "All components in sync".green());
    } else {
        println!("{} {} component(s) drifted", "!".yellow().bold(), drifted);
    }
    Ok(())
}

/// `name  path  label(markers)` with drift markers highlighted.
fn format_status_line(status: &ComponentStatus) -> String {
    let summary = &status.summary;
    let markers = status.markers();
    let markers = if status.dirty {
        markers.red().to_string()
    } else {
        markers.yellow().to_string()
    };
    format!(
        "{:<16} {:<32} {}{}",
        summary.name.cyan(),
        summary.path,
        summary.label,
        markers
    )
}
