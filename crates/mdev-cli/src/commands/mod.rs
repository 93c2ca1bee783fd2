//! Command implementations for mdev-cli

pub mod deploy;
pub mod import;
pub mod list;
pub mod new;
pub mod status;
pub mod sync;

pub use deploy::run_deploy;
pub use import::run_import;
pub use list::run_list;
pub use new::run_new;
pub use status::run_status;
pub use sync::run_sync;

use std::path::Path;

use colored::Colorize;
use mdev_core::FetchReport;
use mdev_fs::NormalizedPath;

use crate::error::{CliError, Result};

/// Fail early with a readable message when `path` is not a directory.
fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} is not a directory",
            path.display()
        )))
    }
}

/// `path` relative to `root`, or `path` itself when it lies elsewhere.
fn display_path(path: &NormalizedPath, root: &NormalizedPath) -> String {
    path.relative_to(root)
        .map(|p| p.to_string())
        .unwrap_or_else(|| path.to_string())
}

fn print_fetch_report(report: &FetchReport, root: &NormalizedPath) {
    if report.is_empty() {
        println!("{}", "All components already fetched".dimmed());
        return;
    }
    println!(
        "{} {} component(s)",
        "Fetched".green().bold(),
        report.cloned.len()
    );
    for path in &report.cloned {
        println!("  {} {}", "+".green(), display_path(path, root).cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_path() {
        let root = NormalizedPath::new("/work/app");
        assert_eq!(
            display_path(&NormalizedPath::new("/work/app/libs/net"), &root),
            "libs/net"
        );
        assert_eq!(
            display_path(&NormalizedPath::new("/elsewhere/lib"), &root),
            "/elsewhere/lib"
        );
    }

    #[test]
    fn test_ensure_directory_rejects_missing_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        let err = ensure_directory(&missing).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
        assert!(ensure_directory(temp.path()).is_ok());
    }
}
