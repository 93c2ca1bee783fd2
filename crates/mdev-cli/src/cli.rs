//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// mdev - Manage MXOS programs and their component dependencies
#[derive(Parser, Debug)]
#[command(name = "mdev")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create a new program
    ///
    /// Writes the framework reference and build templates, then fetches
    /// the framework.
    ///
    /// Examples:
    ///   mdev new blinky                # Create and fetch blinky/
    ///   mdev new blinky --create-only  # Skip fetching the framework
    New {
        /// Directory of the new program
        path: PathBuf,

        /// Only write files; do not fetch any component
        #[arg(short, long)]
        create_only: bool,

        /// Repository the framework reference points at
        #[arg(long, env = "MDEV_FRAMEWORK_URL")]
        framework_url: Option<String>,
    },

    /// Clone a program and fetch its components
    ///
    /// Examples:
    ///   mdev import blinky                          # From the default organization
    ///   mdev import https://host/org/app.git app2   # Into app2/
    ///   mdev import blinky --checkout v1.2          # At a tag
    Import {
        /// Program name or repository URL
        url: String,

        /// Destination directory (defaults to the repository name)
        path: Option<PathBuf>,

        /// Revision to check out after cloning
        #[arg(short = 'c', long = "checkout", value_name = "REF")]
        reference: Option<String>,

        /// Do not fetch the program's components
        #[arg(short, long)]
        skip_resolve_libs: bool,
    },

    /// Check out declared revisions and fetch missing components
    Deploy {
        /// Directory to operate on
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Discard local modifications in checkouts
        #[arg(short, long)]
        force: bool,
    },

    /// Pin reference files to the commits currently checked out
    Sync {
        /// Directory to operate on
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show drift between reference files and checkouts
    Status {
        /// Directory to operate on
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List resolved components
    List {
        /// Directory to operate on
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
