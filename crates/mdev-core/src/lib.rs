//! Core orchestration layer for mdev
//!
//! This crate turns a tree of component reference files into revision-pinned
//! checkouts and keeps the two in step:
//!
//! - **Reference scanning**: discover `*.component` files under a root
//! - **Dependency resolution**: clone unresolved components to a fixed point
//! - **Revision synchronization**: re-pin checkouts to declared revisions
//! - **Status reporting**: report drift, or promote live commits into the
//!   reference files
//! - **Programs**: locate, scaffold and import mdev programs
//!
//! # Architecture
//!
//! ```text
//!                 mdev-cli
//!                    |
//!                mdev-core
//!                    |
//!            +-------+-------+
//!            |               |
//!         mdev-fs        mdev-git
//! ```
//!
//! Disk is the only state: every operation re-scans the tree and re-reads
//! reference files before acting on them.

pub mod config;
pub mod error;
pub mod import;
pub mod program;
pub mod reference;
pub mod resolver;
pub mod scanner;
pub mod status;
pub mod synchronizer;
pub mod templates;
pub mod workspace;

pub use config::{FrameworkConfig, ProgramConfig};
pub use error::{Error, Result};
pub use import::{ImportOptions, ImportTarget, import_project, parse_url};
pub use program::{Program, find_program_root, tree_contains_program};
pub use reference::{ComponentReference, GitReference, ReferenceKind};
pub use resolver::{DependencyResolver, FetchReport};
pub use scanner::ReferenceScanner;
pub use status::{ComponentStatus, ComponentSummary, StatusReporter, SyncChange};
pub use synchronizer::{DeployReport, RevisionSynchronizer};
pub use workspace::Workspace;
