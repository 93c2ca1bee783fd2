//! Entry point tying a scan root, its program and a VCS backend together

use std::path::Path;

use mdev_fs::NormalizedPath;
use mdev_git::{GitBackend, VersionControl};

use crate::config::FrameworkConfig;
use crate::program::Program;
use crate::resolver::{DependencyResolver, FetchReport};
use crate::scanner::ReferenceScanner;
use crate::status::{ComponentStatus, ComponentSummary, StatusReporter, SyncChange};
use crate::synchronizer::{DeployReport, RevisionSynchronizer};
use crate::Result;

/// A directory inside a program, scanned for components.
///
/// The scan root may be the program root or any directory below it; the
/// program supplies configuration such as the ignore list.
pub struct Workspace<V: VersionControl = GitBackend> {
    program: Program,
    scanner: ReferenceScanner,
    vcs: V,
}

impl Workspace<GitBackend> {
    /// Open the workspace at `path` with the libgit2 backend.
    pub fn open(path: &Path) -> Result<Self> {
        Self::with_backend(path, GitBackend::new())
    }

    /// Scaffold a new program at `path` and, unless `create_only`, fetch its
    /// components.
    pub fn create(
        path: &Path,
        framework: &FrameworkConfig,
        create_only: bool,
    ) -> Result<(Self, Option<FetchReport>)> {
        Program::create(path, framework)?;
        let workspace = Self::open(path)?;
        let fetched = if create_only {
            None
        } else {
            Some(workspace.fetch()?)
        };
        Ok((workspace, fetched))
    }
}

impl<V: VersionControl> Workspace<V> {
    /// Open the workspace at `path` with a specific backend.
    ///
    /// # Errors
    ///
    /// Returns `ProgramNotFound` if `path` is not inside a program.
    pub fn with_backend(path: &Path, vcs: V) -> Result<Self> {
        let program = Program::open(path)?;
        let root = NormalizedPath::canonicalize(path)?;
        let scanner = program.scanner(root);
        Ok(Self {
            program,
            scanner,
            vcs,
        })
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn scanner(&self) -> &ReferenceScanner {
        &self.scanner
    }

    pub fn backend(&self) -> &V {
        &self.vcs
    }

    /// Clone all unresolved components. See [`DependencyResolver::fetch`].
    pub fn fetch(&self) -> Result<FetchReport> {
        DependencyResolver::new(&self.scanner, &self.vcs).fetch()
    }

    /// See [`RevisionSynchronizer::deploy`].
    pub fn deploy(&self, force: bool) -> Result<DeployReport> {
        RevisionSynchronizer::new(&self.scanner, &self.vcs).deploy(force)
    }

    /// See [`StatusReporter::sync`].
    pub fn sync(&self) -> Result<Vec<SyncChange>> {
        self.reporter().sync()
    }

    /// See [`StatusReporter::status`].
    pub fn status(&self) -> Result<Vec<ComponentStatus>> {
        self.reporter().status()
    }

    /// See [`StatusReporter::summaries`].
    pub fn components(&self) -> Result<Vec<ComponentSummary>> {
        self.reporter().summaries()
    }

    fn reporter(&self) -> StatusReporter<'_, V> {
        StatusReporter::new(&self.scanner, &self.vcs)
    }
}
