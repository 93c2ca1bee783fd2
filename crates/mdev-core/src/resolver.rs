//! Dependency resolution
//!
//! Clones every unresolved component, then re-scans: a fresh clone may carry
//! reference files of its own. The loop stops once a scan finds nothing
//! left to clone.

use std::collections::HashSet;

use mdev_fs::{MdevPath, NormalizedPath};
use mdev_git::exclude::exclude_from_enclosing_repo;
use mdev_git::{FETCH_HEAD, VersionControl};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::reference::{ComponentReference, GitReference};
use crate::scanner::ReferenceScanner;
use crate::{Error, Result};

/// Outcome of a [`DependencyResolver::fetch`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchReport {
    /// Checkout directories created by this run, in clone order.
    pub cloned: Vec<NormalizedPath>,
    /// Scan passes that found work to do.
    pub passes: usize,
}

impl FetchReport {
    /// True if nothing needed cloning.
    pub fn is_empty(&self) -> bool {
        self.cloned.is_empty()
    }
}

/// Materializes unresolved components until the tree is closed.
pub struct DependencyResolver<'a, V: VersionControl> {
    scanner: &'a ReferenceScanner,
    vcs: &'a V,
}

impl<'a, V: VersionControl> DependencyResolver<'a, V> {
    pub fn new(scanner: &'a ReferenceScanner, vcs: &'a V) -> Self {
        Self { scanner, vcs }
    }

    /// Clone unresolved components until none remain.
    ///
    /// A checkout directory that exists but is not a valid repository is a
    /// leftover of an interrupted clone: it is removed and cloned again, as
    /// long as it holds nothing besides a `.git` entry.
    ///
    /// When two reference files land on the same checkout directory, the one
    /// the scan reaches first wins; the other is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Stops at the first component that cannot be cloned, leaving the
    /// components cloned so far in place. Returns `Unresolvable` if a
    /// component is still pending after being cloned.
    pub fn fetch(&self) -> Result<FetchReport> {
        let mut report = FetchReport::default();
        let mut attempted: HashSet<NormalizedPath> = HashSet::new();

        loop {
            let pending = self.pending()?;
            if pending.is_empty() {
                break;
            }
            report.passes += 1;
            debug!(pass = report.passes, pending = pending.len(), "Resolving components");

            for component in &pending {
                if attempted.contains(component.reference_file()) {
                    return Err(Error::Unresolvable {
                        path: component.source_path().to_native(),
                    });
                }
                // Re-check disk: an earlier clone in this pass may own the directory
                if self.is_checkout(component) {
                    warn!(
                        reference = %component.reference_file(),
                        path = %component.source_path(),
                        "Checkout directory already resolved by another reference, skipping"
                    );
                    continue;
                }

                self.resolve(component)?;
                attempted.insert(component.reference_file().clone());
                report.cloned.push(component.source_path().clone());
            }
        }

        info!(cloned = report.cloned.len(), passes = report.passes, "Components resolved");
        Ok(report)
    }

    /// Components that still need a checkout: missing ones, plus existing
    /// directories that do not open as a repository.
    fn pending(&self) -> Result<Vec<ComponentReference>> {
        let mut pending = Vec::new();
        for component in self.scanner.all() {
            let component = component?;
            if !self.is_checkout(&component) {
                pending.push(component);
            }
        }
        Ok(pending)
    }

    fn is_checkout(&self, component: &ComponentReference) -> bool {
        component.is_resolved() && self.vcs.open(component.source_path()).is_ok()
    }

    fn resolve(&self, component: &ComponentReference) -> Result<()> {
        let reference = component.git_reference()?;
        let dest = component.source_path();

        if dest.exists() {
            warn!(path = %dest, "Removing incomplete checkout");
            discard_incomplete_checkout(dest)?;
        }

        info!(
            url = %reference.repo_url(),
            reference = reference.reference().unwrap_or("default"),
            path = %dest,
            "Cloning component"
        );
        self.clone_at(&reference, dest)?;

        let stop_at = self.scanner.root().parent();
        if let Some(exclude) = exclude_from_enclosing_repo(dest, stop_at.as_ref())? {
            debug!(path = %dest, exclude = %exclude, "Excluded checkout from enclosing repository");
        }
        Ok(())
    }

    /// Clone `reference` into `dest`, falling back to a default-branch clone
    /// plus an explicit fetch when the revision is not a branch.
    fn clone_at(&self, reference: &GitReference, dest: &NormalizedPath) -> Result<()> {
        let url = reference.repo_url();
        let Some(revision) = reference.reference() else {
            self.vcs.clone_repo(url, dest, None)?;
            return Ok(());
        };

        match self.vcs.clone_repo(url, dest, Some(revision)) {
            Ok(_) => Ok(()),
            Err(mdev_git::Error::RevisionNotFound { .. }) => {
                debug!(url = %url, revision = %revision, "Revision is not a branch, fetching it");
                if dest.exists() {
                    discard_incomplete_checkout(dest)?;
                }
                let handle = self.vcs.clone_repo(url, dest, None)?;
                self.vcs.fetch(&handle, revision)?;
                self.vcs.checkout(&handle, FETCH_HEAD, false)?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Remove `dest` if it is empty or holds only a `.git` entry.
///
/// Anything else may be user data and is reported as a conflict.
fn discard_incomplete_checkout(dest: &NormalizedPath) -> Result<()> {
    let conflict = || {
        Error::Git(mdev_git::Error::Conflict {
            path: dest.to_native(),
        })
    };
    if !dest.is_dir() {
        return Err(conflict());
    }

    for entry in std::fs::read_dir(dest.to_native())? {
        if entry?.file_name() != MdevPath::GitDir.as_str() {
            return Err(conflict());
        }
    }

    std::fs::remove_dir_all(dest.to_native())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discard_empty_directory() {
        let temp = TempDir::new().unwrap();
        let dest = NormalizedPath::new(temp.path().join("lib"));
        fs::create_dir(dest.to_native()).unwrap();

        discard_incomplete_checkout(&dest).unwrap();
        assert!(!dest.exists());
    }

    #[test]
    fn test_discard_git_only_directory() {
        let temp = TempDir::new().unwrap();
        let dest = NormalizedPath::new(temp.path().join("lib"));
        fs::create_dir_all(dest.join(".git/objects").to_native()).unwrap();

        discard_incomplete_checkout(&dest).unwrap();
        assert!(!dest.exists());
    }

    #[test]
    fn test_discard_refuses_user_content() {
        let temp = TempDir::new().unwrap();
        let dest = NormalizedPath::new(temp.path().join("lib"));
        fs::create_dir_all(dest.join(".git").to_native()).unwrap();
        fs::write(dest.join("main.c").to_native(), "int main;").unwrap();

        let result = discard_incomplete_checkout(&dest);
        assert!(matches!(
            result,
            Err(Error::Git(mdev_git::Error::Conflict { .. }))
        ));
        assert!(dest.join("main.c").is_file());
    }

    #[test]
    fn test_discard_refuses_file() {
        let temp = TempDir::new().unwrap();
        let dest = NormalizedPath::new(temp.path().join("lib"));
        fs::write(dest.to_native(), "").unwrap();

        assert!(discard_incomplete_checkout(&dest).is_err());
    }
}
