//! Revision synchronization
//!
//! Moves every resolved checkout to the revision its reference file
//! declares. Deploy follows up with a dependency fetch, because a checkout
//! can surface reference files that did not exist before.

use mdev_fs::NormalizedPath;
use mdev_git::{FETCH_HEAD, VersionControl};
use serde::Serialize;
use tracing::{debug, info};

use crate::reference::{ComponentReference, ReferenceKind};
use crate::resolver::{DependencyResolver, FetchReport};
use crate::scanner::ReferenceScanner;
use crate::Result;

/// Outcome of [`RevisionSynchronizer::deploy`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    /// Checkouts moved to their declared revision, parents before children.
    pub checked_out: Vec<NormalizedPath>,
    /// Components cloned after the checkout pass, if any were missing.
    pub fetched: Option<FetchReport>,
}

/// Re-pins resolved checkouts to their declared revisions.
pub struct RevisionSynchronizer<'a, V: VersionControl> {
    scanner: &'a ReferenceScanner,
    vcs: &'a V,
}

impl<'a, V: VersionControl> RevisionSynchronizer<'a, V> {
    pub fn new(scanner: &'a ReferenceScanner, vcs: &'a V) -> Self {
        Self { scanner, vcs }
    }

    /// Fetch and check out the declared revision of every resolved component.
    ///
    /// Components without a declared revision follow their remote's default
    /// branch. The framework checkout also updates every submodule that was
    /// cloned before; never-initialized submodules stay untouched.
    ///
    /// # Errors
    ///
    /// Without `force`, stops at the first checkout with uncommitted changes
    /// to tracked files. Any fetch or checkout failure stops the run.
    pub fn checkout(&self, force: bool) -> Result<Vec<NormalizedPath>> {
        let mut components: Vec<ComponentReference> =
            self.scanner.resolved().collect::<Result<_>>()?;
        // A parent's checkout may rewrite the reference files of its children
        components.sort_by_key(|c| c.reference_file().components().count());

        let mut checked_out = Vec::with_capacity(components.len());
        for component in components {
            if !component.reference_file().is_file() || !component.is_resolved() {
                debug!(reference = %component.reference_file(), "Component vanished, skipping");
                continue;
            }
            self.checkout_one(&component, force)?;
            checked_out.push(component.source_path().clone());
        }

        info!(components = checked_out.len(), "Checkouts synchronized");
        Ok(checked_out)
    }

    /// Check out every resolved component, then clone whatever is still
    /// unresolved.
    pub fn deploy(&self, force: bool) -> Result<DeployReport> {
        let checked_out = self.checkout(force)?;

        let has_unresolved = self.scanner.unresolved().next().transpose()?.is_some();
        let fetched = if has_unresolved {
            info!("Unresolved components found, fetching");
            Some(DependencyResolver::new(self.scanner, self.vcs).fetch()?)
        } else {
            None
        };

        Ok(DeployReport {
            checked_out,
            fetched,
        })
    }

    fn checkout_one(&self, component: &ComponentReference, force: bool) -> Result<()> {
        let handle = self.vcs.open(component.source_path())?;
        let reference = component.git_reference()?;
        let target = match reference.reference() {
            Some(revision) => revision.to_string(),
            None => self.vcs.default_branch(&handle)?,
        };

        info!(path = %component.source_path(), revision = %target, "Checking out");
        self.vcs.fetch(&handle, &target)?;
        self.vcs.checkout(&handle, FETCH_HEAD, force)?;

        if component.kind() == ReferenceKind::Framework {
            for name in self.vcs.existing_submodules(&handle)? {
                debug!(path = %component.source_path(), submodule = %name, "Updating submodule");
                self.vcs.update_submodule(&handle, &name)?;
            }
        }
        Ok(())
    }
}
