//! Version control capability surface

use crate::Result;
use mdev_fs::NormalizedPath;

/// Revision written by [`VersionControl::fetch`] for the fetched target.
pub const FETCH_HEAD: &str = "FETCH_HEAD";

/// Trait for the version control operations the resolver needs.
///
/// All operations block until the underlying transport finishes; no timeout
/// is imposed here.
pub trait VersionControl {
    /// Opaque handle over a checkout on disk.
    type Handle;

    /// Open an existing checkout rooted exactly at `path`.
    ///
    /// Fails with `NotARepository` if `path` is not a valid working tree
    /// root, including a directory left behind by an interrupted clone.
    fn open(&self, path: &NormalizedPath) -> Result<Self::Handle>;

    /// Clone `url` into `dest`.
    ///
    /// - `reference`: branch to check out; `None` checks out the remote's
    ///   default branch.
    ///
    /// Fails with `Conflict` if `dest` is a non-empty directory, with
    /// `RevisionNotFound` if the remote does not advertise `reference`, and
    /// with `Remote` for transport or authentication failures.
    fn clone_repo(
        &self,
        url: &str,
        dest: &NormalizedPath,
        reference: Option<&str>,
    ) -> Result<Self::Handle>;

    /// Fetch `reference` (branch, tag or commit id) from `origin`, leaving
    /// [`FETCH_HEAD`] pointing at it.
    ///
    /// Fails with `Remote` when the remote cannot be reached or rejects the
    /// credentials. The one tolerated failure is a server refusing to serve
    /// a full commit id that already exists locally; [`FETCH_HEAD`] then
    /// names the local commit.
    fn fetch(&self, handle: &Self::Handle, reference: &str) -> Result<()>;

    /// Check out `revision` with a detached HEAD.
    ///
    /// Without `force`, a working tree with uncommitted changes is rejected
    /// with `DirtyWorkingTree` and left untouched. With `force`, local
    /// modifications to tracked files are discarded.
    fn checkout(&self, handle: &Self::Handle, revision: &str, force: bool) -> Result<()>;

    /// Full commit id of HEAD.
    fn current_revision(&self, handle: &Self::Handle) -> Result<String>;

    /// Name of the remote's default branch.
    fn default_branch(&self, handle: &Self::Handle) -> Result<String>;

    /// Whether tracked files have uncommitted changes.
    fn is_dirty(&self, handle: &Self::Handle) -> Result<bool>;

    /// Names of the submodules declared by the checkout.
    fn submodules(&self, handle: &Self::Handle) -> Result<Vec<String>>;

    /// Names of the declared submodules whose repositories have been cloned
    /// before; never-initialized submodules are left out.
    fn existing_submodules(&self, handle: &Self::Handle) -> Result<Vec<String>>;

    /// Initialize and update the named submodule.
    fn update_submodule(&self, handle: &Self::Handle, name: &str) -> Result<()>;
}
