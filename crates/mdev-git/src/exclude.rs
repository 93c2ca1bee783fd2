//! Local exclude-file maintenance
//!
//! A freshly cloned component lives inside the working tree of its parent
//! repository. Listing it in the parent's `.git/info/exclude` keeps it out of
//! the parent's status without touching any committed `.gitignore`.

use git2::Repository;
use mdev_fs::{MdevPath, NormalizedPath, io};

use crate::Result;

/// Add `path` to the exclude file of the nearest enclosing repository.
///
/// Walks upward from the parent of `path`, stopping before `stop_at`
/// (exclusive). The entry is written relative to the enclosing repository's
/// working tree with forward slashes, and only once.
///
/// Returns the exclude file that now lists `path`, or `None` when no
/// enclosing repository was found below `stop_at`.
pub fn exclude_from_enclosing_repo(
    path: &NormalizedPath,
    stop_at: Option<&NormalizedPath>,
) -> Result<Option<NormalizedPath>> {
    let Some(start) = path.parent() else {
        return Ok(None);
    };

    for dir in start.ancestors() {
        if stop_at == Some(&dir) {
            break;
        }
        if !dir.join(MdevPath::GitDir.as_str()).exists() {
            continue;
        }

        // Resolve the git dir through libgit2 so gitlink files are followed
        let repo = Repository::open(dir.to_native())?;
        let exclude = NormalizedPath::new(repo.path()).join(MdevPath::InfoExclude.as_str());
        let Some(entry) = path.relative_to(&dir) else {
            return Ok(None);
        };

        if io::append_line_unique(&exclude, entry.as_str())? {
            tracing::debug!(exclude = %exclude, entry = %entry, "Added exclude entry");
        }
        return Ok(Some(exclude));
    }

    Ok(None)
}
