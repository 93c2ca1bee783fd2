//! Discovery of component reference files
//!
//! The scanner never caches: every view re-walks the tree, so callers see
//! checkouts that appeared or vanished since the last call.

use mdev_fs::constants::REFERENCE_EXTENSION;
use mdev_fs::{MdevPath, NormalizedPath};
use walkdir::{DirEntry, WalkDir};

use crate::reference::ComponentReference;
use crate::{Error, Result};

/// Finds `*.component` files below a root directory.
///
/// `.git` directories are never entered. Entries whose name appears in the
/// ignore list are skipped together with everything below them.
#[derive(Debug, Clone)]
pub struct ReferenceScanner {
    root: NormalizedPath,
    ignore: Vec<String>,
}

impl ReferenceScanner {
    /// Create a scanner rooted at `root`.
    pub fn new<I, S>(root: NormalizedPath, ignore: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root,
            ignore: ignore.into_iter().map(Into::into).collect(),
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Every reference file under the root, in file-name order.
    pub fn all(&self) -> impl Iterator<Item = Result<ComponentReference>> + '_ {
        WalkDir::new(self.root.to_native())
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_skipped(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Self::reference_at(&entry).map(Ok),
                Err(source) => Some(Err(Error::Walk {
                    path: source
                        .path()
                        .map(|p| p.to_path_buf())
                        .unwrap_or_else(|| self.root.to_native()),
                    source,
                })),
            })
    }

    /// References whose checkout directory does not exist yet.
    pub fn unresolved(&self) -> impl Iterator<Item = Result<ComponentReference>> + '_ {
        self.all()
            .filter(|c| c.as_ref().map_or(true, |c| !c.is_resolved()))
    }

    /// References whose checkout directory exists.
    pub fn resolved(&self) -> impl Iterator<Item = Result<ComponentReference>> + '_ {
        self.all()
            .filter(|c| c.as_ref().map_or(true, ComponentReference::is_resolved))
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_dir() && name == MdevPath::GitDir.as_str() {
            return true;
        }
        self.ignore.iter().any(|ignored| ignored.as_str() == name.as_ref())
    }

    fn reference_at(entry: &DirEntry) -> Option<ComponentReference> {
        let path = NormalizedPath::new(entry.path());
        if path.extension() != Some(REFERENCE_EXTENSION) || !path.is_file() {
            return None;
        }
        Some(ComponentReference::new(path))
    }
}
