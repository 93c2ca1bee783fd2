//! [`ProgramTree`] builder for component-tree test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git;

/// A temporary program directory with helpers for writing reference files
/// and asserting on checkouts.
///
/// # Example
///
/// ```rust,no_run
/// use mdev_test_utils::git::RemoteRepo;
/// use mdev_test_utils::tree::ProgramTree;
///
/// let lib = RemoteRepo::new();
/// let tree = ProgramTree::new();
/// tree.init_git();
/// tree.write_reference("libs/net.component", &lib.url());
/// tree.assert_file_exists("libs/net.component");
/// ```
pub struct ProgramTree {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Default for ProgramTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramTree {
    /// Create an empty temporary directory.
    ///
    /// The root is canonicalized so it compares equal to paths the code
    /// under test resolves.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Return the root path of the program.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `rel` inside the program.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Initialise the program root as a git repository with one commit.
    pub fn init_git(&self) {
        git::init_repo_with_commit(self.root());
    }

    /// Write a reference file at `rel` with `content` plus a newline.
    pub fn write_reference(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, format!("{content}\n")).unwrap();
    }

    /// Read the file at `rel`.
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel))
            .unwrap_or_else(|_| panic!("Could not read file: {}", self.path(rel).display()))
    }

    /// Assert that `rel` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `rel` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Full commit id checked out at `rel`.
    pub fn head_of(&self, rel: &str) -> String {
        git::head_commit(&self.path(rel))
    }
}
