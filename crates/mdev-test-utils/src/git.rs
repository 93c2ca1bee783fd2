//! Git fixtures driven through the `git` CLI.
//!
//! Remotes are plain local repositories cloned through their filesystem
//! path, so no test touches the network.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run `git` with `args` in `dir` and return its trimmed stdout.
///
/// # Panics
/// Panics if git cannot be spawned or exits unsuccessfully.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "`git {args:?}` failed in {}:\n{}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initialise a git repository with an identity, a `main` branch and one
/// commit containing `README.md`.
///
/// # Panics
/// Panics if any git operation fails.
pub fn init_repo_with_commit(path: &Path) {
    fs::create_dir_all(path)
        .unwrap_or_else(|e| panic!("init_repo_with_commit: failed to create dir: {e}"));

    git(path, &["init"]);
    git(path, &["config", "user.email", "test@test.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);

    fs::write(path.join("README.md"), "# Test\n")
        .unwrap_or_else(|e| panic!("init_repo_with_commit: failed to write README.md: {e}"));

    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);
    git(path, &["branch", "-M", "main"]);
}

/// Full commit id of `HEAD` in the repository at `path`.
pub fn head_commit(path: &Path) -> String {
    git(path, &["rev-parse", "HEAD"])
}

/// A local repository acting as a remote for clone and fetch tests.
///
/// The working tree of the remote is never checked out by the code under
/// test, so files can be committed to it freely.
pub struct RemoteRepo {
    dir: TempDir,
}

impl Default for RemoteRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteRepo {
    /// Create a remote with a single commit on `main`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("RemoteRepo::new: failed to create temp dir");
        init_repo_with_commit(dir.path());
        Self { dir }
    }

    /// Filesystem path of the remote.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// URL usable in a reference file.
    pub fn url(&self) -> String {
        self.path().to_string_lossy().replace('\\', "/")
    }

    /// Write `content` to `rel_path`, commit it and return the new commit id.
    pub fn commit_file(&self, rel_path: &str, content: &str, message: &str) -> String {
        let file = self.path().join(rel_path);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&file, content).unwrap();
        git(self.path(), &["add", rel_path]);
        git(self.path(), &["commit", "-m", message]);
        self.head()
    }

    /// Full commit id of the remote's `HEAD`.
    pub fn head(&self) -> String {
        head_commit(self.path())
    }

    /// Create a lightweight tag at `HEAD`.
    pub fn tag(&self, name: &str) {
        git(self.path(), &["tag", name]);
    }

    /// Create a branch at `HEAD` without switching to it.
    pub fn branch(&self, name: &str) {
        git(self.path(), &["branch", name]);
    }

    /// Add `submodule` as a submodule at `rel_path` and commit it.
    pub fn add_submodule(&self, submodule: &RemoteRepo, rel_path: &str) -> String {
        git(
            self.path(),
            &[
                "-c",
                "protocol.file.allow=always",
                "submodule",
                "add",
                &submodule.url(),
                rel_path,
            ],
        );
        git(self.path(), &["commit", "-m", "Add submodule"]);
        self.head()
    }
}
