//! Error types for mdev-git

use std::path::PathBuf;

/// Result type for mdev-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mdev-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] mdev_fs::Error),

    /// The remote could not be reached, refused authentication or failed
    /// the transfer.
    #[error("Remote operation on '{url}' failed: {message}")]
    Remote { url: String, message: String },

    /// A fresh clone was requested into a populated directory.
    #[error("Destination {path} already exists and is not empty")]
    Conflict { path: PathBuf },

    #[error(
        "Working tree at {path} has uncommitted changes. Commit or stash them, or use --force to discard them"
    )]
    DirtyWorkingTree { path: PathBuf },

    /// The remote does not advertise the requested revision as a branch.
    #[error("Revision '{revision}' not found on remote '{url}'")]
    RevisionNotFound { url: String, revision: String },

    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },
}
