//! Error types for mdev-core

use std::path::PathBuf;

/// Result type for mdev-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mdev-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reference file content is not `<url>[#<ref>]`
    #[error("Malformed component reference {path}: expected '<url>[#<ref>]', found {content:?}")]
    MalformedReference { path: PathBuf, content: String },

    /// No program root above the given path
    #[error(
        "No program found from {path} to the filesystem root. Run mdev from a program directory \
         containing an mxos.component file, or from any subdirectory of one."
    )]
    ProgramNotFound { path: PathBuf },

    /// A program already exists where a new one was requested
    #[error(
        "An existing program was found in the directory tree {path}. Programs cannot be nested; \
         make sure there is no mxos.component file in the path hierarchy."
    )]
    ExistingProgram { path: PathBuf },

    /// A component is still unresolved after it was cloned
    #[error("Component {path} is still unresolved after cloning it")]
    Unresolvable { path: PathBuf },

    /// Directory traversal failed while scanning for references
    #[error("Failed to scan {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Version control error from mdev-git
    #[error(transparent)]
    Git(#[from] mdev_git::Error),

    /// Filesystem error from mdev-fs
    #[error(transparent)]
    Fs(#[from] mdev_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
