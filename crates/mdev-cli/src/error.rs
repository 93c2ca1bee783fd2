//! Error types for mdev-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from mdev-core
    #[error(transparent)]
    Core(#[from] mdev_core::Error),

    /// Error from mdev-git
    #[error(transparent)]
    Git(#[from] mdev_git::Error),

    /// Error from mdev-fs
    #[error(transparent)]
    Fs(#[from] mdev_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON rendering error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
