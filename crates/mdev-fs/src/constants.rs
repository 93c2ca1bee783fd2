//! Constants and enums for program filesystem paths.

use std::path::Path;

/// Standard filesystem markers and paths of an mdev program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MdevPath {
    /// The `.git` directory (Git database)
    GitDir,
    /// The local, uncommitted exclude file inside a `.git` directory
    InfoExclude,
    /// The framework reference file marking a program root
    FrameworkReference,
    /// The checkout directory of the framework reference
    FrameworkDir,
    /// Optional per-program configuration file
    ConfigFile,
    /// The CMake build tree
    BuildDir,
}

impl MdevPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitDir => ".git",
            Self::InfoExclude => "info/exclude",
            Self::FrameworkReference => "mxos.component",
            Self::FrameworkDir => "mxos",
            Self::ConfigFile => "mdev.toml",
            Self::BuildDir => "build",
        }
    }
}

/// File extension (without the dot) of component reference files.
pub const REFERENCE_EXTENSION: &str = "component";

impl AsRef<Path> for MdevPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for MdevPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for MdevPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
