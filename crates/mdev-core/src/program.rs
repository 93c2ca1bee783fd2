//! Program discovery and scaffolding
//!
//! A program is a directory holding a framework reference file
//! (`mxos.component`). Programs cannot be nested.

use std::fs;
use std::path::Path;

use mdev_fs::{MdevPath, NormalizedPath, io};
use tracing::{debug, info};

use crate::config::{FrameworkConfig, ProgramConfig};
use crate::reference::{ComponentReference, GitReference};
use crate::scanner::ReferenceScanner;
use crate::templates;
use crate::{Error, Result};

/// Walk upward from `path` to the nearest program root.
///
/// # Errors
///
/// Returns `ProgramNotFound` if no directory from `path` up to the
/// filesystem root holds a framework reference file.
pub fn find_program_root(path: &Path) -> Result<NormalizedPath> {
    let start = NormalizedPath::canonicalize(path)?;
    start
        .ancestors()
        .find(is_program_root)
        .ok_or_else(|| Error::ProgramNotFound {
            path: path.to_path_buf(),
        })
}

/// Whether `path` or any of its ancestors is a program root.
///
/// `path` does not need to exist.
pub fn tree_contains_program(path: &Path) -> Result<bool> {
    let absolute = NormalizedPath::new(std::path::absolute(path)?);
    Ok(absolute.ancestors().any(|dir| is_program_root(&dir)))
}

fn is_program_root(dir: &NormalizedPath) -> bool {
    dir.join(MdevPath::FrameworkReference.as_str()).is_file()
}

/// An mdev program on disk.
#[derive(Debug, Clone)]
pub struct Program {
    root: NormalizedPath,
    config: ProgramConfig,
}

impl Program {
    /// Open the program enclosing `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let root = find_program_root(path)?;
        let config = ProgramConfig::load(&root)?;
        debug!(root = %root, "Opened program");
        Ok(Self { root, config })
    }

    /// Scaffold a new program at `path`.
    ///
    /// Writes the framework reference pinned to `framework`, plus the
    /// build templates. Template files that already exist are left alone.
    ///
    /// # Errors
    ///
    /// Returns `ExistingProgram` if `path` or one of its ancestors already
    /// is a program.
    pub fn create(path: &Path, framework: &FrameworkConfig) -> Result<Self> {
        if tree_contains_program(path)? {
            return Err(Error::ExistingProgram {
                path: path.to_path_buf(),
            });
        }

        fs::create_dir_all(path)?;
        let root = NormalizedPath::canonicalize(path)?;
        let name = root.file_name().unwrap_or("app").to_string();
        info!(root = %root, name = %name, "Creating program");

        let framework_reference = GitReference::new(
            framework.url.clone(),
            Some(framework.reference.as_str()),
        );
        ComponentReference::new(root.join(MdevPath::FrameworkReference.as_str()))
            .write_git_reference(&framework_reference)?;

        for file in templates::render_program(&name) {
            let target = root.join(&file.path);
            if target.exists() {
                debug!(path = %target, "Template target exists, keeping it");
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent.to_native())?;
            }
            io::write_text(&target, &file.content)?;
        }

        let config = ProgramConfig::load(&root)?;
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    /// The reference file pinning the framework.
    pub fn framework_reference(&self) -> ComponentReference {
        ComponentReference::new(self.root.join(MdevPath::FrameworkReference.as_str()))
    }

    /// A scanner over `root`, honoring this program's ignore list.
    pub fn scanner(&self, root: NormalizedPath) -> ReferenceScanner {
        ReferenceScanner::new(root, self.config.ignore.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn framework() -> FrameworkConfig {
        FrameworkConfig {
            url: "https://example.com/mxos.git".into(),
            reference: "v1".into(),
        }
    }

    #[test]
    fn test_find_program_root_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        let program = Program::create(&temp.path().join("blinky"), &framework()).unwrap();
        let nested = temp.path().join("blinky/blinky");

        let root = find_program_root(&nested).unwrap();
        assert_eq!(&root, program.root());
    }

    #[test]
    fn test_find_program_root_not_found() {
        let temp = TempDir::new().unwrap();
        let result = find_program_root(temp.path());
        assert!(matches!(result, Err(Error::ProgramNotFound { .. })));
    }

    #[test]
    fn test_create_writes_framework_reference_and_templates() {
        let temp = TempDir::new().unwrap();
        let program = Program::create(&temp.path().join("blinky"), &framework()).unwrap();

        let reference = program.framework_reference().git_reference().unwrap();
        assert_eq!(reference.repo_url(), "https://example.com/mxos.git");
        assert_eq!(reference.reference(), Some("v1"));
        for rel in [
            "CMakeLists.txt",
            "blinky/CMakeLists.txt",
            "blinky/main.c",
            "blinky/mxos_config.h",
            ".gitignore",
        ] {
            assert!(program.root().join(rel).is_file(), "missing {rel}");
        }
    }

    #[test]
    fn test_create_keeps_existing_templates() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("blinky");
        fs::create_dir_all(path.join("blinky")).unwrap();
        fs::write(path.join("blinky/main.c"), "/* mine */\n").unwrap();

        Program::create(&path, &framework()).unwrap();

        assert_eq!(
            fs::read_to_string(path.join("blinky/main.c")).unwrap(),
            "/* mine */\n"
        );
    }

    #[test]
    fn test_create_rejects_nested_program() {
        let temp = TempDir::new().unwrap();
        Program::create(&temp.path().join("outer"), &framework()).unwrap();

        let result = Program::create(&temp.path().join("outer/inner"), &framework());
        assert!(matches!(result, Err(Error::ExistingProgram { .. })));
        assert!(!temp.path().join("outer/inner").exists());
    }

    #[test]
    fn test_create_rejects_existing_program() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("blinky");
        Program::create(&path, &framework()).unwrap();

        assert!(matches!(
            Program::create(&path, &framework()),
            Err(Error::ExistingProgram { .. })
        ));
    }
}
