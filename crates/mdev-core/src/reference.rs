//! Component reference files and the git references they declare
//!
//! A reference file `libs/net.component` declares that the directory
//! `libs/net` holds a checkout of some repository at some revision. The
//! file's only content is `<url>[#<ref>]`.

use std::fmt;

use mdev_fs::{MdevPath, NormalizedPath, io};
use serde::Serialize;

use crate::{Error, Result};

/// What a reference file pins, decided by its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// The framework reference (`mxos.component`); its checkout also gets
    /// its existing submodules updated.
    Framework,
    /// Any other component.
    Ordinary,
}

impl ReferenceKind {
    /// Classify a reference file by its file name.
    pub fn of(reference_file: &NormalizedPath) -> Self {
        if reference_file.file_name() == Some(MdevPath::FrameworkReference.as_str()) {
            Self::Framework
        } else {
            Self::Ordinary
        }
    }
}

/// A repository URL and the optional revision it is pinned to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitReference {
    repo_url: String,
    reference: Option<String>,
}

impl GitReference {
    /// Create a reference from its parts. An empty revision means none.
    pub fn new(repo_url: impl Into<String>, reference: Option<&str>) -> Self {
        Self {
            repo_url: repo_url.into(),
            reference: reference.filter(|r| !r.is_empty()).map(str::to_string),
        }
    }

    /// Parse reference file content.
    ///
    /// Splits on the first `#`. Surrounding whitespace is ignored and a
    /// single trailing `/` on the URL is dropped. Returns `None` for an empty
    /// URL or for content with whitespace inside it.
    pub fn parse(content: &str) -> Option<Self> {
        let content = content.trim();
        if content.is_empty() || content.contains(char::is_whitespace) {
            return None;
        }

        let (url, reference) = match content.split_once('#') {
            Some((url, reference)) => (url, Some(reference)),
            None => (content, None),
        };
        let url = url.strip_suffix('/').unwrap_or(url);
        if url.is_empty() {
            return None;
        }

        Some(Self::new(url, reference))
    }

    /// The repository URL.
    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    /// The pinned revision (branch, tag or commit id), if any.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// The same URL pinned to `reference`.
    pub fn pinned_to(&self, reference: &str) -> Self {
        Self::new(self.repo_url.clone(), Some(reference))
    }
}

impl fmt::Display for GitReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reference {
            Some(reference) => write!(f, "{}#{}", self.repo_url, reference),
            None => f.write_str(&self.repo_url),
        }
    }
}

/// A reference file and the checkout directory it governs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentReference {
    reference_file: NormalizedPath,
    source_path: NormalizedPath,
}

impl ComponentReference {
    /// Derive the component from its reference file path.
    pub fn new(reference_file: NormalizedPath) -> Self {
        let source_path = reference_file.without_extension();
        Self {
            reference_file,
            source_path,
        }
    }

    pub fn reference_file(&self) -> &NormalizedPath {
        &self.reference_file
    }

    /// The directory the checkout lives in (the file path minus extension).
    pub fn source_path(&self) -> &NormalizedPath {
        &self.source_path
    }

    pub fn kind(&self) -> ReferenceKind {
        ReferenceKind::of(&self.reference_file)
    }

    /// Short name: the reference file name without its extension.
    pub fn name(&self) -> &str {
        self.reference_file.file_stem().unwrap_or_default()
    }

    /// Whether the checkout directory exists.
    pub fn is_resolved(&self) -> bool {
        self.source_path.is_dir()
    }

    /// Read and parse the reference file from disk.
    ///
    /// # Errors
    ///
    /// Returns `MalformedReference` if the content is not `<url>[#<ref>]`,
    /// or an I/O error if the file cannot be read.
    pub fn git_reference(&self) -> Result<GitReference> {
        let content = io::read_text(&self.reference_file)?;
        GitReference::parse(&content).ok_or_else(|| Error::MalformedReference {
            path: self.reference_file.to_native(),
            content: content.trim_end().to_string(),
        })
    }

    /// Atomically replace the reference file content with `reference`.
    pub fn write_git_reference(&self, reference: &GitReference) -> Result<()> {
        io::write_text(&self.reference_file, &format!("{reference}\n"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com/lib.git#v1.0", "https://example.com/lib.git", Some("v1.0"))]
    #[case("https://example.com/lib.git", "https://example.com/lib.git", None)]
    #[case("https://example.com/lib/#main\n", "https://example.com/lib", Some("main"))]
    #[case("  git@host:org/lib.git#dev  \n", "git@host:org/lib.git", Some("dev"))]
    #[case("https://example.com/lib.git#", "https://example.com/lib.git", None)]
    #[case("https://example.com/lib.git#a#b", "https://example.com/lib.git", Some("a#b"))]
    fn test_parse(#[case] content: &str, #[case] url: &str, #[case] reference: Option<&str>) {
        let parsed = GitReference::parse(content).unwrap();
        assert_eq!(parsed.repo_url(), url);
        assert_eq!(parsed.reference(), reference);
    }

    #[rstest]
    #[case("")]
    #[case("   \n")]
    #[case("#main")]
    #[case("/#main")]
    #[case("https://example.com/a.git\nhttps://example.com/b.git")]
    #[case("https://example.com/a.git #main")]
    fn test_parse_rejects(#[case] content: &str) {
        assert_eq!(GitReference::parse(content), None);
    }

    #[test]
    fn test_display_matches_file_format() {
        let content = "https://example.com/lib.git#v1.0";
        assert_eq!(GitReference::parse(content).unwrap().to_string(), content);

        let bare = GitReference::new("https://example.com/lib.git", None);
        assert_eq!(bare.to_string(), "https://example.com/lib.git");
    }

    #[test]
    fn test_pinned_to_keeps_url() {
        let reference = GitReference::new("https://example.com/lib.git", Some("main"));
        let pinned = reference.pinned_to("0123abcd");
        assert_eq!(pinned.repo_url(), "https://example.com/lib.git");
        assert_eq!(pinned.reference(), Some("0123abcd"));
    }

    #[test]
    fn test_component_paths() {
        let component = ComponentReference::new(NormalizedPath::new("/p/libs/net.component"));
        assert_eq!(component.source_path().as_str(), "/p/libs/net");
        assert_eq!(component.name(), "net");
        assert_eq!(component.kind(), ReferenceKind::Ordinary);
    }

    #[test]
    fn test_framework_kind() {
        let component = ComponentReference::new(NormalizedPath::new("/p/mxos.component"));
        assert_eq!(component.kind(), ReferenceKind::Framework);
        assert_eq!(component.source_path().as_str(), "/p/mxos");

        let nested = ComponentReference::new(NormalizedPath::new("/p/libs/mxos.component"));
        assert_eq!(nested.kind(), ReferenceKind::Framework);
    }

    #[test]
    fn test_git_reference_reads_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = NormalizedPath::new(temp.path().join("lib.component"));
        std::fs::write(file.to_native(), "https://example.com/lib.git#v2\n").unwrap();

        let component = ComponentReference::new(file.clone());
        assert_eq!(component.git_reference().unwrap().reference(), Some("v2"));
        assert!(!component.is_resolved());

        std::fs::write(file.to_native(), "not a reference\n").unwrap();
        assert!(matches!(
            component.git_reference(),
            Err(Error::MalformedReference { .. })
        ));
    }

    #[test]
    fn test_write_git_reference_round_trips() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = NormalizedPath::new(temp.path().join("lib.component"));
        let component = ComponentReference::new(file.clone());

        let reference = GitReference::new("https://example.com/lib.git", Some("abc123"));
        component.write_git_reference(&reference).unwrap();

        assert_eq!(
            std::fs::read_to_string(file.to_native()).unwrap(),
            "https://example.com/lib.git#abc123\n"
        );
        assert_eq!(component.git_reference().unwrap(), reference);
    }
}
