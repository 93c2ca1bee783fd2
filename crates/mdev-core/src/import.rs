//! Importing existing programs from a remote

use std::path::{Path, PathBuf};

use mdev_fs::NormalizedPath;
use mdev_git::{FETCH_HEAD, VersionControl};
use tracing::info;

use crate::config::ProgramConfig;
use crate::resolver::DependencyResolver;
use crate::scanner::ReferenceScanner;
use crate::{Error, Result};

/// Organization bare program names are looked up in.
pub const DEFAULT_ORG_URL: &str = "https://code.aliyun.com/mxos";

/// Clone URL and default destination derived from a user argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    pub url: String,
    /// Directory name to clone into when none is given.
    pub dst_path: String,
}

/// Options for [`import_project`].
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Revision to check out after cloning the default branch.
    pub reference: Option<String>,
    /// Resolve the imported program's components after cloning.
    pub resolve: bool,
}

/// Turn a program name or repository URL into a clone target.
///
/// URLs with a host, scp-like `host:path` remotes and local paths are kept
/// as given. A bare name expands to a repository of the default
/// organization.
pub fn parse_url(name_or_url: &str) -> ImportTarget {
    let trimmed = name_or_url.trim().trim_end_matches('/');
    let url = if has_host(trimmed) || is_scp_like(trimmed) || is_local_path(trimmed) {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_ORG_URL}/{trimmed}.git")
    };

    let last = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
    let dst_path = last.strip_suffix(".git").unwrap_or(last).to_string();

    ImportTarget { url, dst_path }
}

fn has_host(url: &str) -> bool {
    url.split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty() && !rest.starts_with('/'))
}

fn is_scp_like(url: &str) -> bool {
    url.split('/').next().is_some_and(|first| first.contains(':'))
}

fn is_local_path(url: &str) -> bool {
    url.starts_with('/') || url.starts_with("./") || url.starts_with("../") || Path::new(url).exists()
}

/// Clone a program and optionally resolve its components.
///
/// - `dst`: destination directory; defaults to the last path segment of the
///   URL under the current directory.
///
/// Returns the destination directory.
///
/// # Errors
///
/// Returns `Conflict` if the destination already exists.
pub fn import_project<V: VersionControl>(
    vcs: &V,
    name_or_url: &str,
    dst: Option<&Path>,
    options: &ImportOptions,
) -> Result<NormalizedPath> {
    let target = parse_url(name_or_url);
    let dst: PathBuf = match dst {
        Some(dst) => std::path::absolute(dst)?,
        None => std::env::current_dir()?.join(&target.dst_path),
    };
    let dst = NormalizedPath::new(dst);
    if dst.exists() {
        return Err(Error::Git(mdev_git::Error::Conflict {
            path: dst.to_native(),
        }));
    }

    info!(url = %target.url, path = %dst, "Importing program");
    let handle = vcs.clone_repo(&target.url, &dst, None)?;
    if let Some(reference) = &options.reference {
        vcs.fetch(&handle, reference)?;
        vcs.checkout(&handle, FETCH_HEAD, false)?;
    }

    if options.resolve {
        let root = NormalizedPath::canonicalize(dst.to_native())?;
        let config = ProgramConfig::load(&root)?;
        let scanner = ReferenceScanner::new(root, config.ignore);
        DependencyResolver::new(&scanner, vcs).fetch()?;
    }

    Ok(dst)
}
