//! libgit2 implementation of the version control adapter

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{
    Cred, CredentialType, ErrorClass, ErrorCode, FetchOptions, Oid, RemoteCallbacks, Repository,
    StatusOptions, SubmoduleUpdateOptions,
};
use mdev_fs::{NormalizedPath, io};

use crate::provider::{FETCH_HEAD, VersionControl};
use crate::{Error, Result};

const ORIGIN: &str = "origin";
const ORIGIN_HEAD: &str = "refs/remotes/origin/HEAD";
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Handle over a component checkout opened through [`GitBackend`].
pub struct RepoHandle {
    repo: Repository,
    path: NormalizedPath,
}

impl RepoHandle {
    /// Root of the working tree.
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// The underlying libgit2 repository.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }
}

/// [`VersionControl`] backed by libgit2.
///
/// Credentials are taken from the ssh agent or the configured git
/// credential helper.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitBackend;

impl GitBackend {
    pub fn new() -> Self {
        Self
    }
}

impl VersionControl for GitBackend {
    type Handle = RepoHandle;

    fn open(&self, path: &NormalizedPath) -> Result<RepoHandle> {
        let not_a_repo = || Error::NotARepository {
            path: path.to_native(),
        };

        let repo = Repository::open(path.to_native()).map_err(|_| not_a_repo())?;
        if repo.is_bare() {
            return Err(not_a_repo());
        }
        // A clone interrupted before its first checkout has no commit at HEAD
        if repo.head().and_then(|h| h.peel_to_commit()).is_err() {
            return Err(not_a_repo());
        }

        Ok(RepoHandle {
            repo,
            path: path.clone(),
        })
    }

    fn clone_repo(
        &self,
        url: &str,
        dest: &NormalizedPath,
        reference: Option<&str>,
    ) -> Result<RepoHandle> {
        if dest.is_file() || (dest.is_dir() && !io::is_empty_dir(dest)?) {
            return Err(Error::Conflict {
                path: dest.to_native(),
            });
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent.to_native())
                .map_err(|e| mdev_fs::Error::io(parent.to_native(), e))?;
        }

        tracing::debug!(url = %url, dest = %dest, reference = ?reference, "Cloning");

        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_options());
        if let Some(branch) = reference {
            builder.branch(branch);
        }

        let repo = builder
            .clone(url, &dest.to_native())
            .map_err(|e| match reference {
                Some(revision) if e.code() == ErrorCode::NotFound => Error::RevisionNotFound {
                    url: url.to_string(),
                    revision: revision.to_string(),
                },
                _ => remote_error(url, &e),
            })?;

        Ok(RepoHandle {
            repo,
            path: dest.clone(),
        })
    }

    fn fetch(&self, handle: &RepoHandle, reference: &str) -> Result<()> {
        let repo = &handle.repo;
        let mut remote = repo
            .find_remote(ORIGIN)
            .map_err(|_| Error::RemoteNotFound {
                name: ORIGIN.to_string(),
            })?;
        let url = remote.url().unwrap_or(ORIGIN).to_string();

        // A previous fetch must never stand in for this one
        clear_fetch_head(repo)?;

        tracing::debug!(url = %url, reference = %reference, path = %handle.path, "Fetching");
        let fetched = remote.fetch(&[reference], Some(&mut fetch_options()), None);

        // A commit id is pinned explicitly: servers may refuse to serve an
        // unadvertised object, and FETCH_HEAD must name exactly that commit.
        if let Some(oid) = local_commit(repo, reference) {
            match fetched {
                Err(e) if is_object_refusal(&e) => tracing::warn!(
                    url = %url,
                    commit = %oid,
                    error = %e.message(),
                    "Remote refused commit fetch, using the local copy"
                ),
                Err(e) => return Err(remote_error(&url, &e)),
                Ok(()) => {}
            }
            return pin_fetch_head(repo, oid);
        }
        fetched.map_err(|e| remote_error(&url, &e))?;

        // libgit2 leaves FETCH_HEAD empty when the fetched ref was already
        // present locally, which is always the case for tags after a clone
        if resolve_commit(repo, FETCH_HEAD).is_none() {
            let oid = local_fetch_target(repo, reference).ok_or_else(|| {
                Error::RevisionNotFound {
                    url: url.clone(),
                    revision: reference.to_string(),
                }
            })?;
            tracing::debug!(reference = %reference, commit = %oid, "Fetched ref already local");
            pin_fetch_head(repo, oid)?;
        }
        Ok(())
    }

    fn checkout(&self, handle: &RepoHandle, revision: &str, force: bool) -> Result<()> {
        let repo = &handle.repo;
        let commit = repo.revparse_single(revision)?.peel_to_commit()?;

        if !force && self.is_dirty(handle)? {
            return Err(Error::DirtyWorkingTree {
                path: handle.path.to_native(),
            });
        }

        let mut builder = CheckoutBuilder::new();
        if force {
            builder.force();
        } else {
            builder.safe();
        }

        repo.checkout_tree(commit.as_object(), Some(&mut builder))?;
        repo.set_head_detached(commit.id())?;

        tracing::debug!(path = %handle.path, commit = %commit.id(), force, "Checked out");
        Ok(())
    }

    fn current_revision(&self, handle: &RepoHandle) -> Result<String> {
        let commit = handle.repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    fn default_branch(&self, handle: &RepoHandle) -> Result<String> {
        let repo = &handle.repo;

        if let Ok(origin_head) = repo.find_reference(ORIGIN_HEAD)
            && let Some(target) = origin_head.symbolic_target()
            && let Some(branch) = target.strip_prefix("refs/remotes/origin/")
        {
            return Ok(branch.to_string());
        }

        let head = repo.head()?;
        if head.is_branch() {
            Ok(head.shorthand().unwrap_or("HEAD").to_string())
        } else {
            // Detached HEAD
            Ok("HEAD".to_string())
        }
    }

    fn is_dirty(&self, handle: &RepoHandle) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = handle.repo.statuses(Some(&mut options))?;
        Ok(statuses.iter().any(|entry| !entry.status().is_empty()))
    }

    fn submodules(&self, handle: &RepoHandle) -> Result<Vec<String>> {
        Ok(handle
            .repo
            .submodules()?
            .iter()
            .filter_map(|sm| sm.name().map(str::to_string))
            .collect())
    }

    fn existing_submodules(&self, handle: &RepoHandle) -> Result<Vec<String>> {
        Ok(handle
            .repo
            .submodules()?
            .iter()
            .filter(|sm| sm.open().is_ok())
            .filter_map(|sm| sm.name().map(str::to_string))
            .collect())
    }

    fn update_submodule(&self, handle: &RepoHandle, name: &str) -> Result<()> {
        let mut submodule = handle.repo.find_submodule(name)?;
        let url = submodule.url().unwrap_or(name).to_string();

        let mut options = SubmoduleUpdateOptions::new();
        options.fetch(fetch_options());

        tracing::debug!(submodule = %name, url = %url, "Updating submodule");
        submodule
            .update(true, Some(&mut options))
            .map_err(|e| remote_error(&url, &e))
    }
}

/// The commit named by `reference` if it is a full commit id present in the
/// local object store.
fn local_commit(repo: &Repository, reference: &str) -> Option<Oid> {
    if reference.len() != 40 || !reference.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let oid = Oid::from_str(reference).ok()?;
    repo.find_commit(oid).ok().map(|c| c.id())
}

/// Commit named by the tag or remote-tracking branch `reference`.
fn local_fetch_target(repo: &Repository, reference: &str) -> Option<Oid> {
    [
        format!("refs/tags/{reference}"),
        format!("refs/remotes/{ORIGIN}/{reference}"),
    ]
    .iter()
    .find_map(|name| resolve_commit(repo, name))
}

fn resolve_commit(repo: &Repository, revision: &str) -> Option<Oid> {
    repo.revparse_single(revision)
        .and_then(|object| object.peel_to_commit())
        .map(|commit| commit.id())
        .ok()
}

fn pin_fetch_head(repo: &Repository, oid: Oid) -> Result<()> {
    repo.reference(FETCH_HEAD, oid, true, &format!("fetch: {oid}"))?;
    Ok(())
}

fn clear_fetch_head(repo: &Repository) -> Result<()> {
    let path = repo.path().join(FETCH_HEAD);
    match std::fs::remove_file(&path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            Err(mdev_fs::Error::io(path, e).into())
        }
        _ => Ok(()),
    }
}

/// Whether the server was reached but declined to serve an object that is
/// not the tip of any advertised ref.
fn is_object_refusal(e: &git2::Error) -> bool {
    let message = e.message();
    e.class() == ErrorClass::Reference
        || message.contains("not our ref")
        || message.contains("unadvertised object")
}

fn remote_error(url: &str, e: &git2::Error) -> Error {
    Error::Remote {
        url: url.to_string(),
        message: e.message().to_string(),
    }
}

fn fetch_options<'a>() -> FetchOptions<'a> {
    let mut attempts = 0;
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username_from_url, allowed| {
        // libgit2 keeps asking while credentials are rejected
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }
        if allowed.contains(CredentialType::SSH_KEY) {
            return Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"));
        }
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            let config = git2::Config::open_default()?;
            return Cred::credential_helper(&config, url, username_from_url);
        }
        Cred::default()
    });

    let mut options = FetchOptions::new();
    options.remote_callbacks(callbacks);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("abc123")]
    #[case("main")]
    #[case("v1.0")]
    #[case("0123456789abcdef0123456789abcdef0123456z")]
    #[case("0123456789abcdef0123456789abcdef01234567")]
    fn test_local_commit_needs_known_full_id(#[case] reference: &str) {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();
        assert!(local_commit(&repo, reference).is_none());
    }

    #[rstest]
    #[case(ErrorCode::GenericError, ErrorClass::Net, "want 0123 not our ref", true)]
    #[case(ErrorCode::NotFound, ErrorClass::Reference, "couldn't find remote ref 0123", true)]
    #[case(ErrorCode::Auth, ErrorClass::Http, "authentication required", false)]
    #[case(ErrorCode::GenericError, ErrorClass::Net, "failed to resolve address", false)]
    #[case(ErrorCode::NotFound, ErrorClass::Repository, "could not find repository", false)]
    fn test_is_object_refusal(
        #[case] code: ErrorCode,
        #[case] class: ErrorClass,
        #[case] message: &str,
        #[case] expected: bool,
    ) {
        let error = git2::Error::new(code, class, message);
        assert_eq!(is_object_refusal(&error), expected);
    }

    #[test]
    fn test_open_uninitialized_repository_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        Repository::init(temp_dir.path()).unwrap();

        let result = GitBackend::new().open(&NormalizedPath::new(temp_dir.path()));
        assert!(matches!(result, Err(Error::NotARepository { .. })));
    }
}
