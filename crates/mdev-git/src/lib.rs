//! Version control adapter for mdev
//!
//! Clone, fetch, checkout and introspection of component checkouts, behind
//! the [`VersionControl`] trait. [`GitBackend`] implements it on top of
//! libgit2.

pub mod backend;
pub mod error;
pub mod exclude;
pub mod provider;

pub use backend::{GitBackend, RepoHandle};
pub use error::{Error, Result};
pub use provider::{FETCH_HEAD, VersionControl};
