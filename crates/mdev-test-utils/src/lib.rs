//! Shared test utilities for the mdev workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`git`]: `git` CLI helpers and [`git::RemoteRepo`], a local repository
//!   used as a clone source through its filesystem path
//! - [`tree`]: [`tree::ProgramTree`] builder for component trees on disk

pub mod git;
pub mod tree;
