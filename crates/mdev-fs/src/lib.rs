//! Filesystem abstraction for mdev
//!
//! Provides normalized path handling, safe text I/O and config loading.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::MdevPath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
