//! Content loaders for reading game data from files.
//!
//! Only tuning data is read from disk; unit types are registered in code
//! through [`crate::UnitRegistry`].

pub mod config;
pub mod factory;

pub use config::ConfigLoader;
pub use factory::ContentFactory;

use std::path::Path;

use anyhow::Context;

pub type LoadResult<T> = anyhow::Result<T>;

/// Reads a whole data file, naming it in the error.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
