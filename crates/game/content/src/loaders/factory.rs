//! Content factory bundling the registry and data-directory loaders.

use std::path::{Path, PathBuf};

use tactics_core::GameConfig;

use crate::loaders::{ConfigLoader, LoadResult};
use crate::units::UnitRegistry;

/// Content factory that loads game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// └── config.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Like [`Self::load_config`], falling back to the bundled configuration
    /// when the directory has no `config.toml`.
    pub fn load_config_or_bundled(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if path.exists() {
            ConfigLoader::load(&path)
        } else {
            ConfigLoader::bundled()
        }
    }

    /// Unit registry with every built-in unit type.
    pub fn units(&self) -> UnitRegistry {
        UnitRegistry::standard()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
