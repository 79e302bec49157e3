//! Game configuration loader.

use std::path::Path;

use tactics_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Configuration shipped with the crate.
const DEFAULT_CONFIG: &str = include_str!("../../data/config.toml");

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their [`GameConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Ok(config)
    }

    /// The configuration bundled in `data/config.toml`.
    pub fn bundled() -> LoadResult<GameConfig> {
        Self::parse(DEFAULT_CONFIG)
    }
}
