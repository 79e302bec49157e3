//! Read-only data the engine consults while a battle runs.
//!
//! Unit templates come from a [`UnitOracle`]; tunables come from
//! [`GameConfig`]. The [`BattleEnv`] aggregate bundles them so the engine
//! never depends on a concrete content crate.
mod descriptor;
mod units;

pub use descriptor::{BattleDescriptor, DescriptorError};
pub use units::{UnitOracle, UnitTable, UnitTemplate};

use crate::board::TerrainTable;
use crate::config::GameConfig;

/// Aggregates the read-only oracles required by the engine and skills.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    units: &'a dyn UnitOracle,
    config: &'a GameConfig,
    terrain: Option<&'a TerrainTable>,
}

impl<'a> BattleEnv<'a> {
    pub fn new(units: &'a dyn UnitOracle, config: &'a GameConfig) -> Self {
        Self {
            units,
            config,
            terrain: None,
        }
    }

    /// Overrides the terrain codes used when building boards.
    #[must_use]
    pub fn with_terrain(mut self, terrain: &'a TerrainTable) -> Self {
        self.terrain = Some(terrain);
        self
    }

    pub fn units(&self) -> &'a dyn UnitOracle {
        self.units
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    /// Custom terrain table, if one was supplied.
    pub fn terrain(&self) -> Option<&'a TerrainTable> {
        self.terrain
    }
}

impl core::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("config", self.config)
            .field("terrain", &self.terrain.is_some())
            .finish_non_exhaustive()
    }
}
