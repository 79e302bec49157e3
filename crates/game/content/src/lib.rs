//! Static content for the tactics battle engine.
//!
//! This crate houses the unit-type registry, the skill presets used by the
//! built-in units and the TOML configuration loader. Content is consumed
//! through [`tactics_core::UnitOracle`] and never appears in battle state
//! except as instantiated pieces.

pub mod skills;
pub mod units;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use units::{UnitFactory, UnitRegistry};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory};
