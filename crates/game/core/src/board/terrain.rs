//! Terrain attributes attached to board cells.

use std::collections::BTreeMap;

bitflags::bitflags! {
    /// Movement and sight properties of a cell's terrain.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TerrainFlags: u8 {
        const BLOCKS_MOVE = 1 << 0;
        const BLOCKS_SIGHT = 1 << 1;
    }
}

/// Ground and decoration type codes from the battle descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileCode {
    pub ground: u16,
    pub decoration: u16,
}

impl TileCode {
    pub const OPEN: Self = Self {
        ground: 0,
        decoration: 0,
    };

    pub const fn new(ground: u16, decoration: u16) -> Self {
        Self { ground, decoration }
    }
}

/// Resolved terrain of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Terrain {
    pub code: TileCode,
    pub flags: TerrainFlags,
}

impl Terrain {
    pub const fn open() -> Self {
        Self {
            code: TileCode::OPEN,
            flags: TerrainFlags::empty(),
        }
    }

    pub fn blocks_move(&self) -> bool {
        self.flags.contains(TerrainFlags::BLOCKS_MOVE)
    }

    pub fn blocks_sight(&self) -> bool {
        self.flags.contains(TerrainFlags::BLOCKS_SIGHT)
    }
}

/// Maps ground/decoration codes to terrain flags.
///
/// Codes missing from the table are treated as open terrain.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainTable {
    ground: BTreeMap<u16, TerrainFlags>,
    decoration: BTreeMap<u16, TerrainFlags>,
}

impl TerrainTable {
    pub const GROUND_FLOOR: u16 = 0;
    pub const GROUND_WATER: u16 = 1;
    pub const GROUND_PIT: u16 = 2;

    pub const DECORATION_NONE: u16 = 0;
    pub const DECORATION_ROCK: u16 = 1;
    pub const DECORATION_BUSH: u16 = 2;
    pub const DECORATION_PILLAR: u16 = 3;

    pub fn empty() -> Self {
        Self {
            ground: BTreeMap::new(),
            decoration: BTreeMap::new(),
        }
    }

    /// Default codes shared by the bundled battle content.
    pub fn standard() -> Self {
        Self::empty()
            .with_ground(Self::GROUND_WATER, TerrainFlags::BLOCKS_MOVE)
            .with_ground(Self::GROUND_PIT, TerrainFlags::BLOCKS_MOVE)
            .with_decoration(
                Self::DECORATION_ROCK,
                TerrainFlags::BLOCKS_MOVE | TerrainFlags::BLOCKS_SIGHT,
            )
            .with_decoration(Self::DECORATION_BUSH, TerrainFlags::BLOCKS_SIGHT)
            .with_decoration(
                Self::DECORATION_PILLAR,
                TerrainFlags::BLOCKS_MOVE | TerrainFlags::BLOCKS_SIGHT,
            )
    }

    #[must_use]
    pub fn with_ground(mut self, code: u16, flags: TerrainFlags) -> Self {
        self.ground.insert(code, flags);
        self
    }

    #[must_use]
    pub fn with_decoration(mut self, code: u16, flags: TerrainFlags) -> Self {
        self.decoration.insert(code, flags);
        self
    }

    pub fn resolve(&self, code: TileCode) -> Terrain {
        let ground = self.ground.get(&code.ground).copied().unwrap_or_default();
        let decoration = self
            .decoration
            .get(&code.decoration)
            .copied()
            .unwrap_or_default();
        Terrain {
            code,
            flags: ground | decoration,
        }
    }
}

impl Default for TerrainTable {
    fn default() -> Self {
        Self::standard()
    }
}
