use crate::state::{PieceId, Position};

use super::Terrain;

/// Transient tags written while painting movement or targeting ranges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeMarks {
    /// Cell is part of the painted range.
    pub in_range: bool,
    /// Remaining movement budget when the search reached this cell.
    pub moves_left: Option<u32>,
    /// Painted but not a legal final destination.
    pub invalid: bool,
    /// Previous cell on the best path found so far.
    pub parent: Option<Position>,
}

/// One grid position on the board.
///
/// The occupant is a back-reference only; pieces are owned by the battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    position: Position,
    terrain: Terrain,
    pub(crate) occupant: Option<PieceId>,
    pub(crate) marks: RangeMarks,
}

impl Cell {
    pub(crate) fn new(position: Position, terrain: Terrain) -> Self {
        Self {
            position,
            terrain,
            occupant: None,
            marks: RangeMarks::default(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn occupant(&self) -> Option<PieceId> {
        self.occupant
    }

    pub fn marks(&self) -> &RangeMarks {
        &self.marks
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn blocks_move(&self) -> bool {
        self.terrain.blocks_move()
    }

    pub fn blocks_sight(&self) -> bool {
        self.terrain.blocks_sight()
    }
}
