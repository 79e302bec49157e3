//! Targeting: range tests, line of sight and skill areas.

mod area;

use crate::board::{Shape, ShapeProps};
use crate::state::{BattleState, PieceId, Position};

/// How a skill's line to its target is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SightRule {
    /// No line check.
    #[default]
    Ignore,
    /// Intermediate cells must not block sight or be occupied.
    Clear,
    /// Like [`SightRule::Clear`], and intermediate cells must be standable.
    Walkable,
}

/// Range annulus, shape constraint and sight rule of one skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Targeting {
    pub range: u32,
    pub min_range: u32,
    pub shape: Shape,
    pub sight: SightRule,
}

impl Targeting {
    /// Adjacent cells only.
    pub const MELEE: Self = Self::new(1, 1);
    /// The user's own cell.
    pub const SELF: Self = Self::new(0, 0);

    pub const fn new(min_range: u32, range: u32) -> Self {
        Self {
            range,
            min_range,
            shape: Shape::Circle,
            sight: SightRule::Ignore,
        }
    }

    #[must_use]
    pub const fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    #[must_use]
    pub const fn with_sight(mut self, sight: SightRule) -> Self {
        self.sight = sight;
        self
    }

    pub const fn props(&self) -> ShapeProps {
        ShapeProps::new(self.range, self.min_range)
    }

    /// Pure geometric part of the range test: annulus plus shape.
    pub fn covers(&self, origin: Position, target: Position) -> bool {
        let distance = origin.distance(target);
        distance >= self.min_range
            && distance <= self.range
            && self
                .shape
                .accepts(target.x - origin.x, target.y - origin.y, self.props())
    }
}

impl Default for Targeting {
    fn default() -> Self {
        Self::MELEE
    }
}

impl BattleState {
    /// Whether `target` lies within `targeting` as seen from `viewer`.
    pub fn in_range(&self, viewer: PieceId, targeting: &Targeting, target: Position) -> bool {
        let Some(origin) = self.piece(viewer).filter(|p| p.is_on_board()).and_then(|p| p.anchor)
        else {
            return false;
        };
        self.board.contains(target)
            && targeting.covers(origin, target)
            && self.can_see(viewer, origin, target, targeting.sight)
    }

    /// Approximate line-of-sight walk from `origin` to `target`.
    ///
    /// Each step moves x and y one cell toward the target independently, so
    /// the walk goes diagonal first and straight after. Intermediate cells
    /// fail the check when they block sight or are occupied by anything other
    /// than `viewer`; [`SightRule::Walkable`] also fails on cells that block
    /// movement. The origin and target cells themselves are never checked.
    pub fn can_see(
        &self,
        viewer: PieceId,
        origin: Position,
        target: Position,
        rule: SightRule,
    ) -> bool {
        if rule == SightRule::Ignore {
            return true;
        }
        let mut current = origin;
        loop {
            current = Position::new(
                current.x + (target.x - current.x).signum(),
                current.y + (target.y - current.y).signum(),
            );
            if current == target {
                return true;
            }
            let Some(cell) = self.board.at(current) else {
                return false;
            };
            if cell.occupant() == Some(viewer) {
                continue;
            }
            if cell.blocks_sight() || !cell.is_empty() {
                return false;
            }
            if rule == SightRule::Walkable && cell.blocks_move() {
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, TerrainTable, TileCode};
    use crate::state::Piece;

    fn viewer(state: &mut BattleState, at: Position) -> PieceId {
        let id = state.add_piece(
            Piece::new(PieceId(0), "viewer", 5, 3),
            Some(BattleState::PLAYER_TEAM),
        );
        state.move_piece(id, at).unwrap();
        id
    }

    #[test]
    fn annulus_excludes_inner_ring() {
        let targeting = Targeting::new(2, 4);
        let origin = Position::new(5, 5);
        assert!(!targeting.covers(origin, Position::new(6, 5)));
        assert!(targeting.covers(origin, Position::new(7, 5)));
        assert!(targeting.covers(origin, Position::new(7, 7)));
        assert!(!targeting.covers(origin, Position::new(8, 7)));
    }

    #[test]
    fn line_shape_restricts_to_axes() {
        let targeting = Targeting::new(1, 3).with_shape(Shape::Line);
        let origin = Position::new(3, 3);
        assert!(targeting.covers(origin, Position::new(3, 6)));
        assert!(!targeting.covers(origin, Position::new(4, 4)));
    }

    #[test]
    fn occupied_cell_blocks_sight() {
        let mut state = BattleState::new(Board::new(7, 1));
        let id = viewer(&mut state, Position::new(0, 0));
        let blocker = state.add_piece(
            Piece::new(PieceId(0), "rock", 1, 0),
            Some(BattleState::ENEMY_TEAM),
        );
        state.move_piece(blocker, Position::new(2, 0)).unwrap();

        let bow = Targeting::new(2, 4).with_sight(SightRule::Clear);
        assert!(!state.in_range(id, &bow, Position::new(4, 0)));
        assert!(state.in_range(id, &bow, Position::new(2, 0)));
    }

    #[test]
    fn bush_blocks_sight_but_not_walking() {
        let bush = TileCode::new(0, TerrainTable::DECORATION_BUSH);
        let water = TileCode::new(TerrainTable::GROUND_WATER, 0);
        let rows = vec![vec![TileCode::OPEN, bush, TileCode::OPEN, water, TileCode::OPEN]];
        let mut state = BattleState::new(Board::from_codes(5, 1, &rows, &TerrainTable::standard()));
        let id = viewer(&mut state, Position::new(2, 0));

        assert!(!state.can_see(id, Position::new(2, 0), Position::new(0, 0), SightRule::Clear));
        assert!(state.can_see(id, Position::new(2, 0), Position::new(4, 0), SightRule::Clear));
        assert!(!state.can_see(id, Position::new(2, 0), Position::new(4, 0), SightRule::Walkable));
    }

    #[test]
    fn diagonal_walk_goes_corner_first() {
        let rock = TileCode::new(0, TerrainTable::DECORATION_ROCK);
        // The walk from (0,0) to (3,1) visits (1,1) then (2,1).
        let rows = vec![
            vec![TileCode::OPEN, rock, TileCode::OPEN, TileCode::OPEN],
            vec![TileCode::OPEN, TileCode::OPEN, TileCode::OPEN, TileCode::OPEN],
        ];
        let mut state = BattleState::new(Board::from_codes(4, 2, &rows, &TerrainTable::standard()));
        let id = viewer(&mut state, Position::new(0, 0));
        assert!(state.can_see(id, Position::new(0, 0), Position::new(3, 1), SightRule::Clear));
    }
}
