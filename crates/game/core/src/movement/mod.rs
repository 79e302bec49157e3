//! Occupancy and movement resolution.
//!
//! Tracks which piece occupies which cells (multi-cell footprints included),
//! validates placement, and performs the primitive board moves every action
//! is built from: place, remove, slide, swap. Reachability for the move range
//! lives in [`reach`].

mod reach;

use crate::error::{ErrorSeverity, GameError};
use crate::state::{BattleState, Container, Direction, PieceId, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("piece {0} not found")]
    PieceNotFound(PieceId),

    #[error("piece {0} is not on the board")]
    NotOnBoard(PieceId),

    #[error("piece {0} has no container to leave")]
    NotPlaced(PieceId),

    #[error("piece {piece} does not fit at {destination}")]
    Blocked {
        piece: PieceId,
        destination: Position,
    },

    #[error("swap of {a} and {b} is blocked")]
    SwapBlocked { a: PieceId, b: PieceId },
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::PieceNotFound(_) | Self::NotPlaced(_) | Self::NotOnBoard(_) => {
                ErrorSeverity::Validation
            }
            Self::Blocked { .. } | Self::SwapBlocked { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PieceNotFound(_) => "MOVE_PIECE_NOT_FOUND",
            Self::NotOnBoard(_) => "MOVE_NOT_ON_BOARD",
            Self::NotPlaced(_) => "MOVE_NOT_PLACED",
            Self::Blocked { .. } => "MOVE_BLOCKED",
            Self::SwapBlocked { .. } => "MOVE_SWAP_BLOCKED",
        }
    }
}

impl BattleState {
    /// Cells a piece of `size` would cover when centered on `center`.
    pub fn footprint_at(&self, center: Position, size: u32) -> Vec<Option<Position>> {
        self.board.area_positions(center, size, None)
    }

    /// Cells currently stamped with `piece`.
    pub fn footprint(&self, piece: PieceId) -> Vec<Position> {
        let Some((anchor, size)) = self
            .piece(piece)
            .and_then(|p| p.anchor.filter(|_| p.is_on_board()).map(|a| (a, p.footprint)))
        else {
            return Vec::new();
        };
        self.footprint_at(anchor, size)
            .into_iter()
            .flatten()
            .filter(|position| {
                self.board
                    .at(*position)
                    .is_some_and(|cell| cell.occupant() == Some(piece))
            })
            .collect()
    }

    /// True iff every footprint cell exists, is standable, and is either
    /// empty or already occupied by `piece`.
    pub fn can_fit(&self, piece: PieceId, center: Position, size: Option<u32>) -> bool {
        self.footprint_check(piece, center, size, false)
    }

    /// Like [`BattleState::can_fit`], but cells held by pieces on the same
    /// side are passable. Used for reachability, never for final placement.
    pub fn can_pass(&self, piece: PieceId, center: Position, size: Option<u32>) -> bool {
        self.footprint_check(piece, center, size, true)
    }

    /// True iff a new footprint of `size` centered on `center` would fit.
    pub fn is_free(&self, center: Position, size: u32) -> bool {
        self.board
            .area(center, size, None)
            .into_iter()
            .all(|cell| cell.is_some_and(|cell| cell.is_empty() && !cell.blocks_move()))
    }

    fn footprint_check(
        &self,
        piece: PieceId,
        center: Position,
        size: Option<u32>,
        allies_pass: bool,
    ) -> bool {
        let Some(subject) = self.piece(piece) else {
            return false;
        };
        let size = size.unwrap_or(subject.footprint);
        self.board.area(center, size, None).into_iter().all(|cell| {
            let Some(cell) = cell else {
                return false;
            };
            if cell.blocks_move() {
                return false;
            }
            match cell.occupant() {
                None => true,
                Some(occupant) if occupant == piece => true,
                Some(occupant) => allies_pass && self.are_allies(piece, occupant),
            }
        })
    }

    fn stamp(&mut self, piece: PieceId, center: Position, size: u32) {
        for position in self.footprint_at(center, size).into_iter().flatten() {
            if let Some(cell) = self.board.at_mut(position) {
                cell.occupant = Some(piece);
            }
        }
    }

    fn clear_footprint(&mut self, piece: PieceId) {
        for position in self.footprint(piece) {
            if let Some(cell) = self.board.at_mut(position) {
                cell.occupant = None;
            }
        }
    }

    /// Places `piece` with its anchor on `target`.
    ///
    /// Fails without mutation when the footprint does not fit. A piece coming
    /// from another container is detached from it first; a piece already on
    /// the board has its old footprint cleared.
    pub fn move_piece(&mut self, piece: PieceId, target: Position) -> Result<(), MoveError> {
        let (container, size) = self
            .piece(piece)
            .map(|p| (p.container, p.footprint))
            .ok_or(MoveError::PieceNotFound(piece))?;
        if !self.can_fit(piece, target, None) {
            return Err(MoveError::Blocked {
                piece,
                destination: target,
            });
        }

        if container == Container::Board {
            self.clear_footprint(piece);
        }
        self.stamp(piece, target, size);

        let moved = self.piece_mut(piece).ok_or(MoveError::PieceNotFound(piece))?;
        moved.anchor = Some(target);
        moved.container = Container::Board;
        Ok(())
    }

    /// Detaches `piece` from its current container, clearing its footprint
    /// when it was on the board.
    pub fn remove_piece(&mut self, piece: PieceId) -> Result<(), MoveError> {
        let container = self
            .piece(piece)
            .map(|p| p.container)
            .ok_or(MoveError::PieceNotFound(piece))?;
        match container {
            Container::Detached => return Err(MoveError::NotPlaced(piece)),
            Container::Board => self.clear_footprint(piece),
            Container::Roster => {}
        }
        let removed = self.piece_mut(piece).ok_or(MoveError::PieceNotFound(piece))?;
        removed.anchor = None;
        removed.container = Container::Detached;
        Ok(())
    }

    /// Returns a piece to the deployment roster.
    pub fn bench_piece(&mut self, piece: PieceId) -> Result<(), MoveError> {
        if self.piece(piece).is_some_and(|p| p.container == Container::Board) {
            self.remove_piece(piece)?;
        }
        let benched = self.piece_mut(piece).ok_or(MoveError::PieceNotFound(piece))?;
        benched.anchor = None;
        benched.container = Container::Roster;
        Ok(())
    }

    /// Slides `piece` along the line from `origin` through its anchor.
    ///
    /// Positive distances push away from `origin`, negative ones pull toward
    /// it. The piece advances one cell at a time and stops before the first
    /// cell it cannot fit. Returns the number of steps actually taken.
    pub fn slide_piece(&mut self, piece: PieceId, origin: Position, distance: i32) -> u32 {
        let Some(anchor) = self.piece(piece).filter(|p| p.is_on_board()).and_then(|p| p.anchor)
        else {
            return 0;
        };
        let mut direction = Direction::between(origin, anchor);
        if distance < 0 {
            direction = direction.reversed();
        }
        if direction.is_none() {
            return 0;
        }

        let mut steps = 0;
        let mut furthest = anchor;
        for _ in 0..distance.unsigned_abs() {
            let next = furthest.step(direction, 1);
            if !self.can_fit(piece, next, None) {
                break;
            }
            furthest = next;
            steps += 1;
        }

        if steps > 0 && self.move_piece(piece, furthest).is_err() {
            return 0;
        }
        steps
    }

    /// Exchanges the anchors of two board pieces, all or nothing.
    ///
    /// When either placement is blocked both pieces are restored to their
    /// original cells.
    pub fn swap_pieces(&mut self, a: PieceId, b: PieceId) -> Result<(), MoveError> {
        let anchor_of = |state: &Self, piece: PieceId| {
            state
                .piece(piece)
                .ok_or(MoveError::PieceNotFound(piece))?
                .anchor
                .filter(|_| state.piece(piece).is_some_and(|p| p.is_on_board()))
                .ok_or(MoveError::NotOnBoard(piece))
        };
        let origin_a = anchor_of(self, a)?;
        let origin_b = anchor_of(self, b)?;
        if a == b {
            return Ok(());
        }

        self.remove_piece(a)?;
        self.remove_piece(b)?;

        let placed_a = self.move_piece(a, origin_b).is_ok();
        if placed_a && self.move_piece(b, origin_a).is_ok() {
            return Ok(());
        }

        if placed_a {
            self.remove_piece(a)?;
        }
        self.move_piece(a, origin_a)?;
        self.move_piece(b, origin_b)?;
        Err(MoveError::SwapBlocked { a, b })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, TerrainTable, TileCode};
    use crate::state::{Piece, TeamId};

    fn state_with(width: u32, height: u32) -> BattleState {
        BattleState::new(Board::new(width, height))
    }

    fn unit(state: &mut BattleState, team: TeamId, at: Position) -> PieceId {
        let id = state.add_piece(Piece::new(PieceId(0), "unit", 5, 3), Some(team));
        state.move_piece(id, at).unwrap();
        id
    }

    #[test]
    fn move_stamps_and_clears_footprint() {
        let mut state = state_with(7, 7);
        let big = state.add_piece(
            Piece::new(PieceId(0), "big", 9, 2).with_footprint(3),
            Some(BattleState::PLAYER_TEAM),
        );
        state.move_piece(big, Position::new(2, 2)).unwrap();
        assert_eq!(state.footprint(big).len(), 9);

        state.move_piece(big, Position::new(3, 2)).unwrap();
        assert_eq!(state.footprint(big).len(), 9);
        assert_eq!(state.board.at(Position::new(1, 2)).unwrap().occupant(), None);
        assert_eq!(state.board.at(Position::new(4, 3)).unwrap().occupant(), Some(big));
    }

    #[test]
    fn move_onto_own_cell_is_idempotent() {
        let mut state = state_with(5, 5);
        let a = unit(&mut state, BattleState::PLAYER_TEAM, Position::new(2, 2));
        let other = unit(&mut state, BattleState::ENEMY_TEAM, Position::new(0, 0));
        let before = state.board.clone();
        state.move_piece(a, Position::new(2, 2)).unwrap();
        assert_eq!(state.board, before);
        assert_eq!(state.piece(other).unwrap().anchor, Some(Position::new(0, 0)));
    }

    #[test]
    fn move_into_occupied_cell_fails_without_mutation() {
        let mut state = state_with(5, 5);
        let a = unit(&mut state, BattleState::PLAYER_TEAM, Position::new(1, 1));
        unit(&mut state, BattleState::ENEMY_TEAM, Position::new(2, 1));
        let before = state.clone();
        assert_eq!(
            state.move_piece(a, Position::new(2, 1)),
            Err(MoveError::Blocked {
                piece: a,
                destination: Position::new(2, 1)
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn blocked_terrain_cannot_be_fit() {
        let rows = vec![vec![TileCode::OPEN, TileCode::new(0, TerrainTable::DECORATION_ROCK)]];
        let mut state = BattleState::new(Board::from_codes(2, 1, &rows, &TerrainTable::standard()));
        let a = unit(&mut state, BattleState::PLAYER_TEAM, Position::new(0, 0));
        assert!(!state.can_fit(a, Position::new(1, 0), None));
    }

    #[test]
    fn allies_are_passable_but_not_fit() {
        let mut state = state_with(5, 5);
        let a = unit(&mut state, BattleState::PLAYER_TEAM, Position::new(1, 1));
        unit(&mut state, BattleState::PLAYER_TEAM, Position::new(2, 1));
        let foe = unit(&mut state, BattleState::ENEMY_TEAM, Position::new(1, 2));
        assert!(state.can_pass(a, Position::new(2, 1), None));
        assert!(!state.can_fit(a, Position::new(2, 1), None));
        assert!(!state.can_pass(a, Position::new(1, 2), None));
        assert!(!state.can_pass(foe, Position::new(1, 1), None));
    }

    #[test]
    fn remove_clears_cells_and_detaches() {
        let mut state = state_with(5, 5);
        let a = unit(&mut state, BattleState::PLAYER_TEAM, Position::new(1, 1));
        state.remove_piece(a).unwrap();
        assert!(state.board.at(Position::new(1, 1)).unwrap().is_empty());
        assert_eq!(state.piece(a).unwrap().container, Container::Detached);
        assert_eq!(state.remove_piece(a), Err(MoveError::NotPlaced(a)));
    }

    #[test]
    fn roster_piece_is_detached_when_placed() {
        let mut state = state_with(5, 5);
        let a = state.add_party_piece(Piece::new(PieceId(0), "unit", 5, 3));
        state.move_piece(a, Position::new(3, 3)).unwrap();
        assert_eq!(state.bench().count(), 0);
        assert_eq!(state.piece(a).unwrap().container, Container::Board);
    }

    #[test]
    fn slide_stops_before_obstacle() {
        let mut state = state_with(7, 1);
        let pusher = unit(&mut state, BattleState::PLAYER_TEAM, Position::new(0, 0));
        let target = unit(&mut state, BattleState::ENEMY_TEAM, Position::new(1, 0));
        unit(&mut state, BattleState::ENEMY_TEAM, Position::new(4, 0));

        let origin = state.piece(pusher).unwrap().anchor.unwrap();
        assert_eq!(state.slide_piece(target, origin, 5), 2);
        assert_eq!(state.piece(target).unwrap().anchor, Some(Position::new(3, 0)));
    }

    #[test]
    fn negative_slide_pulls_toward_origin() {
        let mut state = state_with(7, 1);
        let target = unit(&mut state, BattleState::ENEMY_TEAM, Position::new(5, 0));
        assert_eq!(state.slide_piece(target, Position::new(0, 0), -2), 2);
        assert_eq!(state.piece(target).unwrap().anchor, Some(Position::new(3, 0)));
    }

    #[test]
    fn slide_off_board_stops_at_edge() {
        let mut state = state_with(3, 1);
        let target = unit(&mut state, BattleState::ENEMY_TEAM, Position::new(1, 0));
        assert_eq!(state.slide_piece(target, Position::new(0, 0), 4), 1);
        assert_eq!(state.piece(target).unwrap().anchor, Some(Position::new(2, 0)));
    }

    #[test]
    fn swap_exchanges_anchors() {
        let mut state = state_with(5, 5);
        let a = unit(&mut state, BattleState::PLAYER_TEAM, Position::new(0, 0));
        let b = unit(&mut state, BattleState::ENEMY_TEAM, Position::new(4, 4));
        state.swap_pieces(a, b).unwrap();
        assert_eq!(state.piece(a).unwrap().anchor, Some(Position::new(4, 4)));
        assert_eq!(state.piece(b).unwrap().anchor, Some(Position::new(0, 0)));
        assert_eq!(state.board.at(Position::new(0, 0)).unwrap().occupant(), Some(b));
    }

    #[test]
    fn blocked_swap_restores_both() {
        let mut state = state_with(5, 5);
        let big = state.add_piece(
            Piece::new(PieceId(0), "big", 9, 2).with_footprint(3),
            Some(BattleState::PLAYER_TEAM),
        );
        state.move_piece(big, Position::new(2, 2)).unwrap();
        let corner = unit(&mut state, BattleState::ENEMY_TEAM, Position::new(0, 4));
        let before = state.clone();

        assert_eq!(
            state.swap_pieces(big, corner),
            Err(MoveError::SwapBlocked { a: big, b: corner })
        );
        assert_eq!(state, before);
    }
}
