//! Move range painting and path reconstruction.

use std::collections::VecDeque;

use crate::board::RangeMarks;
use crate::state::{BattleState, Direction, PieceId, Position};

impl BattleState {
    /// Paints every cell `piece` can reach this turn and returns them.
    ///
    /// Breadth-first search from the anchor with a per-cell movement budget.
    /// A cell is re-queued whenever it is reached with a strictly larger
    /// budget than recorded, so every painted cell ends with the best budget
    /// and a parent on a shortest path. Cells occupied by allies can be passed
    /// through but are marked invalid as destinations.
    pub fn set_move_area(&mut self, piece: PieceId) -> Vec<Position> {
        self.board.clear_marks();
        let Some((start, budget)) = self
            .piece(piece)
            .filter(|p| p.is_on_board())
            .and_then(|p| p.anchor.map(|anchor| (anchor, p.effective_move_range())))
        else {
            return Vec::new();
        };

        if let Some(cell) = self.board.at_mut(start) {
            cell.marks = RangeMarks {
                in_range: true,
                moves_left: Some(budget),
                invalid: false,
                parent: None,
            };
        }

        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            let Some(left) = self
                .board
                .at(current)
                .and_then(|cell| cell.marks().moves_left)
                .filter(|left| *left > 0)
            else {
                continue;
            };

            for direction in Direction::CARDINALS {
                let next = current.step(direction, 1);
                let improves = self
                    .board
                    .at(next)
                    .is_some_and(|cell| cell.marks().moves_left.is_none_or(|seen| left - 1 > seen));
                if !improves || !self.can_pass(piece, next, None) {
                    continue;
                }
                let invalid = !self.can_fit(piece, next, None);
                if let Some(cell) = self.board.at_mut(next) {
                    cell.marks = RangeMarks {
                        in_range: true,
                        moves_left: Some(left - 1),
                        invalid,
                        parent: Some(current),
                    };
                }
                queue.push_back(next);
            }
        }

        self.board.painted().map(|cell| cell.position()).collect()
    }

    /// Legal end cells from the last painted move range, excluding the start.
    pub fn move_destinations(&self) -> Vec<Position> {
        self.board
            .painted()
            .filter(|cell| !cell.marks().invalid && cell.marks().parent.is_some())
            .map(|cell| cell.position())
            .collect()
    }

    /// Path from the painted start cell to `to`, both ends included.
    ///
    /// Empty when `to` was not painted by the last [`BattleState::set_move_area`].
    pub fn move_path(&self, to: Position) -> Vec<Position> {
        if !self.board.at(to).is_some_and(|cell| cell.marks().in_range) {
            return Vec::new();
        }
        let mut path = vec![to];
        let mut current = to;
        while let Some(parent) = self.board.at(current).and_then(|cell| cell.marks().parent) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use crate::board::{Board, TerrainTable, TileCode};
    use crate::state::{BattleState, Piece, PieceId, Position};

    fn placed(
        state: &mut BattleState,
        team: crate::state::TeamId,
        at: Position,
        range: u32,
    ) -> PieceId {
        let id = state.add_piece(Piece::new(PieceId(0), "unit", 5, range), Some(team));
        state.move_piece(id, at).unwrap();
        id
    }

    #[test]
    fn open_board_paints_a_diamond() {
        let mut state = BattleState::new(Board::new(9, 9));
        let id = placed(&mut state, BattleState::PLAYER_TEAM, Position::new(4, 4), 3);
        let painted = state.set_move_area(id);
        assert_eq!(painted.len(), 25);
        assert!(painted.iter().all(|p| p.distance(Position::new(4, 4)) <= 3));
        assert_eq!(state.move_destinations().len(), 24);
    }

    #[test]
    fn allies_are_passed_but_not_destinations() {
        let mut state = BattleState::new(Board::new(5, 1));
        let id = placed(&mut state, BattleState::PLAYER_TEAM, Position::new(0, 0), 3);
        placed(&mut state, BattleState::PLAYER_TEAM, Position::new(1, 0), 1);

        state.set_move_area(id);
        let destinations = state.move_destinations();
        assert!(!destinations.contains(&Position::new(1, 0)));
        assert!(destinations.contains(&Position::new(3, 0)));
        assert_eq!(
            state.move_path(Position::new(3, 0)),
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(3, 0)
            ]
        );
    }

    #[test]
    fn enemies_block_the_search() {
        let mut state = BattleState::new(Board::new(5, 1));
        let id = placed(&mut state, BattleState::PLAYER_TEAM, Position::new(0, 0), 4);
        placed(&mut state, BattleState::ENEMY_TEAM, Position::new(2, 0), 1);

        let painted = state.set_move_area(id);
        assert_eq!(painted, vec![Position::new(0, 0), Position::new(1, 0)]);
    }

    #[test]
    fn detour_around_wall_costs_budget() {
        let rock = TileCode::new(0, TerrainTable::DECORATION_ROCK);
        let rows = vec![
            vec![TileCode::OPEN, rock, TileCode::OPEN],
            vec![TileCode::OPEN, TileCode::OPEN, TileCode::OPEN],
        ];
        let mut state = BattleState::new(Board::from_codes(3, 2, &rows, &TerrainTable::standard()));
        let id = placed(&mut state, BattleState::PLAYER_TEAM, Position::new(0, 0), 3);

        state.set_move_area(id);
        let far = Position::new(2, 0);
        assert_eq!(state.move_path(far).len(), 5);
        assert_eq!(
            state.board.at(far).unwrap().marks().moves_left,
            Some(0)
        );
    }

    #[test]
    fn unpainted_cell_has_no_path() {
        let mut state = BattleState::new(Board::new(9, 9));
        let id = placed(&mut state, BattleState::PLAYER_TEAM, Position::new(0, 0), 1);
        state.set_move_area(id);
        assert!(state.move_path(Position::new(5, 5)).is_empty());
    }
}
