//! Deployment commands: placing party units before the first player phase.

use crate::state::{Phase, PieceId, Position, PresentationIntent};

use super::{BattleEngine, CommandError};

impl BattleEngine<'_> {
    fn guard_deploy(&self, unit: PieceId) -> Result<(), CommandError> {
        self.guard_input()?;
        if self.state.phase != Phase::Deploy {
            return Err(CommandError::WrongPhase(self.state.phase));
        }
        if !self.state.party().contains(&unit) {
            return Err(CommandError::NotInParty(unit));
        }
        Ok(())
    }

    /// Places a party unit on a deploy cell.
    ///
    /// A unit already on the board trades places with a party unit standing
    /// on the cell; a unit from the roster replaces it, sending it back to
    /// the roster. Placing a new unit on an empty cell respects the deploy
    /// limit.
    ///
    /// # Errors
    ///
    /// Rejected outside the deploy phase, for non-party units, for cells
    /// outside the deploy area, and when the deploy limit is reached.
    pub fn try_deploy(&mut self, unit: PieceId, cell: Position) -> Result<(), CommandError> {
        self.guard_deploy(unit)?;
        if !self.state.deploy_cells.contains(&cell) {
            return Err(CommandError::NotDeployCell(cell));
        }

        let on_board = self.state.piece(unit).is_some_and(|p| p.is_on_board());
        let from = self.state.piece(unit).and_then(|p| p.anchor);
        let occupant = self
            .state
            .board
            .at(cell)
            .and_then(|c| c.occupant())
            .filter(|id| *id != unit);

        match occupant {
            Some(other) if self.state.party().contains(&other) => {
                if on_board {
                    self.state.swap_pieces(unit, other)?;
                    if let Some(from) = from {
                        self.state.push_intent(PresentationIntent::Move {
                            piece: other,
                            path: vec![cell, from],
                        });
                    }
                } else {
                    self.state.bench_piece(other)?;
                    if let Err(error) = self.state.move_piece(unit, cell) {
                        self.state.move_piece(other, cell)?;
                        return Err(error.into());
                    }
                    self.state
                        .push_intent(PresentationIntent::Remove { piece: other });
                }
            }
            Some(_) => {
                return Err(CommandError::Move(crate::movement::MoveError::Blocked {
                    piece: unit,
                    destination: cell,
                }));
            }
            None => {
                if !on_board && self.state.deployed_count() >= self.state.max_deploy {
                    return Err(CommandError::DeployLimit(self.state.max_deploy));
                }
                self.state.move_piece(unit, cell)?;
            }
        }

        let intent = match from.filter(|_| on_board) {
            Some(from) => PresentationIntent::Move {
                piece: unit,
                path: vec![from, cell],
            },
            None => PresentationIntent::Spawn {
                piece: unit,
                at: cell,
            },
        };
        self.state.push_intent(intent);
        Ok(())
    }

    pub fn submit_deploy(&mut self, unit: PieceId, cell: Position) -> bool {
        self.try_deploy(unit, cell).is_ok()
    }

    /// Sends a deployed party unit back to the roster.
    ///
    /// # Errors
    ///
    /// Rejected outside the deploy phase or for units not on the board.
    pub fn try_withdraw(&mut self, unit: PieceId) -> Result<(), CommandError> {
        self.guard_deploy(unit)?;
        if !self.state.piece(unit).is_some_and(|p| p.is_on_board()) {
            return Err(CommandError::Move(crate::movement::MoveError::NotOnBoard(unit)));
        }
        self.state.bench_piece(unit)?;
        self.state
            .push_intent(PresentationIntent::Remove { piece: unit });
        Ok(())
    }

    pub fn submit_withdraw(&mut self, unit: PieceId) -> bool {
        self.try_withdraw(unit).is_ok()
    }
}
