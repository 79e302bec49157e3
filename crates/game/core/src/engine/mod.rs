//! Phase state machine and command surface.
//!
//! The [`BattleEngine`] is the only writer of a [`BattleState`] once a battle
//! has started. Every command comes in two forms: `try_*` returns the
//! rejection reason, `submit_*` returns a plain `bool` for callers that only
//! need to know whether anything happened. A rejected command never changes
//! the state.

mod deploy;
mod errors;
mod outcome;
mod turns;

pub use errors::CommandError;
pub use outcome::evaluate_outcome;

use crate::env::BattleEnv;
use crate::skill::{SkillOutcome, use_skill};
use crate::state::{BattleState, Phase, PieceId, Position, PresentationIntent};

/// Drives one battle: phases, team activation and unit commands.
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
    env: BattleEnv<'a>,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState, env: BattleEnv<'a>) -> Self {
        Self { state, env }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    pub fn env(&self) -> &BattleEnv<'a> {
        &self.env
    }

    /// Rejects input while busy or outside a running battle.
    fn guard_input(&self) -> Result<(), CommandError> {
        if self.state.busy {
            return Err(CommandError::Busy);
        }
        if !self.state.in_progress() {
            return Err(CommandError::NotInProgress);
        }
        Ok(())
    }

    /// Rejects unit orders unless `unit` belongs to the active team during a
    /// player or enemy phase.
    fn guard_unit(&self, unit: PieceId) -> Result<(), CommandError> {
        self.guard_input()?;
        if !matches!(self.state.phase, Phase::Player | Phase::Enemy) {
            return Err(CommandError::WrongPhase(self.state.phase));
        }
        let piece = self
            .state
            .piece(unit)
            .ok_or(CommandError::PieceNotFound(unit))?;
        if piece.team.is_none() || piece.team != self.state.active_team {
            return Err(CommandError::NotActive(unit));
        }
        Ok(())
    }

    // ========================================================================
    // Movement
    // ========================================================================

    /// Moves `unit` along the shortest painted path to `destination`.
    ///
    /// # Errors
    ///
    /// Rejected when the unit cannot move this turn or the destination is
    /// not a legal end cell of its move range.
    pub fn try_move(&mut self, unit: PieceId, destination: Position) -> Result<(), CommandError> {
        self.guard_unit(unit)?;
        if !self.state.piece(unit).is_some_and(|p| p.can_move()) {
            return Err(CommandError::CannotMove(unit));
        }

        self.state.set_move_area(unit);
        let reachable = self.state.move_destinations().contains(&destination);
        let path = self.state.move_path(destination);
        self.state.board.clear_marks();
        if !reachable {
            return Err(CommandError::Unreachable {
                piece: unit,
                destination,
            });
        }

        self.state.move_piece(unit, destination)?;
        if let Some(piece) = self.state.piece_mut(unit) {
            piece.moved = true;
        }
        self.state
            .push_intent(PresentationIntent::Move { piece: unit, path });
        Ok(())
    }

    pub fn submit_move(&mut self, unit: PieceId, destination: Position) -> bool {
        self.try_move(unit, destination).is_ok()
    }

    /// Returns a unit that moved but has not acted to its home cell.
    ///
    /// # Errors
    ///
    /// Rejected when the unit has not moved, has already acted, or its home
    /// cell is no longer free.
    pub fn try_undo_move(&mut self, unit: PieceId) -> Result<(), CommandError> {
        self.guard_unit(unit)?;
        let (home, from) = self
            .state
            .piece(unit)
            .filter(|p| p.moved && !p.action_used)
            .and_then(|p| p.home.zip(p.anchor))
            .ok_or(CommandError::NothingToUndo(unit))?;

        self.state.move_piece(unit, home)?;
        if let Some(piece) = self.state.piece_mut(unit) {
            piece.moved = false;
        }
        self.state.push_intent(PresentationIntent::Move {
            piece: unit,
            path: vec![from, home],
        });
        Ok(())
    }

    pub fn submit_undo_move(&mut self, unit: PieceId) -> bool {
        self.try_undo_move(unit).is_ok()
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Uses a skill, then checks whether the battle is over.
    ///
    /// # Errors
    ///
    /// Returns the guard rejection or the [`crate::skill::SkillError`] that
    /// stopped validation.
    pub fn try_skill_use(
        &mut self,
        unit: PieceId,
        index: usize,
        target: Position,
    ) -> Result<SkillOutcome, CommandError> {
        self.guard_unit(unit)?;
        let outcome = use_skill(self.state, &self.env, unit, index, target)?;
        self.check_outcome();
        Ok(outcome)
    }

    pub fn submit_skill_use(&mut self, unit: PieceId, index: usize, target: Position) -> bool {
        self.try_skill_use(unit, index, target).is_ok()
    }

    /// Ends `unit`'s turn without acting.
    ///
    /// # Errors
    ///
    /// Returns the guard rejection.
    pub fn try_pass(&mut self, unit: PieceId) -> Result<(), CommandError> {
        self.guard_unit(unit)?;
        if let Some(piece) = self.state.piece_mut(unit) {
            piece.action_used = true;
            piece.moved = true;
        }
        self.state
            .push_intent(PresentationIntent::Refresh { piece: unit });
        Ok(())
    }

    pub fn pass(&mut self, unit: PieceId) -> bool {
        self.try_pass(unit).is_ok()
    }
}
