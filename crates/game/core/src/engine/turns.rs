//! Phase transitions and team activation.
//!
//! ```text
//! PreBattle ──start──► Deploy ──end_turn──► Player ──end_turn──► Enemy
//!     │                                       ▲                    │
//!     └──────────start (no deploy cells)──────┤                    │
//!                                             └─turn+1, reinforce──┘
//! any phase ──outcome──► End
//! ```

use crate::combat;
use crate::skill::{ReactionTrigger, fire_reactions};
use crate::state::{
    Direction, Outcome, Phase, PieceId, PresentationIntent, Side, StatusKind, TeamId,
};

use super::{BattleEngine, CommandError};

impl BattleEngine<'_> {
    /// Leaves the pre-battle state.
    ///
    /// Enters the deploy phase when the battle has deploy cells, otherwise
    /// goes straight to the player phase.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::WrongPhase`] unless the battle is still in
    /// its pre-battle state.
    pub fn start(&mut self) -> Result<Phase, CommandError> {
        if self.state.phase != Phase::PreBattle {
            return Err(CommandError::WrongPhase(self.state.phase));
        }
        if self.state.deploy_cells.is_empty() {
            self.begin_player_phase();
        } else {
            self.enter_phase(Phase::Deploy, None);
        }
        self.check_outcome();
        Ok(self.state.phase)
    }

    /// Ends the current phase and runs every transition that follows it.
    ///
    /// # Errors
    ///
    /// Rejected while busy or when the battle is not in progress.
    pub fn try_end_turn(&mut self) -> Result<Phase, CommandError> {
        self.guard_input()?;
        match self.state.phase {
            Phase::Deploy => self.begin_player_phase(),
            Phase::Player => {
                let enemy = self.state.enemy_team();
                self.enter_phase(Phase::Enemy, Some(enemy));
            }
            Phase::Enemy => self.close_round(),
            Phase::PreBattle | Phase::End => {
                return Err(CommandError::NotInProgress);
            }
        }
        self.check_outcome();
        Ok(self.state.phase)
    }

    pub fn end_turn(&mut self) -> bool {
        self.try_end_turn().is_ok()
    }

    fn begin_player_phase(&mut self) {
        let guests: Vec<PieceId> = self
            .state
            .pieces()
            .filter(|piece| piece.guest)
            .map(|piece| piece.id)
            .collect();
        for id in guests {
            if let Some(piece) = self.state.piece_mut(id) {
                piece.guest = false;
            }
        }
        self.face_enemies_toward_player();
        let player = self.state.player_team();
        self.enter_phase(Phase::Player, Some(player));
    }

    /// Enemy phase is over: evaluate, advance the turn, bring in
    /// reinforcements, hand control back to the player.
    ///
    /// The new turn is evaluated only after its reinforcements are placed.
    fn close_round(&mut self) {
        if self.check_outcome().is_some() {
            return;
        }
        self.state.turn += 1;
        self.spawn_reinforcements();
        if self.check_outcome().is_some() {
            return;
        }
        let player = self.state.player_team();
        self.enter_phase(Phase::Player, Some(player));
    }

    fn enter_phase(&mut self, phase: Phase, team: Option<TeamId>) {
        self.state.phase = phase;
        self.state.push_intent(PresentationIntent::Banner {
            phase,
            turn: self.state.turn,
        });

        let turn = self.state.turn;
        let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.state.dialogs)
            .into_iter()
            .partition(|dialog| dialog.turn == turn && dialog.phase == phase);
        self.state.dialogs = later;
        for dialog in due {
            self.state.push_intent(PresentationIntent::Dialog {
                message: dialog.message,
            });
        }

        self.set_active_team(team);
    }

    /// Hands control to `next`.
    ///
    /// Outgoing members run their turn-end bookkeeping and reactions, a
    /// presentation pause follows, then incoming members run turn-start
    /// status effects and reactions. Members resolve one at a time in team
    /// order, each followed by its own death check.
    pub(crate) fn set_active_team(&mut self, next: Option<TeamId>) {
        if let Some(previous) = self.state.active_team {
            for id in self.active_members(previous) {
                if let Some(piece) = self.state.piece_mut(id) {
                    piece.end_turn();
                }
                let hurt = fire_reactions(self.state, id, ReactionTrigger::OnTurnEnd, None);
                combat::resolve_deaths(self.state, hurt);
            }
        }

        self.state.push_intent(PresentationIntent::Pause {
            millis: self.env.config().phase_pause_ms,
        });
        self.state.active_team = next;

        if let Some(next) = next {
            for id in self.active_members(next) {
                if let Some(piece) = self.state.piece_mut(id) {
                    piece.start_turn();
                }
                self.turn_start_effects(id);
            }
        }
    }

    fn active_members(&self, team: TeamId) -> Vec<PieceId> {
        self.state
            .team(team)
            .map(|team| {
                team.members()
                    .iter()
                    .copied()
                    .filter(|id| {
                        self.state
                            .piece(*id)
                            .is_some_and(|p| p.alive && p.is_on_board())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn turn_start_effects(&mut self, id: PieceId) {
        let Some(status) = self.state.piece(id).map(|p| p.status.clone()) else {
            return;
        };
        if status.has(StatusKind::Poisoned) {
            combat::strike(self.state, id, 1);
        }
        if status.has(StatusKind::Regenerating) {
            combat::restore(self.state, id, 1);
        }
        let mut candidates = vec![id];
        candidates.extend(fire_reactions(
            self.state,
            id,
            ReactionTrigger::OnTurnStart,
            None,
        ));
        combat::resolve_deaths(self.state, candidates);
    }

    /// Places every reinforcement that is due. Blocked ones wait for a
    /// later turn.
    fn spawn_reinforcements(&mut self) {
        let turn = self.state.turn;
        let units = self.env.units();
        let pending = std::mem::take(&mut self.state.reinforcements);
        for spawn in pending {
            if spawn.turn > turn || self.state.spawn_unit(units, &spawn, false).is_none() {
                self.state.reinforcements.push(spawn);
            }
        }
    }

    fn face_enemies_toward_player(&mut self) {
        let player_cells: Vec<_> = self
            .state
            .pieces()
            .filter(|p| p.alive && p.is_on_board())
            .filter(|p| self.state.side_of(p.id) == Some(Side::Ally))
            .filter_map(|p| p.anchor)
            .collect();
        let enemies: Vec<_> = self
            .state
            .pieces()
            .filter(|p| p.alive && !p.extra && self.state.side_of(p.id) == Some(Side::Enemy))
            .filter_map(|p| p.anchor.map(|anchor| (p.id, anchor)))
            .collect();

        for (id, anchor) in enemies {
            let Some(nearest) = player_cells
                .iter()
                .min_by_key(|cell| (anchor.distance(**cell), **cell))
            else {
                continue;
            };
            let direction = Direction::between(anchor, *nearest);
            if direction.is_none() {
                continue;
            }
            if let Some(piece) = self.state.piece_mut(id) {
                piece.facing = direction;
            }
            self.state
                .push_intent(PresentationIntent::Face { piece: id, direction });
        }
    }

    /// Ends the battle if an outcome is reached. Returns the outcome.
    ///
    /// Not evaluated during deployment: an empty board is expected there.
    pub(crate) fn check_outcome(&mut self) -> Option<Outcome> {
        match self.state.phase {
            Phase::End => return self.state.outcome,
            Phase::Deploy => return None,
            _ => {}
        }
        let outcome = self.state.evaluate_outcome()?;
        self.state.phase = Phase::End;
        self.state.outcome = Some(outcome);
        self.state.active_team = None;
        self.state.push_intent(PresentationIntent::BattleEnded { outcome });
        Some(outcome)
    }
}
