//! Battle session: the input surface around one running battle.
//!
//! The session owns the [`BattleState`], translates scene input (piece
//! clicks, drags, hovering, keys) into engine commands, and forwards the
//! resulting presentation intents to a [`PresentationPort`]. While a batch
//! is still being presented the battle is busy and all input is ignored.
//! Auto-controlled teams are advanced one unit at a time with [`step`].
//!
//! [`step`]: BattleSession::step

use std::sync::Arc;

use tracing::{debug, info};

use tactics_core::{
    BattleDescriptor, BattleEngine, BattleEnv, BattleState, CommandError, Container, GameConfig,
    GameError, Outcome, Phase, PieceId, Position, TeamId, UnitOracle, UnitTemplate,
};

use crate::error::Result;
use crate::presentation::{PresentationPort, Presented};
use crate::providers::{AiSelector, TurnReport};

/// What the player currently has selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Unit(PieceId),
    Skill { unit: PieceId, index: usize },
}

impl Selection {
    pub fn unit(self) -> Option<PieceId> {
        match self {
            Self::None => None,
            Self::Unit(unit) | Self::Skill { unit, .. } => Some(unit),
        }
    }
}

/// Keys the battle reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Select the skill at this index for the selected unit.
    Skill(usize),
    Cancel,
    Undo,
    Pass,
    EndTurn,
}

impl Key {
    /// Maps a key name from the scene layer: digits pick skills.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Escape" => Some(Self::Cancel),
            "Backspace" | "z" => Some(Self::Undo),
            " " | "p" => Some(Self::Pass),
            "Enter" | "e" => Some(Self::EndTurn),
            digit => match digit.parse::<usize>() {
                Ok(n @ 1..=9) => Some(Self::Skill(n - 1)),
                _ => None,
            },
        }
    }
}

pub struct BattleSession<P> {
    state: BattleState,
    units: Arc<dyn UnitOracle>,
    config: GameConfig,
    port: P,
    selector: AiSelector,
    selection: Selection,
    preview: Vec<Position>,
}

impl<P: PresentationPort> BattleSession<P> {
    /// Builds the battle described by `descriptor`; `party` fills the
    /// deployment roster when the battle has deploy cells.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RuntimeError::Descriptor`] for a malformed descriptor.
    pub fn new(
        descriptor: &BattleDescriptor,
        units: Arc<dyn UnitOracle>,
        config: GameConfig,
        party: &[UnitTemplate],
        port: P,
    ) -> Result<Self> {
        let state = descriptor.build(&BattleEnv::new(units.as_ref(), &config), party)?;
        Ok(Self::from_state(state, units, config, port))
    }

    /// Wraps an already built battle.
    pub fn from_state(
        state: BattleState,
        units: Arc<dyn UnitOracle>,
        config: GameConfig,
        port: P,
    ) -> Self {
        Self {
            state,
            units,
            config,
            port,
            selector: AiSelector::new(0),
            selection: Selection::None,
            preview: Vec::new(),
        }
    }

    /// Reseeds the AI tie-breaker.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.selector = AiSelector::new(seed);
        self
    }

    /// Hands `team`'s turns to the AI selector.
    pub fn set_auto_control(&mut self, team: TeamId, auto_control: bool) {
        if let Some(team) = self.state.team_mut(team) {
            team.auto_control = auto_control;
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    pub fn active_team(&self) -> Option<TeamId> {
        self.state.active_team
    }

    pub fn is_busy(&self) -> bool {
        self.state.busy
    }

    /// True while the battle runs and nothing is being presented.
    pub fn accepts_input(&self) -> bool {
        !self.state.busy && self.state.in_progress()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    /// A battle is in progress; leaving now would lose it.
    pub fn unsaved(&self) -> bool {
        self.state.in_progress()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Cells highlighted by the last [`Self::mouse_over`].
    pub fn preview(&self) -> &[Position] {
        &self.preview
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_parts(self) -> (BattleState, P) {
        (self.state, self.port)
    }

    // ========================================================================
    // Presentation
    // ========================================================================

    /// Signals that the pending batch finished playing.
    pub fn acknowledge(&mut self) {
        self.state.busy = false;
    }

    fn dispatch(&mut self) {
        let intents = self.state.drain_intents();
        if intents.is_empty() {
            return;
        }
        self.state.busy = true;
        if self.port.present(&intents) == Presented::Done {
            self.state.busy = false;
        }
    }

    fn command<T>(&mut self, command: impl FnOnce(&mut BattleEngine<'_>) -> T) -> T {
        let env = BattleEnv::new(self.units.as_ref(), &self.config);
        let result = command(&mut BattleEngine::new(&mut self.state, env));
        self.dispatch();
        result
    }

    fn accepted<T>(&self, command: &str, result: std::result::Result<T, CommandError>) -> bool {
        match result {
            Ok(_) => true,
            Err(error) => {
                debug!(command, code = error.error_code(), %error, "command rejected");
                false
            }
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Leaves the pre-battle state.
    ///
    /// # Errors
    ///
    /// Fails when the battle was already started.
    pub fn start(&mut self) -> Result<Phase> {
        let phase = self.command(|engine| engine.start())?;
        info!(%phase, turn = self.state.turn, "battle started");
        Ok(phase)
    }

    pub fn submit_move(&mut self, unit: PieceId, cell: Position) -> bool {
        let result = self.command(|engine| engine.try_move(unit, cell));
        self.accepted("move", result)
    }

    pub fn submit_undo_move(&mut self, unit: PieceId) -> bool {
        let result = self.command(|engine| engine.try_undo_move(unit));
        self.accepted("undo", result)
    }

    pub fn submit_skill_use(&mut self, unit: PieceId, index: usize, cell: Position) -> bool {
        let result = self.command(|engine| engine.try_skill_use(unit, index, cell));
        let used = self.accepted("skill", result);
        if used {
            self.clear_selection();
            self.log_outcome();
        }
        used
    }

    pub fn submit_deploy(&mut self, unit: PieceId, cell: Position) -> bool {
        let result = self.command(|engine| engine.try_deploy(unit, cell));
        self.accepted("deploy", result)
    }

    pub fn submit_withdraw(&mut self, unit: PieceId) -> bool {
        let result = self.command(|engine| engine.try_withdraw(unit));
        self.accepted("withdraw", result)
    }

    pub fn pass(&mut self, unit: PieceId) -> bool {
        let result = self.command(|engine| engine.try_pass(unit));
        let passed = self.accepted("pass", result);
        if passed {
            self.clear_selection();
        }
        passed
    }

    pub fn end_turn(&mut self) -> bool {
        let from = self.state.phase;
        let result = self.command(|engine| engine.try_end_turn());
        let ended = self.accepted("end turn", result);
        if ended {
            self.clear_selection();
            info!(%from, to = %self.state.phase, turn = self.state.turn, "phase changed");
            self.log_outcome();
        }
        ended
    }

    fn log_outcome(&self) {
        if let Some(outcome) = self.state.outcome {
            info!(%outcome, turn = self.state.turn, "battle over");
        }
    }

    // ========================================================================
    // Scene input
    // ========================================================================

    fn ignore_while_busy(&self, event: &str) -> bool {
        if self.accepts_input() {
            return false;
        }
        debug!(event, busy = self.state.busy, phase = %self.state.phase, "input ignored");
        true
    }

    /// The active team is waiting for human orders.
    fn player_turn(&self) -> bool {
        matches!(self.state.phase, Phase::Player | Phase::Enemy)
            && self
                .state
                .active_team
                .and_then(|team| self.state.team(team))
                .is_some_and(|team| !team.auto_control)
    }

    fn clear_selection(&mut self) {
        self.selection = Selection::None;
        self.preview.clear();
        self.state.board.clear_marks();
    }

    /// Selects `unit` and paints its move area.
    fn select_unit(&mut self, unit: PieceId) {
        self.selection = Selection::Unit(unit);
        self.preview.clear();
        if self.state.piece(unit).is_some_and(|piece| piece.can_move()) {
            self.state.set_move_area(unit);
        } else {
            self.state.board.clear_marks();
        }
    }

    fn use_selected(&mut self, cell: Position) -> bool {
        let Selection::Skill { unit, index } = self.selection else {
            return false;
        };
        self.submit_skill_use(unit, index, cell)
    }

    /// A piece was clicked, or picked up when `dragging`.
    ///
    /// With a skill selected the piece's cell becomes the target. Otherwise
    /// the piece is selected when it can take orders; during deployment
    /// only party pieces can be picked up.
    pub fn piece_event(&mut self, piece: PieceId, dragging: bool) -> bool {
        if self.ignore_while_busy("piece") {
            return false;
        }
        if self.state.phase == Phase::Deploy {
            if dragging && self.state.party().contains(&piece) {
                self.selection = Selection::Unit(piece);
                return true;
            }
            return false;
        }
        if !self.player_turn() {
            return false;
        }
        if let Selection::Skill { .. } = self.selection
            && let Some(cell) = self.state.piece(piece).and_then(|p| p.anchor)
        {
            return self.use_selected(cell);
        }
        let controllable = self
            .state
            .active_team
            .is_some_and(|team| self.state.controllable(team).contains(&piece));
        if controllable {
            self.select_unit(piece);
        }
        controllable
    }

    /// A board cell was clicked, or `drag` was dropped on it.
    pub fn position_event(&mut self, cell: Position, drag: Option<PieceId>) -> bool {
        if self.ignore_while_busy("position") {
            return false;
        }
        if self.state.phase == Phase::Deploy {
            let Some(unit) = drag.or(self.selection.unit()) else {
                return false;
            };
            let deployed = self.submit_deploy(unit, cell);
            self.selection = Selection::None;
            return deployed;
        }
        if !self.player_turn() {
            return false;
        }
        match (self.selection, drag) {
            (Selection::Skill { .. }, _) => self.use_selected(cell),
            (Selection::Unit(unit), None) | (_, Some(unit)) => {
                let moved = self.submit_move(unit, cell);
                if moved {
                    self.selection = Selection::Unit(unit);
                    self.state.board.clear_marks();
                }
                moved
            }
            (Selection::None, None) => false,
        }
    }

    /// `drag` was dropped on a container; the roster takes units back
    /// during deployment.
    pub fn container_event(&mut self, container: Container, drag: Option<PieceId>) -> bool {
        if self.ignore_while_busy("container") {
            return false;
        }
        match (self.state.phase, container, drag) {
            (Phase::Deploy, Container::Roster, Some(unit)) => {
                self.selection = Selection::None;
                self.submit_withdraw(unit)
            }
            _ => false,
        }
    }

    /// Hovering `cell`: previews the area of the selected skill, or the
    /// drop cell of a dragged unit during deployment.
    pub fn mouse_over(&mut self, cell: Position, drag: Option<PieceId>) -> &[Position] {
        self.preview.clear();
        if !self.accepts_input() {
            return &self.preview;
        }
        match self.selection {
            Selection::Skill { unit, index } => {
                if let Some(skill) = self.state.piece(unit).and_then(|p| p.skills.get(index))
                    && self.state.valid_target(unit, skill, cell)
                {
                    self.preview = self.state.affected_cells(skill, cell);
                }
            }
            _ if self.state.phase == Phase::Deploy => {
                if drag.is_some() && self.state.deploy_cells.contains(&cell) {
                    self.preview.push(cell);
                }
            }
            _ => {}
        }
        &self.preview
    }

    /// Steps the selection back: skill → unit → nothing. A unit that
    /// moved but has not acted is sent back to its home cell first.
    pub fn right_click(&mut self) -> bool {
        if self.ignore_while_busy("right click") {
            return false;
        }
        match self.selection {
            Selection::Skill { unit, .. } => {
                self.select_unit(unit);
                true
            }
            Selection::Unit(unit) => {
                let undoable = self.player_turn()
                    && self
                        .state
                        .piece(unit)
                        .is_some_and(|piece| piece.moved && !piece.action_used);
                if undoable && self.submit_undo_move(unit) {
                    self.select_unit(unit);
                } else {
                    self.clear_selection();
                }
                true
            }
            Selection::None => false,
        }
    }

    pub fn keydown(&mut self, key: Key) -> bool {
        if self.ignore_while_busy("key") {
            return false;
        }
        match key {
            Key::Cancel => self.right_click(),
            Key::EndTurn => {
                let allowed = self.state.phase == Phase::Deploy || self.player_turn();
                allowed && self.end_turn()
            }
            Key::Skill(index) => {
                let Some(unit) = self.selection.unit() else {
                    return false;
                };
                if !self.player_turn()
                    || !self.state.piece(unit).is_some_and(|p| p.can_use(index))
                {
                    return false;
                }
                self.selection = Selection::Skill { unit, index };
                self.preview.clear();
                self.state.set_target_area(unit, index);
                true
            }
            Key::Undo => match self.selection.unit() {
                Some(unit) if self.player_turn() && self.submit_undo_move(unit) => {
                    self.select_unit(unit);
                    true
                }
                _ => false,
            },
            Key::Pass => match self.selection.unit() {
                Some(unit) if self.player_turn() => self.pass(unit),
                _ => false,
            },
        }
    }

    // ========================================================================
    // Auto-control
    // ========================================================================

    fn auto_controlled(&self, team: TeamId) -> bool {
        self.state.team(team).is_some_and(|team| team.auto_control)
    }

    /// Places roster units on free deploy cells, in roster order, up to the
    /// deploy limit. Returns how many were placed.
    ///
    /// Each placement is acknowledged right away so the next one is not
    /// rejected as busy.
    pub fn auto_deploy(&mut self) -> usize {
        let bench: Vec<PieceId> = self.state.bench().collect();
        let cells = self.state.deploy_cells.clone();
        let mut placed = 0;
        for unit in bench {
            if self.state.deployed_count() >= self.state.max_deploy {
                break;
            }
            let free = cells.iter().copied().find(|cell| {
                self.state
                    .board
                    .at(*cell)
                    .is_some_and(|c| c.is_empty())
                    && self.state.can_fit(unit, *cell, None)
            });
            if let Some(cell) = free
                && self.submit_deploy(unit, cell)
            {
                placed += 1;
                self.acknowledge();
            }
        }
        placed
    }

    /// Advances an auto-controlled team by one decision.
    ///
    /// Deploys and starts the battle when the player team is automated,
    /// plays one unit's turn, or ends the phase once no unit can act.
    /// Returns `None` when there was nothing to do (busy, finished, or
    /// waiting for human input).
    pub fn step(&mut self) -> Option<TurnReport> {
        if !self.accepts_input() {
            return None;
        }
        match self.state.phase {
            Phase::Deploy if self.auto_controlled(self.state.player_team()) => {
                let placed = self.auto_deploy();
                debug!(placed, "ai deployed");
                self.end_turn();
                Some(TurnReport::default())
            }
            Phase::Player | Phase::Enemy => {
                let team = self.state.active_team.filter(|team| self.auto_controlled(*team))?;
                let Some(unit) = self.selector.next_unit(&self.state, team) else {
                    self.end_turn();
                    return Some(TurnReport::default());
                };
                let env = BattleEnv::new(self.units.as_ref(), &self.config);
                let mut engine = BattleEngine::new(&mut self.state, env);
                let report = self.selector.take_turn(&mut engine, unit);
                self.dispatch();
                self.log_outcome();
                Some(report)
            }
            _ => None,
        }
    }
}
