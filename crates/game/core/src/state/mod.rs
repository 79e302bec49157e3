//! Authoritative battle state representation.
//!
//! This module owns the board, the piece table, teams and scene bookkeeping.
//! Presentation layers clone or query this state but mutate it exclusively
//! through [`crate::engine::BattleEngine`] and the occupancy/skill APIs.
pub mod types;

use std::collections::BTreeMap;

pub use types::{
    Container, DialogTrigger, Direction, Outcome, Phase, Piece, PieceId, Position,
    PresentationIntent, Reactions, Side, StatusEffects, StatusKind, Team, TeamId, TurnLimits,
    UnitSpawn,
};

use crate::board::Board;

/// Canonical snapshot of one battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub board: Board,
    pieces: BTreeMap<PieceId, Piece>,
    teams: Vec<Team>,
    player_team: TeamId,
    enemy_team: TeamId,
    /// Pieces that came from the party roster (deployable).
    party: Vec<PieceId>,

    pub turn: u32,
    pub phase: Phase,
    pub outcome: Option<Outcome>,
    pub active_team: Option<TeamId>,
    pub limits: TurnLimits,
    /// Spawns still waiting for their turn.
    pub reinforcements: Vec<UnitSpawn>,
    pub dialogs: Vec<DialogTrigger>,
    pub deploy_cells: Vec<Position>,
    pub max_deploy: usize,
    /// Set while presentation of a resolved action is pending; input is ignored.
    pub busy: bool,

    /// Sequential piece ID allocator (monotonically increasing, never reused).
    next_piece_id: u32,
    intents: Vec<PresentationIntent>,
}

impl BattleState {
    pub const PLAYER_TEAM: TeamId = TeamId(0);
    pub const ENEMY_TEAM: TeamId = TeamId(1);

    /// Creates an empty battle with a human-controlled player team and an
    /// AI-controlled enemy team.
    pub fn new(board: Board) -> Self {
        Self {
            board,
            pieces: BTreeMap::new(),
            teams: vec![
                Team::new(Self::PLAYER_TEAM, "Player", Side::Ally),
                Team::new(Self::ENEMY_TEAM, "Enemy", Side::Enemy).auto_controlled(true),
            ],
            player_team: Self::PLAYER_TEAM,
            enemy_team: Self::ENEMY_TEAM,
            party: Vec::new(),
            turn: 1,
            phase: Phase::PreBattle,
            outcome: None,
            active_team: None,
            limits: TurnLimits::default(),
            reinforcements: Vec::new(),
            dialogs: Vec::new(),
            deploy_cells: Vec::new(),
            max_deploy: 0,
            busy: false,
            next_piece_id: 1,
            intents: Vec::new(),
        }
    }

    // ========================================================================
    // Pieces
    // ========================================================================

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(&id)
    }

    /// All pieces ever created in this battle, dead ones included.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// Inserts a detached piece under a fresh id and returns that id.
    pub fn add_piece(&mut self, mut piece: Piece, team: Option<TeamId>) -> PieceId {
        let id = PieceId(self.next_piece_id);
        self.next_piece_id += 1;
        piece.id = id;
        piece.team = None;
        piece.container = Container::Detached;
        piece.anchor = None;
        self.pieces.insert(id, piece);
        if let Some(team) = team {
            self.assign_team(id, team);
        }
        id
    }

    /// Inserts a party piece onto the deployment roster.
    pub fn add_party_piece(&mut self, piece: Piece) -> PieceId {
        let id = self.add_piece(piece, Some(self.player_team));
        if let Some(piece) = self.pieces.get_mut(&id) {
            piece.container = Container::Roster;
        }
        self.party.push(id);
        id
    }

    pub fn party(&self) -> &[PieceId] {
        &self.party
    }

    /// Party pieces currently waiting on the roster.
    pub fn bench(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.party.iter().copied().filter(|id| {
            self.piece(*id)
                .is_some_and(|piece| piece.container == Container::Roster)
        })
    }

    /// Party pieces currently placed on the board.
    pub fn deployed_count(&self) -> usize {
        self.party
            .iter()
            .filter(|id| self.piece(**id).is_some_and(Piece::is_on_board))
            .count()
    }

    // ========================================================================
    // Teams
    // ========================================================================

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|team| team.id == id)
    }

    pub fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|team| team.id == id)
    }

    pub fn player_team(&self) -> TeamId {
        self.player_team
    }

    pub fn enemy_team(&self) -> TeamId {
        self.enemy_team
    }

    pub fn team_of(&self, piece: PieceId) -> Option<&Team> {
        self.piece(piece)
            .and_then(|piece| piece.team)
            .and_then(|team| self.team(team))
    }

    pub fn side_of(&self, piece: PieceId) -> Option<Side> {
        self.team_of(piece).map(|team| team.side)
    }

    /// True when both pieces fight on the same side.
    pub fn are_allies(&self, a: PieceId, b: PieceId) -> bool {
        matches!((self.side_of(a), self.side_of(b)), (Some(x), Some(y)) if x == y)
    }

    /// Moves a piece into `team`, leaving its previous team first.
    pub fn assign_team(&mut self, piece: PieceId, team: TeamId) -> bool {
        if self.team(team).is_none() || !self.pieces.contains_key(&piece) {
            return false;
        }
        self.leave_team(piece);
        if let Some(team) = self.team_mut(team) {
            team.add_member(piece);
        }
        if let Some(piece) = self.pieces.get_mut(&piece) {
            piece.team = Some(team);
        }
        true
    }

    pub fn leave_team(&mut self, piece: PieceId) {
        let Some(previous) = self.piece(piece).and_then(|piece| piece.team) else {
            return;
        };
        if let Some(team) = self.team_mut(previous) {
            team.remove_member(piece);
        }
        if let Some(piece) = self.pieces.get_mut(&piece) {
            piece.team = None;
        }
    }

    /// Members that count toward victory checks: alive, on the board and
    /// not flagged as extras.
    pub fn team_size(&self, team: TeamId) -> usize {
        self.team(team).map_or(0, |team| {
            team.members()
                .iter()
                .filter_map(|id| self.piece(*id))
                .filter(|piece| piece.alive && piece.is_on_board() && !piece.extra)
                .count()
        })
    }

    /// Members of `team` that can still be given orders this turn.
    pub fn controllable(&self, team: TeamId) -> Vec<PieceId> {
        self.team(team).map_or_else(Vec::new, |team| {
            team.members()
                .iter()
                .copied()
                .filter(|id| {
                    self.piece(*id)
                        .is_some_and(|piece| piece.can_act() && !piece.extra)
                })
                .collect()
        })
    }

    pub fn active_side(&self) -> Option<Side> {
        self.active_team
            .and_then(|team| self.team(team))
            .map(|team| team.side)
    }

    /// True while a battle has started and not yet ended.
    pub fn in_progress(&self) -> bool {
        !matches!(self.phase, Phase::PreBattle | Phase::End)
    }

    // ========================================================================
    // Presentation intents
    // ========================================================================

    pub(crate) fn push_intent(&mut self, intent: PresentationIntent) {
        self.intents.push(intent);
    }

    pub fn intents(&self) -> &[PresentationIntent] {
        &self.intents
    }

    /// Hands all pending intents to the presentation layer.
    pub fn drain_intents(&mut self) -> Vec<PresentationIntent> {
        std::mem::take(&mut self.intents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_belongs_to_one_team_at_a_time() {
        let mut state = BattleState::new(Board::new(3, 3));
        let id = state.add_piece(
            Piece::new(PieceId(0), "unit", 3, 2),
            Some(BattleState::PLAYER_TEAM),
        );
        assert!(state.assign_team(id, BattleState::ENEMY_TEAM));

        let player = state.team(BattleState::PLAYER_TEAM).map(Team::members);
        let enemy = state.team(BattleState::ENEMY_TEAM).map(Team::members);
        assert_eq!(player, Some(&[][..]));
        assert_eq!(enemy, Some(&[id][..]));
        assert_eq!(state.side_of(id), Some(Side::Enemy));
    }

    #[test]
    fn ids_are_never_reused() {
        let mut state = BattleState::new(Board::new(3, 3));
        let a = state.add_piece(Piece::new(PieceId(0), "a", 1, 1), None);
        let b = state.add_piece(Piece::new(PieceId(0), "b", 1, 1), None);
        assert_ne!(a, b);
    }

    #[test]
    fn party_pieces_start_on_the_roster() {
        let mut state = BattleState::new(Board::new(3, 3));
        let id = state.add_party_piece(Piece::new(PieceId(0), "a", 1, 1));
        assert_eq!(state.bench().collect::<Vec<_>>(), vec![id]);
        assert_eq!(state.deployed_count(), 0);
        assert_eq!(state.team_size(BattleState::PLAYER_TEAM), 0);
    }
}
