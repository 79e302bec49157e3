//! Hit point and status bookkeeping shared by skills, reactions and turn hooks.
//!
//! Every function here mutates one piece and records the matching
//! presentation intent. Death is never applied inline: callers collect the
//! pieces they touched and hand them to [`resolve_deaths`] once their stage
//! is finished.

use crate::skill::{ReactionTrigger, fire_reactions};
use crate::state::{BattleState, PieceId, PresentationIntent, StatusKind};

/// Damages `target` without firing reactions. Returns hit points lost.
pub(crate) fn strike(state: &mut BattleState, target: PieceId, amount: u32) -> u32 {
    let Some(piece) = state.piece_mut(target).filter(|p| p.alive) else {
        return 0;
    };
    let lost = piece.take_damage(amount);
    state.push_intent(PresentationIntent::Damage {
        piece: target,
        amount: lost,
    });
    lost
}

/// Damages `target` on behalf of `attacker` and fires its on-hit reactions
/// when it survives.
///
/// Returns hit points lost and the pieces the reactions hurt.
pub(crate) fn hit(
    state: &mut BattleState,
    target: PieceId,
    amount: u32,
    attacker: PieceId,
) -> (u32, Vec<PieceId>) {
    let lost = strike(state, target, amount);
    let survived = state.piece(target).is_some_and(|p| p.alive && !p.is_dead());
    if !survived {
        return (lost, Vec::new());
    }
    let hurt = fire_reactions(state, target, ReactionTrigger::OnHit, Some(attacker));
    (lost, hurt)
}

/// Heals `target`. Returns hit points gained.
pub(crate) fn restore(state: &mut BattleState, target: PieceId, amount: u32) -> u32 {
    let Some(piece) = state.piece_mut(target).filter(|p| p.alive) else {
        return 0;
    };
    let gained = piece.heal(amount);
    state.push_intent(PresentationIntent::Heal {
        piece: target,
        amount: gained,
    });
    gained
}

pub(crate) fn apply_status(state: &mut BattleState, target: PieceId, kind: StatusKind, turns: u32) {
    let Some(piece) = state.piece_mut(target).filter(|p| p.alive) else {
        return;
    };
    piece.status.add(kind, turns);
    state.push_intent(PresentationIntent::Status {
        piece: target,
        kind,
        turns,
    });
}

/// Living pieces orthogonally adjacent to `piece`'s footprint, in board order.
pub(crate) fn neighbours(state: &BattleState, piece: PieceId) -> Vec<PieceId> {
    let mut out = Vec::new();
    for position in state.footprint(piece) {
        for cell in state.board.adjacent(position) {
            if let Some(occupant) = cell.occupant()
                && occupant != piece
                && !out.contains(&occupant)
                && state.piece(occupant).is_some_and(|p| p.alive)
            {
                out.push(occupant);
            }
        }
    }
    out
}

/// Removes every candidate whose hit points reached zero.
///
/// Each death fires the victim's on-death reactions before removal; pieces
/// killed by those reactions are removed without reacting in turn. Returns
/// the removed pieces in the order they died.
pub fn resolve_deaths(
    state: &mut BattleState,
    candidates: impl IntoIterator<Item = PieceId>,
) -> Vec<PieceId> {
    let mut killed = Vec::new();
    let mut aftershock = Vec::new();
    for id in candidates {
        if is_dying(state, id) {
            aftershock.extend(fire_reactions(state, id, ReactionTrigger::OnDeath, None));
            kill(state, id);
            killed.push(id);
        }
    }
    for id in aftershock {
        if is_dying(state, id) {
            kill(state, id);
            killed.push(id);
        }
    }
    killed
}

fn is_dying(state: &BattleState, id: PieceId) -> bool {
    state.piece(id).is_some_and(|p| p.alive && p.is_dead())
}

fn kill(state: &mut BattleState, id: PieceId) {
    if let Some(piece) = state.piece_mut(id) {
        piece.alive = false;
    }
    // A dead piece may already be off the board.
    let _ = state.remove_piece(id);
    state.leave_team(id);
    state.push_intent(PresentationIntent::Death { piece: id });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::skill::{Reaction, ReactionEffect};
    use crate::state::{Piece, Position, TeamId};

    fn placed(state: &mut BattleState, piece: Piece, team: TeamId, at: Position) -> PieceId {
        let id = state.add_piece(piece, Some(team));
        state.move_piece(id, at).unwrap();
        id
    }

    #[test]
    fn retaliation_needs_adjacency() {
        let mut state = BattleState::new(Board::new(5, 1));
        let thorns = Reaction::new(ReactionTrigger::OnHit, ReactionEffect::Retaliate { power: 1 });
        let target = placed(
            &mut state,
            Piece::new(PieceId(0), "thorny", 5, 1).with_reaction(thorns),
            BattleState::ENEMY_TEAM,
            Position::new(1, 0),
        );
        let near = placed(
            &mut state,
            Piece::new(PieceId(0), "near", 5, 1),
            BattleState::PLAYER_TEAM,
            Position::new(0, 0),
        );
        let far = placed(
            &mut state,
            Piece::new(PieceId(0), "far", 5, 1),
            BattleState::PLAYER_TEAM,
            Position::new(4, 0),
        );

        let (_, hurt) = hit(&mut state, target, 1, far);
        assert!(hurt.is_empty());
        let (_, hurt) = hit(&mut state, target, 1, near);
        assert_eq!(hurt, vec![near]);
        assert_eq!(state.piece(near).unwrap().hp, 4);
    }

    #[test]
    fn death_burst_does_not_chain() {
        let mut state = BattleState::new(Board::new(3, 1));
        let burst = Reaction::new(ReactionTrigger::OnDeath, ReactionEffect::Burst { power: 9 });
        let left = placed(
            &mut state,
            Piece::new(PieceId(0), "bomb", 1, 1).with_reaction(burst),
            BattleState::ENEMY_TEAM,
            Position::new(0, 0),
        );
        let middle = placed(
            &mut state,
            Piece::new(PieceId(0), "bomb", 1, 1).with_reaction(burst),
            BattleState::ENEMY_TEAM,
            Position::new(1, 0),
        );
        let right = placed(
            &mut state,
            Piece::new(PieceId(0), "bystander", 3, 1),
            BattleState::PLAYER_TEAM,
            Position::new(2, 0),
        );

        strike(&mut state, left, 1);
        let killed = resolve_deaths(&mut state, [left]);
        assert_eq!(killed, vec![left, middle]);
        assert_eq!(state.piece(right).unwrap().hp, 3);
        assert!(state.board.at(Position::new(1, 0)).unwrap().is_empty());
    }

    #[test]
    fn dead_pieces_leave_the_board() {
        let mut state = BattleState::new(Board::new(3, 3));
        let id = placed(
            &mut state,
            Piece::new(PieceId(0), "frail", 1, 1),
            BattleState::ENEMY_TEAM,
            Position::new(1, 1),
        );
        strike(&mut state, id, 5);
        assert_eq!(resolve_deaths(&mut state, [id, id]), vec![id]);
        assert!(!state.piece(id).unwrap().alive);
        assert_eq!(state.piece(id).unwrap().team, None);
        let members = state.team(BattleState::ENEMY_TEAM).unwrap().members();
        assert!(!members.contains(&id));
        assert_eq!(state.team_size(BattleState::ENEMY_TEAM), 0);
        assert!(state.intents().contains(&PresentationIntent::Death { piece: id }));
    }
}
