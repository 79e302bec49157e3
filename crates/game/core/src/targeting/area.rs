//! Valid targets and affected areas of a skill.

use crate::board::{ShapeProps, area_radius};
use crate::skill::{Skill, TargetRule};
use crate::state::{BattleState, PieceId, Position};

impl BattleState {
    /// Whether `user` may aim `skill` at `target`: in range and accepted by
    /// the skill's target rule.
    pub fn valid_target(&self, user: PieceId, skill: &Skill, target: Position) -> bool {
        self.in_range(user, &skill.targeting, target) && self.accepts_target(user, skill, target)
    }

    fn accepts_target(&self, user: PieceId, skill: &Skill, target: Position) -> bool {
        let Some(cell) = self.board.at(target) else {
            return false;
        };
        let unit = cell
            .occupant()
            .filter(|id| self.piece(*id).is_some_and(|p| p.alive && p.targetable));
        match skill.target_rule {
            TargetRule::Unit => unit.is_some(),
            TargetRule::Enemy => unit.is_some_and(|id| !self.are_allies(user, id)),
            TargetRule::Ally => unit.is_some_and(|id| self.are_allies(user, id)),
            TargetRule::EmptyCell => cell.is_empty() && !cell.blocks_move(),
            TargetRule::UserFits => self.can_fit(user, target, None),
            TargetRule::AnyCell => true,
        }
    }

    /// Every cell `user` could aim the skill at `index` on, in board order.
    pub fn valid_targets(&self, user: PieceId, index: usize) -> Vec<Position> {
        let Some((origin, skill)) = self
            .piece(user)
            .and_then(|p| p.anchor.zip(p.skills.get(index)))
        else {
            return Vec::new();
        };
        let window = skill.targeting.range.saturating_mul(2).saturating_add(1);
        let mut targets: Vec<Position> = self
            .board
            .area_positions(origin, window, None)
            .into_iter()
            .flatten()
            .filter(|position| self.valid_target(user, skill, *position))
            .collect();
        targets.sort_by_key(|position| (position.y, position.x));
        targets
    }

    /// Paints the valid targets of a skill onto the cell marks.
    pub fn set_target_area(&mut self, user: PieceId, index: usize) -> Vec<Position> {
        self.board.clear_marks();
        let targets = self.valid_targets(user, index);
        for position in &targets {
            if let Some(cell) = self.board.at_mut(*position) {
                cell.marks.in_range = true;
            }
        }
        targets
    }

    /// On-board cells covered by the skill's area around `target`.
    pub fn affected_cells(&self, skill: &Skill, target: Position) -> Vec<Position> {
        let props = ShapeProps::new(area_radius(skill.area).unsigned_abs(), 0);
        self.board
            .area_positions(target, skill.area, Some((skill.area_shape, props)))
            .into_iter()
            .flatten()
            .collect()
    }

    /// Living, targetable occupants of `cells`, each listed once.
    pub fn affected_units(&self, cells: &[Position]) -> Vec<PieceId> {
        let mut units = Vec::new();
        for position in cells {
            if let Some(id) = self.board.at(*position).and_then(|cell| cell.occupant())
                && !units.contains(&id)
                && self.piece(id).is_some_and(|p| p.alive && p.targetable)
            {
                units.push(id);
            }
        }
        units
    }
}

#[cfg(test)]
mod tests {
    use crate::board::{Board, Shape};
    use crate::skill::{Skill, SkillEffect, TargetRule};
    use crate::state::{BattleState, Piece, PieceId, Position, TeamId};

    fn placed(state: &mut BattleState, piece: Piece, team: TeamId, at: Position) -> PieceId {
        let id = state.add_piece(piece, Some(team));
        state.move_piece(id, at).unwrap();
        id
    }

    fn strike() -> Skill {
        Skill::new("strike", SkillEffect::Damage { push: 0 }, TargetRule::Enemy).with_power(1)
    }

    #[test]
    fn enemy_rule_ignores_allies() {
        let mut state = BattleState::new(Board::new(5, 5));
        let user = placed(
            &mut state,
            Piece::new(PieceId(0), "a", 5, 3).with_skill(strike()),
            BattleState::PLAYER_TEAM,
            Position::new(2, 2),
        );
        placed(
            &mut state,
            Piece::new(PieceId(0), "b", 5, 3),
            BattleState::PLAYER_TEAM,
            Position::new(2, 1),
        );
        let foe = placed(
            &mut state,
            Piece::new(PieceId(0), "c", 5, 3),
            BattleState::ENEMY_TEAM,
            Position::new(3, 2),
        );

        assert_eq!(state.valid_targets(user, 0), vec![Position::new(3, 2)]);
        assert_eq!(state.affected_units(&[Position::new(3, 2)]), vec![foe]);
    }

    #[test]
    fn big_piece_is_listed_once() {
        let mut state = BattleState::new(Board::new(5, 5));
        let big = placed(
            &mut state,
            Piece::new(PieceId(0), "big", 5, 1).with_footprint(3),
            BattleState::ENEMY_TEAM,
            Position::new(2, 2),
        );
        let blast = strike().with_area(3, Shape::Square);
        let cells = state.affected_cells(&blast, Position::new(2, 2));
        assert_eq!(cells.len(), 9);
        assert_eq!(state.affected_units(&cells), vec![big]);
    }

    #[test]
    fn untargetable_pieces_are_skipped() {
        let mut state = BattleState::new(Board::new(3, 3));
        let mut wall = Piece::new(PieceId(0), "wall", 3, 0);
        wall.targetable = false;
        placed(&mut state, wall, BattleState::ENEMY_TEAM, Position::new(1, 1));
        assert!(state.affected_units(&[Position::new(1, 1)]).is_empty());
    }

    #[test]
    fn affected_area_clips_at_edges() {
        let state = BattleState::new(Board::new(4, 4));
        let blast = strike().with_area(3, Shape::Circle);
        assert_eq!(state.affected_cells(&blast, Position::new(0, 0)).len(), 3);
        assert_eq!(state.affected_cells(&blast, Position::new(1, 1)).len(), 5);
    }

    #[test]
    fn target_area_paints_marks() {
        let mut state = BattleState::new(Board::new(5, 5));
        let blink =
            Skill::new("blink", SkillEffect::Teleport, TargetRule::UserFits).with_range(1, 2);
        let user = placed(
            &mut state,
            Piece::new(PieceId(0), "a", 5, 3).with_skill(blink),
            BattleState::PLAYER_TEAM,
            Position::new(2, 2),
        );
        let painted = state.set_target_area(user, 0);
        assert_eq!(painted.len(), 12);
        assert_eq!(state.board.painted().count(), 12);
    }
}
