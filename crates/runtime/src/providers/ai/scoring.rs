//! Utility scoring functions for AI decision-making.
//!
//! Two questions are scored:
//!
//! 1. **Where to stand** ([`position_score`]): cells closer to the nearest
//!    opposing piece score higher.
//! 2. **Where to aim** ([`target_score`]): pieces the skill helps minus
//!    pieces it harms, with a bonus for area skills that catch several.
//!
//! Extra pieces (walls and other non-counting objects) are invisible to both.

use tactics_core::{BattleState, PieceId, Position, Side, Skill, SkillEffect};

/// Points granted for each piece a skill affects the intended way.
pub const HIT: i32 = 100;

/// Structured target score, kept whole for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TargetScore {
    /// Pieces the skill affects the intended way.
    pub wanted: u32,
    /// Pieces the skill affects the wrong way (friendly fire, healing foes).
    pub unwanted: u32,
    /// Bonus from the area bias.
    pub bonus: i32,
}

impl TargetScore {
    pub const fn value(&self) -> i32 {
        (self.wanted as i32 - self.unwanted as i32) * HIT + self.bonus
    }

    /// Only targets that do more good than harm are worth a turn.
    pub const fn is_worthwhile(&self) -> bool {
        self.value() > 0
    }
}

/// Living, counting, on-board pieces fighting for `side`.
fn combatants(state: &BattleState, side: Side) -> impl Iterator<Item = (PieceId, Position)> + '_ {
    state
        .pieces()
        .filter(|piece| piece.alive && !piece.extra)
        .filter(move |piece| state.side_of(piece.id) == Some(side))
        .filter_map(|piece| piece.anchor.filter(|_| piece.is_on_board()).map(|at| (piece.id, at)))
}

/// Distance from `cell` to the nearest piece opposing `side`.
pub fn nearest_enemy_distance(state: &BattleState, side: Side, cell: Position) -> Option<u32> {
    combatants(state, side.opposing())
        .map(|(_, at)| at.distance(cell))
        .min()
}

/// `max_distance - nearest_enemy_distance`; zero when no enemy is left.
pub fn position_score(state: &BattleState, side: Side, cell: Position) -> u32 {
    nearest_enemy_distance(state, side, cell)
        .map_or(0, |nearest| state.board.max_distance().saturating_sub(nearest))
}

/// Scores `skill` used by `user` on `target`.
///
/// Harmful skills want opposing pieces in their area and avoid friendly
/// ones; beneficial skills the reverse, and healing only counts wounded
/// pieces. Teleports score the position gained. `area_bias` is the percent
/// of [`HIT`] added for each wanted piece beyond the first when the skill
/// covers more than one cell.
pub fn target_score(
    state: &BattleState,
    user: PieceId,
    skill: &Skill,
    target: Position,
    area_bias: u32,
) -> TargetScore {
    let Some((side, origin)) = state
        .side_of(user)
        .zip(state.piece(user).and_then(|piece| piece.anchor))
    else {
        return TargetScore::default();
    };

    if let SkillEffect::Teleport = skill.effect {
        let gain = position_score(state, side, target) as i32
            - position_score(state, side, origin) as i32;
        return TargetScore {
            bonus: gain * HIT / 10,
            ..TargetScore::default()
        };
    }

    let cells = state.affected_cells(skill, target);
    let mut score = TargetScore::default();
    for id in state.affected_units(&cells) {
        let Some(piece) = state.piece(id).filter(|piece| !piece.extra) else {
            continue;
        };
        let friendly = state.are_allies(user, id);
        let (wanted, unwanted) = match &skill.effect {
            SkillEffect::Heal => (friendly && piece.hp < piece.max_hp, !friendly),
            SkillEffect::Buff { status, .. } => {
                let fresh = !piece.status.has(*status);
                if status.is_debuff() {
                    (!friendly && fresh, friendly)
                } else {
                    (friendly && fresh, !friendly)
                }
            }
            SkillEffect::Swap => (!friendly, false),
            _ => (!friendly, friendly),
        };
        score.wanted += u32::from(wanted);
        score.unwanted += u32::from(unwanted);
    }

    if skill.area > 1 && score.wanted > 1 {
        score.bonus = (score.wanted - 1) as i32 * HIT * area_bias as i32 / 100;
    }
    score
}
