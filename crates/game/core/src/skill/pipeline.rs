//! Skill resolution pipeline.
//!
//! ```text
//! validate → face → pay cost → resolve area → start → squares → units
//!          → death check → end → refresh
//! ```
//!
//! Validation is the only stage that can fail, and it runs before anything
//! is mutated: a rejected use leaves the state untouched.

use crate::combat;
use crate::env::BattleEnv;
use crate::state::{BattleState, Direction, PieceId, Position, PresentationIntent};

use super::{EffectContext, Skill, SkillError, SkillStage};

/// What one skill use did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillOutcome {
    pub affected_cells: Vec<Position>,
    pub affected_units: Vec<PieceId>,
    pub damage_dealt: u32,
    pub healing_done: u32,
    /// Pieces removed by the death check, in order.
    pub killed: Vec<PieceId>,
}

/// Uses the skill at `index` of `user` on `target`.
///
/// # Errors
///
/// Returns a [`SkillError`] without touching the state when the user is
/// missing, cannot act, the skill is not ready, or the target is invalid.
pub fn use_skill(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    user: PieceId,
    index: usize,
    target: Position,
) -> Result<SkillOutcome, SkillError> {
    let (skill, origin) = validate(state, user, index, target)?;

    face(state, user, origin, target);
    pay_cost(state, user, index);

    let affected_cells = state.affected_cells(&skill, target);
    let affected_units = state.affected_units(&affected_cells);

    let mut ctx = EffectContext::new(user, index, origin, target, skill.power, state, env);

    stage(&mut ctx, SkillStage::Start);
    skill.effect.on_start(&mut ctx);

    stage(&mut ctx, SkillStage::Squares);
    for position in &affected_cells {
        skill.effect.on_square(&mut ctx, *position);
    }

    stage(&mut ctx, SkillStage::Units);
    for unit in &affected_units {
        skill.effect.on_unit(&mut ctx, *unit);
    }

    let mut candidates = affected_units.clone();
    candidates.push(user);
    candidates.append(&mut ctx.collateral);
    let killed = combat::resolve_deaths(ctx.state, candidates);

    stage(&mut ctx, SkillStage::End);
    skill.effect.on_end(&mut ctx);

    if ctx.state.piece(user).is_some_and(|p| p.alive) {
        ctx.state.push_intent(PresentationIntent::Refresh { piece: user });
    }

    Ok(SkillOutcome {
        affected_cells,
        affected_units,
        damage_dealt: ctx.damage_dealt,
        healing_done: ctx.healing_done,
        killed,
    })
}

fn validate(
    state: &BattleState,
    user: PieceId,
    index: usize,
    target: Position,
) -> Result<(Skill, Position), SkillError> {
    let piece = state.piece(user).ok_or(SkillError::UserNotFound(user))?;
    let skill = piece
        .skills
        .get(index)
        .ok_or(SkillError::UnknownSkill { piece: user, index })?;
    let origin = piece
        .anchor
        .filter(|_| piece.can_use(index))
        .ok_or(SkillError::NotReady { piece: user, index })?;
    if !state.in_range(user, &skill.targeting, target) {
        return Err(SkillError::OutOfRange { target });
    }
    if !state.valid_target(user, skill, target) {
        return Err(SkillError::InvalidTarget { target });
    }
    Ok((skill.clone(), origin))
}

fn face(state: &mut BattleState, user: PieceId, origin: Position, target: Position) {
    let direction = Direction::between(origin, target);
    if direction.is_none() {
        return;
    }
    if let Some(piece) = state.piece_mut(user) {
        piece.facing = direction;
    }
    state.push_intent(PresentationIntent::Face {
        piece: user,
        direction,
    });
}

fn pay_cost(state: &mut BattleState, user: PieceId, index: usize) {
    if let Some(piece) = state.piece_mut(user) {
        piece.action_used = true;
        if let Some(skill) = piece.skills.get_mut(index) {
            skill.pay_cost();
        }
    }
}

fn stage(ctx: &mut EffectContext<'_>, stage: SkillStage) {
    ctx.state.push_intent(PresentationIntent::SkillStage {
        piece: ctx.user,
        skill: ctx.skill,
        stage,
    });
}
