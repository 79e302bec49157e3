//! Effect kinds and their stage callbacks.
//!
//! Every kind implements the same four callbacks; most only use one. The
//! pipeline calls them in a fixed order and each call finishes its logical
//! work before returning.

use crate::combat;
use crate::state::{PieceId, Position, PresentationIntent, StatusKind};

use super::EffectContext;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEffect {
    /// Damage by the skill's power, then slide survivors `push` cells away
    /// from the user (`push < 0` pulls).
    Damage { push: i32 },

    /// Heal by the skill's power.
    Heal,

    /// Slide without damage.
    Push { distance: i32 },

    /// Place a new piece from `template` on every empty affected cell.
    Build { template: String },

    /// Move the user to the target cell.
    Teleport,

    /// Exchange places with the affected unit.
    Swap,

    /// Apply a status to every affected unit.
    Buff { status: StatusKind, turns: u32 },
}

impl SkillEffect {
    pub fn is_beneficial(&self) -> bool {
        match self {
            Self::Heal => true,
            Self::Buff { status, .. } => !status.is_debuff(),
            _ => false,
        }
    }

    pub(crate) fn on_start(&self, ctx: &mut EffectContext<'_>) {
        if let Self::Teleport = self {
            let from = ctx.origin;
            if ctx.state.move_piece(ctx.user, ctx.target).is_ok() {
                ctx.state.push_intent(PresentationIntent::Move {
                    piece: ctx.user,
                    path: vec![from, ctx.target],
                });
            }
        }
    }

    pub(crate) fn on_square(&self, ctx: &mut EffectContext<'_>, position: Position) {
        let Self::Build { template } = self else {
            return;
        };
        if !ctx
            .state
            .board
            .at(position)
            .is_some_and(|cell| cell.is_empty() && !cell.blocks_move())
        {
            return;
        }
        let team = ctx.state.piece(ctx.user).and_then(|user| user.team);
        let piece = ctx.env.units().template_or_base(template).instantiate();
        let built = ctx.state.add_piece(piece, team);
        if ctx.state.move_piece(built, position).is_ok() {
            ctx.state.push_intent(PresentationIntent::Spawn {
                piece: built,
                at: position,
            });
        }
    }

    pub(crate) fn on_unit(&self, ctx: &mut EffectContext<'_>, unit: PieceId) {
        match self {
            Self::Damage { push } => {
                let (lost, hurt) = combat::hit(ctx.state, unit, ctx.power, ctx.user);
                ctx.damage_dealt += lost;
                ctx.collateral.extend(hurt);
                let survived = ctx.state.piece(unit).is_some_and(|p| !p.is_dead());
                if *push != 0 && survived {
                    slide(ctx, unit, *push);
                }
            }
            Self::Heal => {
                ctx.healing_done += combat::restore(ctx.state, unit, ctx.power);
            }
            Self::Push { distance } => slide(ctx, unit, *distance),
            Self::Swap => {
                if unit == ctx.user {
                    return;
                }
                let (Some(from), Some(to)) = (anchor(ctx, ctx.user), anchor(ctx, unit)) else {
                    return;
                };
                if ctx.state.swap_pieces(ctx.user, unit).is_ok() {
                    ctx.state.push_intent(PresentationIntent::Move {
                        piece: ctx.user,
                        path: vec![from, to],
                    });
                    ctx.state.push_intent(PresentationIntent::Move {
                        piece: unit,
                        path: vec![to, from],
                    });
                }
            }
            Self::Buff { status, turns } => {
                combat::apply_status(ctx.state, unit, *status, *turns);
            }
            Self::Build { .. } | Self::Teleport => {}
        }
    }

    pub(crate) fn on_end(&self, _ctx: &mut EffectContext<'_>) {}
}

fn anchor(ctx: &EffectContext<'_>, piece: PieceId) -> Option<Position> {
    ctx.state.piece(piece).and_then(|p| p.anchor)
}

fn slide(ctx: &mut EffectContext<'_>, unit: PieceId, distance: i32) {
    let Some(from) = anchor(ctx, unit) else {
        return;
    };
    if ctx.state.slide_piece(unit, ctx.origin, distance) > 0
        && let Some(to) = anchor(ctx, unit)
    {
        ctx.state.push_intent(PresentationIntent::Move {
            piece: unit,
            path: vec![from, to],
        });
    }
}
