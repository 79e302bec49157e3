//! Reactions: skill-like effects fired by game events instead of orders.

use crate::combat;
use crate::state::{BattleState, PieceId, StatusKind};

/// Event that fires a reaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReactionTrigger {
    /// The owner took damage from a skill.
    OnHit,
    OnTurnStart,
    OnTurnEnd,
    /// The owner is about to be removed as dead.
    OnDeath,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReactionEffect {
    /// Damage the source of the trigger when it stands next to the owner.
    Retaliate { power: u32 },
    /// Heal the owner.
    Heal { amount: u32 },
    /// Damage every piece adjacent to the owner's footprint.
    Burst { power: u32 },
    /// Apply a status to the owner.
    Status { kind: StatusKind, turns: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reaction {
    pub trigger: ReactionTrigger,
    pub effect: ReactionEffect,
}

impl Reaction {
    pub const fn new(trigger: ReactionTrigger, effect: ReactionEffect) -> Self {
        Self { trigger, effect }
    }
}

/// Runs every reaction of `owner` for `trigger`, in list order.
///
/// Damage dealt here never fires further reactions. Returns the pieces that
/// took damage so the caller can include them in its death check.
pub(crate) fn fire(
    state: &mut BattleState,
    owner: PieceId,
    trigger: ReactionTrigger,
    source: Option<PieceId>,
) -> Vec<PieceId> {
    let effects: Vec<ReactionEffect> = state
        .piece(owner)
        .map(|piece| piece.reactions_for(trigger).map(|r| r.effect).collect())
        .unwrap_or_default();

    let mut hurt = Vec::new();
    for effect in effects {
        match effect {
            ReactionEffect::Retaliate { power } => {
                if let Some(source) = source
                    && source != owner
                    && combat::neighbours(state, owner).contains(&source)
                {
                    combat::strike(state, source, power);
                    hurt.push(source);
                }
            }
            ReactionEffect::Heal { amount } => {
                combat::restore(state, owner, amount);
            }
            ReactionEffect::Burst { power } => {
                for victim in combat::neighbours(state, owner) {
                    combat::strike(state, victim, power);
                    hurt.push(victim);
                }
            }
            ReactionEffect::Status { kind, turns } => {
                combat::apply_status(state, owner, kind, turns);
            }
        }
    }
    hurt
}
