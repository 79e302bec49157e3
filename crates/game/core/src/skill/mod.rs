//! Skills: value objects describing what a unit can do on its action.
//!
//! A skill bundles its targeting rules, area, cost bookkeeping and an
//! [`SkillEffect`] variant. Resolution happens in [`use_skill`], which runs
//! the fixed stage sequence and applies effects through enum dispatch.

mod context;
mod effect;
mod error;
mod pipeline;
mod reaction;

pub use context::EffectContext;
pub use effect::SkillEffect;
pub use error::SkillError;
pub use pipeline::{SkillOutcome, use_skill};
pub use reaction::{Reaction, ReactionEffect, ReactionTrigger};

pub(crate) use reaction::fire as fire_reactions;

use crate::board::Shape;
use crate::targeting::{SightRule, Targeting};

/// Which cells a skill may be aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetRule {
    /// Occupied by a living, targetable piece.
    #[default]
    Unit,
    /// Like `Unit`, on the opposing side.
    Enemy,
    /// Like `Unit`, on the user's side (the user included).
    Ally,
    /// Standable and unoccupied.
    EmptyCell,
    /// The user's own footprint fits there.
    UserFits,
    /// Any on-board cell.
    AnyCell,
}

/// Stage markers emitted while a skill resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillStage {
    Start,
    Squares,
    Units,
    End,
}

/// Limited charges for a skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uses {
    pub remaining: u32,
    pub max: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub name: String,
    pub targeting: Targeting,
    /// Side length of the affected window around the target (`<= 1` is
    /// the target cell alone).
    pub area: u32,
    pub area_shape: Shape,
    pub target_rule: TargetRule,
    pub effect: SkillEffect,
    pub power: u32,
    /// Turns until the skill can be used again.
    pub cooldown: u32,
    /// Value `cooldown` is reset to when the skill is used.
    pub cooldown_cost: u32,
    pub uses: Option<Uses>,
}

impl Skill {
    pub fn new(name: impl Into<String>, effect: SkillEffect, target_rule: TargetRule) -> Self {
        Self {
            name: name.into(),
            targeting: Targeting::MELEE,
            area: 1,
            area_shape: Shape::Square,
            target_rule,
            effect,
            power: 0,
            cooldown: 0,
            cooldown_cost: 0,
            uses: None,
        }
    }

    #[must_use]
    pub fn with_range(mut self, min_range: u32, range: u32) -> Self {
        self.targeting.min_range = min_range;
        self.targeting.range = range;
        self
    }

    #[must_use]
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.targeting.shape = shape;
        self
    }

    #[must_use]
    pub fn with_sight(mut self, sight: SightRule) -> Self {
        self.targeting.sight = sight;
        self
    }

    #[must_use]
    pub fn with_area(mut self, area: u32, shape: Shape) -> Self {
        self.area = area;
        self.area_shape = shape;
        self
    }

    #[must_use]
    pub fn with_power(mut self, power: u32) -> Self {
        self.power = power;
        self
    }

    #[must_use]
    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.cooldown_cost = turns;
        self
    }

    #[must_use]
    pub fn with_uses(mut self, max: u32) -> Self {
        self.uses = Some(Uses {
            remaining: max,
            max,
        });
        self
    }

    /// Off cooldown and not out of charges.
    pub fn is_ready(&self) -> bool {
        self.cooldown == 0 && self.uses.is_none_or(|uses| uses.remaining > 0)
    }

    /// Resets the cooldown and spends one charge.
    pub fn pay_cost(&mut self) {
        self.cooldown = self.cooldown_cost;
        if let Some(uses) = &mut self.uses {
            uses.remaining = uses.remaining.saturating_sub(1);
        }
    }

    pub fn end_turn(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    /// Whether the skill helps the pieces it affects.
    pub fn is_beneficial(&self) -> bool {
        self.effect.is_beneficial()
    }
}
