//! Status effect system for pieces.
//!
//! Status effects are temporary conditions that modify what a piece can do.
//! Durations are counted in the owner's turns: every turn end ticks each
//! entry down by one and drops the ones that reach zero.

use std::collections::BTreeMap;

/// Types of status effects.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    // ========================================================================
    // Crowd Control (restricts actions)
    // ========================================================================
    /// Cannot act at all.
    Stunned,

    /// Cannot move.
    Rooted,

    // ========================================================================
    // Buffs (positive effects)
    // ========================================================================
    /// Absorbs one point of every incoming hit.
    Shielded,

    /// Heals one point at turn start.
    Regenerating,

    /// One extra cell of movement.
    Hasted,

    // ========================================================================
    // Debuffs (negative effects)
    // ========================================================================
    /// Loses one point at turn start.
    Poisoned,
}

impl StatusKind {
    pub fn is_debuff(self) -> bool {
        matches!(
            self,
            StatusKind::Stunned | StatusKind::Rooted | StatusKind::Poisoned
        )
    }
}

/// Active status effects on a piece, keyed by kind with remaining turns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: BTreeMap<StatusKind, u32>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.contains_key(&kind)
    }

    pub fn remaining(&self, kind: StatusKind) -> Option<u32> {
        self.effects.get(&kind).copied()
    }

    /// Adds a status effect. An existing entry keeps the longer duration.
    pub fn add(&mut self, kind: StatusKind, turns: u32) {
        if turns == 0 {
            return;
        }
        let entry = self.effects.entry(kind).or_insert(0);
        *entry = (*entry).max(turns);
    }

    pub fn remove(&mut self, kind: StatusKind) -> bool {
        self.effects.remove(&kind).is_some()
    }

    /// Counts every effect down by one turn and drops expired ones.
    pub fn tick(&mut self) {
        self.effects.retain(|_, turns| {
            *turns = turns.saturating_sub(1);
            *turns > 0
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatusKind, u32)> + '_ {
        self.effects.iter().map(|(kind, turns)| (*kind, *turns))
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
