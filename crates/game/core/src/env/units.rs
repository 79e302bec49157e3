//! Unit templates and the oracle that resolves them by key.
//!
//! Templates are plain data: stats, a footprint, an ordered skill list and
//! reactions. Battles instantiate fresh pieces from them whenever a unit is
//! spawned, deployed or built.

use std::collections::BTreeMap;

use crate::config::GameConfig;
use crate::skill::{Reaction, Skill};
use crate::state::{Piece, PieceId};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    /// Registry key, copied onto every instantiated piece.
    pub kind: String,
    pub name: String,
    pub max_hp: u32,
    pub move_range: u32,
    pub footprint: u32,
    pub skills: Vec<Skill>,
    pub reactions: Vec<Reaction>,
    pub targetable: bool,
    /// Instances do not count toward team size.
    pub extra: bool,
}

impl UnitTemplate {
    pub fn new(kind: impl Into<String>, max_hp: u32, move_range: u32) -> Self {
        let kind = kind.into();
        Self {
            name: kind.clone(),
            kind,
            max_hp,
            move_range,
            footprint: 1,
            skills: Vec::new(),
            reactions: Vec::new(),
            targetable: true,
            extra: false,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_footprint(mut self, footprint: u32) -> Self {
        self.footprint = footprint;
        self
    }

    #[must_use]
    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    #[must_use]
    pub fn with_reaction(mut self, reaction: Reaction) -> Self {
        self.reactions.push(reaction);
        self
    }

    /// Marks instances as non-counting board objects.
    #[must_use]
    pub fn as_extra(mut self) -> Self {
        self.extra = true;
        self
    }

    #[must_use]
    pub fn untargetable(mut self) -> Self {
        self.targetable = false;
        self
    }

    /// Creates a detached piece; the battle assigns its id on insertion.
    ///
    /// Reactions beyond [`GameConfig::MAX_REACTIONS`] are dropped.
    pub fn instantiate(&self) -> Piece {
        let mut piece = Piece::new(PieceId(0), self.kind.clone(), self.max_hp, self.move_range)
            .with_footprint(self.footprint);
        piece.name = self.name.clone();
        piece.skills = self.skills.clone();
        piece.reactions = self
            .reactions
            .iter()
            .copied()
            .take(GameConfig::MAX_REACTIONS)
            .collect();
        piece.targetable = self.targetable;
        piece.extra = self.extra;
        piece
    }
}

/// Oracle providing unit templates by key.
///
/// Content crates implement this to expose their unit registry. Unknown keys
/// never fail a battle: callers fall back to [`UnitOracle::base_template`].
pub trait UnitOracle: Send + Sync {
    /// Returns the template registered under `key`, if any.
    fn template(&self, key: &str) -> Option<UnitTemplate>;

    /// Generic unit used for unrecognized keys.
    fn base_template(&self) -> UnitTemplate;

    fn template_or_base(&self, key: &str) -> UnitTemplate {
        self.template(key).unwrap_or_else(|| self.base_template())
    }
}

/// Snapshot-backed oracle holding templates in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTable {
    base: UnitTemplate,
    templates: BTreeMap<String, UnitTemplate>,
}

impl UnitTable {
    pub fn new(base: UnitTemplate) -> Self {
        Self {
            base,
            templates: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, template: UnitTemplate) -> Self {
        self.insert(template);
        self
    }

    pub fn insert(&mut self, template: UnitTemplate) {
        self.templates.insert(template.kind.clone(), template);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

impl UnitOracle for UnitTable {
    fn template(&self, key: &str) -> Option<UnitTemplate> {
        self.templates.get(key).cloned()
    }

    fn base_template(&self) -> UnitTemplate {
        self.base.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_fall_back_to_base() {
        let table = UnitTable::new(UnitTemplate::new("base", 3, 3))
            .with(UnitTemplate::new("knight", 8, 4));
        assert_eq!(table.template_or_base("knight").max_hp, 8);
        assert_eq!(table.template_or_base("dragon").kind, "base");
    }

    #[test]
    fn instantiate_copies_flags() {
        let piece = UnitTemplate::new("wall", 4, 0).as_extra().instantiate();
        assert!(piece.extra);
        assert_eq!(piece.hp, 4);
        assert_eq!(piece.move_range, 0);
    }
}
