//! Unit-type registry: string keys resolved to template factories.
//!
//! Battle descriptors name units by key (`"testmelee"`, `"wall"`, ...). The
//! registry resolves each key once, when the battle is built; keys it does
//! not know fall back to the generic [`BASE`] unit.

use std::collections::BTreeMap;

use tactics_core::{
    Reaction, ReactionEffect, ReactionTrigger, StatusKind, UnitOracle, UnitTemplate,
};

use crate::skills;

pub const BASE: &str = "base";
pub const MELEE: &str = "testmelee";
pub const RANGED: &str = "testranged";
pub const HEALER: &str = "testhealer";
pub const BUILDER: &str = "testbuilder";
pub const SCOUT: &str = "testscout";
pub const BRUTE: &str = "testbrute";
pub const WALL: &str = "wall";

/// Builds a fresh template for one unit type.
pub type UnitFactory = fn() -> UnitTemplate;

/// Registry mapping unit keys to template factories.
#[derive(Clone, Debug)]
pub struct UnitRegistry {
    factories: BTreeMap<String, UnitFactory>,
    base: UnitFactory,
}

impl UnitRegistry {
    /// Empty registry whose only unit is the generic fallback.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
            base,
        }
    }

    /// Registry with every built-in unit type.
    pub fn standard() -> Self {
        Self::empty()
            .with(BASE, base)
            .with(MELEE, melee)
            .with(RANGED, ranged)
            .with(HEALER, healer)
            .with(BUILDER, builder)
            .with(SCOUT, scout)
            .with(BRUTE, brute)
            .with(WALL, wall)
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, factory: UnitFactory) -> Self {
        self.register(key, factory);
        self
    }

    /// Registers `factory` under `key`, replacing any previous entry.
    pub fn register(&mut self, key: impl Into<String>, factory: UnitFactory) {
        self.factories.insert(key.into(), factory);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl UnitOracle for UnitRegistry {
    fn template(&self, key: &str) -> Option<UnitTemplate> {
        self.factories.get(key).map(|factory| {
            let mut template = factory();
            template.kind = key.to_string();
            template
        })
    }

    fn base_template(&self) -> UnitTemplate {
        (self.base)()
    }
}

// ============================================================================
// Built-in unit types
// ============================================================================

fn base() -> UnitTemplate {
    UnitTemplate::new(BASE, 5, 3)
        .with_name("Recruit")
        .with_skill(skills::slash())
}

fn melee() -> UnitTemplate {
    UnitTemplate::new(MELEE, 7, 3)
        .with_name("Knight")
        .with_skill(skills::strike())
        .with_reaction(Reaction::new(
            ReactionTrigger::OnHit,
            ReactionEffect::Retaliate { power: 1 },
        ))
}

fn ranged() -> UnitTemplate {
    UnitTemplate::new(RANGED, 5, 3)
        .with_name("Archer")
        .with_skill(skills::arrow())
        .with_skill(skills::slash())
}

fn healer() -> UnitTemplate {
    UnitTemplate::new(HEALER, 4, 3)
        .with_name("Cleric")
        .with_skill(skills::mend())
        .with_skill(skills::rally())
        .with_reaction(Reaction::new(
            ReactionTrigger::OnTurnStart,
            ReactionEffect::Heal { amount: 1 },
        ))
}

fn builder() -> UnitTemplate {
    UnitTemplate::new(BUILDER, 5, 3)
        .with_name("Engineer")
        .with_skill(skills::build_wall())
        .with_skill(skills::slash())
}

fn scout() -> UnitTemplate {
    UnitTemplate::new(SCOUT, 4, 5)
        .with_name("Scout")
        .with_skill(skills::blink())
        .with_skill(skills::switch())
        .with_skill(skills::hook())
}

/// Two-by-two bruiser that bursts when it falls.
fn brute() -> UnitTemplate {
    UnitTemplate::new(BRUTE, 12, 2)
        .with_name("Ogre")
        .with_footprint(2)
        .with_skill(skills::strike())
        .with_skill(skills::fireball())
        .with_reaction(Reaction::new(
            ReactionTrigger::OnDeath,
            ReactionEffect::Burst { power: 2 },
        ))
        .with_reaction(Reaction::new(
            ReactionTrigger::OnHit,
            ReactionEffect::Status {
                kind: StatusKind::Shielded,
                turns: 1,
            },
        ))
}

fn wall() -> UnitTemplate {
    UnitTemplate::new(WALL, 4, 0).with_name("Wall").as_extra()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_resolves_every_key() {
        let registry = UnitRegistry::standard();
        for key in [BASE, MELEE, RANGED, HEALER, BUILDER, SCOUT, BRUTE, WALL] {
            let template = registry.template(key);
            assert_eq!(template.map(|t| t.kind), Some(key.to_string()));
        }
    }

    #[test]
    fn unknown_key_falls_back_to_base() {
        let registry = UnitRegistry::standard();
        assert_eq!(registry.template("dragon"), None);
        assert_eq!(registry.template_or_base("dragon").kind, BASE);
    }

    #[test]
    fn registered_key_overrides_template_kind() {
        let registry = UnitRegistry::empty().with("militia", base);
        let template = registry.template("militia");
        assert_eq!(template.as_ref().map(|t| t.kind.as_str()), Some("militia"));
        assert_eq!(template.map(|t| t.max_hp), Some(5));
    }

    #[test]
    fn wall_is_an_immobile_extra() {
        let piece = UnitRegistry::standard().template_or_base(WALL).instantiate();
        assert!(piece.extra);
        assert!(piece.targetable);
        assert_eq!(piece.move_range, 0);
        assert!(piece.skills.is_empty());
    }

    #[test]
    fn melee_unit_pushes_one_cell() {
        let template = UnitRegistry::standard().template_or_base(MELEE);
        assert_eq!(template.skills.len(), 1);
        assert_eq!(template.skills[0].power, 2);
        assert_eq!(
            template.skills[0].effect,
            tactics_core::SkillEffect::Damage { push: 1 }
        );
    }
}
