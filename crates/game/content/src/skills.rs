//! Skill presets shared by the built-in unit templates.

use tactics_core::{Shape, SightRule, Skill, SkillEffect, StatusKind, TargetRule};

/// Adjacent hit that knocks the target one cell back.
pub fn strike() -> Skill {
    Skill::new("Strike", SkillEffect::Damage { push: 1 }, TargetRule::Enemy).with_power(2)
}

/// Adjacent hit without displacement.
pub fn slash() -> Skill {
    Skill::new("Slash", SkillEffect::Damage { push: 0 }, TargetRule::Enemy).with_power(1)
}

/// Ranged shot that needs a clear line of sight.
pub fn arrow() -> Skill {
    Skill::new("Arrow", SkillEffect::Damage { push: 0 }, TargetRule::Enemy)
        .with_range(2, 4)
        .with_sight(SightRule::Clear)
        .with_power(2)
}

/// Lobbed blast hitting a 3x3 window; friendly fire included.
pub fn fireball() -> Skill {
    Skill::new("Fireball", SkillEffect::Damage { push: 0 }, TargetRule::AnyCell)
        .with_range(2, 4)
        .with_area(3, Shape::Square)
        .with_power(1)
        .with_cooldown(2)
}

/// Pulls an enemy two cells toward the user.
pub fn hook() -> Skill {
    Skill::new("Hook", SkillEffect::Damage { push: -2 }, TargetRule::Enemy)
        .with_range(2, 3)
        .with_shape(Shape::Line)
        .with_sight(SightRule::Walkable)
        .with_power(1)
        .with_cooldown(1)
}

pub fn mend() -> Skill {
    Skill::new("Mend", SkillEffect::Heal, TargetRule::Ally)
        .with_range(0, 2)
        .with_power(3)
}

/// Hastes every ally around the target.
pub fn rally() -> Skill {
    Skill::new(
        "Rally",
        SkillEffect::Buff {
            status: StatusKind::Hasted,
            turns: 2,
        },
        TargetRule::Ally,
    )
    .with_range(0, 1)
    .with_area(3, Shape::Star)
    .with_cooldown(3)
}

/// Raises a wall on an empty cell next to the user.
pub fn build_wall() -> Skill {
    Skill::new(
        "Build Wall",
        SkillEffect::Build {
            template: crate::units::WALL.to_string(),
        },
        TargetRule::EmptyCell,
    )
    .with_cooldown(2)
}

pub fn blink() -> Skill {
    Skill::new("Blink", SkillEffect::Teleport, TargetRule::UserFits)
        .with_range(2, 4)
        .with_cooldown(2)
}

/// Trades places with any unit in range.
pub fn switch() -> Skill {
    Skill::new("Switch", SkillEffect::Swap, TargetRule::Unit).with_range(1, 3)
}

pub fn stun_bolt() -> Skill {
    Skill::new(
        "Stun Bolt",
        SkillEffect::Buff {
            status: StatusKind::Stunned,
            turns: 1,
        },
        TargetRule::Enemy,
    )
    .with_range(1, 3)
    .with_sight(SightRule::Clear)
    .with_uses(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_start_ready() {
        for skill in [
            strike(),
            arrow(),
            fireball(),
            hook(),
            mend(),
            rally(),
            blink(),
            stun_bolt(),
        ] {
            assert!(skill.is_ready(), "{} should start ready", skill.name);
        }
    }

    #[test]
    fn beneficial_presets() {
        assert!(mend().is_beneficial());
        assert!(rally().is_beneficial());
        assert!(!stun_bolt().is_beneficial());
        assert!(!strike().is_beneficial());
    }
}
