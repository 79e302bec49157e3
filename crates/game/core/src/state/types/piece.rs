//! Pieces: units and objects that occupy the board.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::skill::{Reaction, ReactionTrigger, Skill};

use super::{Direction, PieceId, Position, StatusEffects, StatusKind, TeamId};

/// Which collection currently owns a piece.
///
/// A piece is owned by exactly one container at a time; moving it onto the
/// board detaches it from the roster first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Container {
    #[default]
    Detached,
    Board,
    Roster,
}

pub type Reactions = ArrayVec<Reaction, { GameConfig::MAX_REACTIONS }>;

/// A unit or object on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    pub id: PieceId,
    /// Unit-type key the piece was built from.
    pub kind: String,
    pub name: String,
    /// Side length of the square footprint centered on the anchor cell.
    pub footprint: u32,
    pub team: Option<TeamId>,
    pub hp: u32,
    pub max_hp: u32,
    pub move_range: u32,
    pub skills: Vec<Skill>,
    pub reactions: Reactions,
    pub status: StatusEffects,
    pub alive: bool,
    /// Center cell of the footprint while on the board.
    pub anchor: Option<Position>,
    /// Cell the piece started its turn on, used to undo a move.
    pub home: Option<Position>,
    pub container: Container,
    pub action_used: bool,
    pub moved: bool,
    pub facing: Direction,
    /// Whether skills may pick this piece as an affected unit.
    pub targetable: bool,
    /// Board occupant that does not count toward team size.
    pub extra: bool,
    /// Present on the map but not yet under turn control.
    pub guest: bool,
}

impl Piece {
    pub fn new(id: PieceId, kind: impl Into<String>, max_hp: u32, move_range: u32) -> Self {
        let kind = kind.into();
        Self {
            id,
            name: kind.clone(),
            kind,
            footprint: 1,
            team: None,
            hp: max_hp,
            max_hp,
            move_range,
            skills: Vec::new(),
            reactions: Reactions::new(),
            status: StatusEffects::empty(),
            alive: true,
            anchor: None,
            home: None,
            container: Container::Detached,
            action_used: false,
            moved: false,
            facing: Direction::DOWN,
            targetable: true,
            extra: false,
            guest: false,
        }
    }

    #[must_use]
    pub fn with_footprint(mut self, footprint: u32) -> Self {
        self.footprint = footprint.clamp(1, GameConfig::MAX_FOOTPRINT);
        self
    }

    #[must_use]
    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Reactions beyond [`GameConfig::MAX_REACTIONS`] are dropped.
    #[must_use]
    pub fn with_reaction(mut self, reaction: Reaction) -> Self {
        let _ = self.reactions.try_push(reaction);
        self
    }

    pub fn is_on_board(&self) -> bool {
        self.container == Container::Board && self.anchor.is_some()
    }

    /// True while the piece may still take an action this turn.
    pub fn can_act(&self) -> bool {
        self.alive
            && self.is_on_board()
            && !self.guest
            && !self.action_used
            && !self.status.has(StatusKind::Stunned)
    }

    pub fn can_move(&self) -> bool {
        self.can_act() && !self.moved && !self.status.has(StatusKind::Rooted)
    }

    pub fn effective_move_range(&self) -> u32 {
        if self.status.has(StatusKind::Hasted) {
            self.move_range + 1
        } else {
            self.move_range
        }
    }

    /// Whether the skill at `index` is usable right now.
    pub fn can_use(&self, index: usize) -> bool {
        self.can_act() && self.skills.get(index).is_some_and(Skill::is_ready)
    }

    /// Index of the first skill whose `can_use` holds.
    pub fn first_usable_skill(&self) -> Option<usize> {
        (0..self.skills.len()).find(|index| self.can_use(*index))
    }

    /// Applies damage and returns the amount actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let amount = if self.status.has(StatusKind::Shielded) {
            amount.saturating_sub(1)
        } else {
            amount
        };
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Restores hit points up to the maximum and returns the amount gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_hp - self.hp.min(self.max_hp));
        self.hp += gained;
        gained
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    pub fn reactions_for(&self, trigger: ReactionTrigger) -> impl Iterator<Item = &Reaction> + '_ {
        self.reactions
            .iter()
            .filter(move |reaction| reaction.trigger == trigger)
    }

    /// Resets per-turn bookkeeping when the owning team becomes active.
    pub fn start_turn(&mut self) {
        self.action_used = false;
        self.moved = false;
        self.home = self.anchor;
    }

    /// Ticks cooldowns and status durations when the owning team stands down.
    pub fn end_turn(&mut self) {
        for skill in &mut self.skills {
            skill.end_turn();
        }
        self.status.tick();
        self.home = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::ReactionEffect;

    #[test]
    fn shield_absorbs_one_point() {
        let mut piece = Piece::new(PieceId(1), "test", 5, 3);
        piece.status.add(StatusKind::Shielded, 2);
        assert_eq!(piece.take_damage(3), 2);
        assert_eq!(piece.hp, 3);
    }

    #[test]
    fn heal_caps_at_max() {
        let mut piece = Piece::new(PieceId(1), "test", 5, 3);
        piece.hp = 4;
        assert_eq!(piece.heal(3), 1);
        assert_eq!(piece.hp, 5);
    }

    #[test]
    fn detached_piece_cannot_act() {
        let piece = Piece::new(PieceId(1), "test", 5, 3);
        assert!(!piece.can_act());
    }

    #[test]
    fn footprint_is_clamped() {
        let piece = Piece::new(PieceId(1), "test", 5, 3).with_footprint(40);
        assert_eq!(piece.footprint, GameConfig::MAX_FOOTPRINT);
    }

    #[test]
    fn reactions_are_capped() {
        let thorns = Reaction::new(ReactionTrigger::OnHit, ReactionEffect::Retaliate { power: 1 });
        let piece = (0..GameConfig::MAX_REACTIONS + 2).fold(
            Piece::new(PieceId(1), "test", 5, 3),
            |piece, _| piece.with_reaction(thorns),
        );
        assert_eq!(piece.reactions.len(), GameConfig::MAX_REACTIONS);
    }
}
