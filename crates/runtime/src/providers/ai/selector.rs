//! Turn selection for auto-controlled teams.
//!
//! Each step picks one unit and plays its whole turn:
//!
//! 1. **Unit**: the controllable unit with the best [`position_score`],
//!    ties broken by the seeded RNG.
//! 2. **Move**: the reachable cell with the best position score, if it beats
//!    staying put.
//! 3. **Skill**: the first usable skill, in list order, that has a
//!    worthwhile target; aimed at its best-scoring valid target.
//! 4. **Pass**: a unit that could not act ends its turn.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use tactics_core::{BattleEngine, BattleState, PieceId, Position, TeamId};

use super::scoring::{TargetScore, position_score, target_score};

/// What the selector did with one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnReport {
    pub unit: Option<PieceId>,
    pub moved_to: Option<Position>,
    /// Skill index, target cell and score of the action taken.
    pub skill: Option<(usize, Position, i32)>,
    pub passed: bool,
}

/// Seeded AI selector driving auto-controlled teams.
pub struct AiSelector {
    rng: StdRng,
}

impl AiSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Highest-scoring controllable unit of `team`.
    pub fn next_unit(&mut self, state: &BattleState, team: TeamId) -> Option<PieceId> {
        let side = state.team(team)?.side;
        let mut units: Vec<(PieceId, u32)> = state
            .controllable(team)
            .into_iter()
            .filter_map(|id| {
                let anchor = state.piece(id)?.anchor?;
                Some((id, position_score(state, side, anchor)))
            })
            .collect();
        units.shuffle(&mut self.rng);
        units.sort_by(|a, b| b.1.cmp(&a.1));
        units.first().map(|(id, _)| *id)
    }

    /// Reachable cell closest to the enemy, or `None` to stay.
    pub fn best_destination(&self, state: &BattleState, unit: PieceId) -> Option<Position> {
        let piece = state.piece(unit).filter(|piece| piece.can_move())?;
        let anchor = piece.anchor?;
        let side = state.side_of(unit)?;

        let mut scratch = state.clone();
        scratch.set_move_area(unit);
        let stay = position_score(state, side, anchor);
        scratch
            .move_destinations()
            .into_iter()
            .map(|cell| (position_score(state, side, cell), cell))
            .filter(|(score, _)| *score > stay)
            .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
            .map(|(_, cell)| cell)
    }

    /// Best target for the skill at `index`, if any is worthwhile.
    pub fn best_target(
        &self,
        state: &BattleState,
        unit: PieceId,
        index: usize,
        area_bias: u32,
    ) -> Option<(Position, TargetScore)> {
        let skill = state.piece(unit)?.skills.get(index)?;
        state
            .valid_targets(unit, index)
            .into_iter()
            .map(|cell| (cell, target_score(state, unit, skill, cell, area_bias)))
            .filter(|(_, score)| score.is_worthwhile())
            .max_by(|a, b| a.1.value().cmp(&b.1.value()).then(b.0.cmp(&a.0)))
    }

    /// First usable skill with a worthwhile target.
    ///
    /// A usable skill with nothing worth hitting is skipped in favour of
    /// the next one.
    pub fn choose_skill(
        &self,
        state: &BattleState,
        unit: PieceId,
        area_bias: u32,
    ) -> Option<(usize, Position, TargetScore)> {
        let piece = state.piece(unit)?;
        (0..piece.skills.len())
            .filter(|index| piece.can_use(*index))
            .find_map(|index| {
                self.best_target(state, unit, index, area_bias)
                    .map(|(cell, score)| (index, cell, score))
            })
    }

    /// Plays the whole turn of `unit` through `engine`.
    pub fn take_turn(&mut self, engine: &mut BattleEngine<'_>, unit: PieceId) -> TurnReport {
        let mut report = TurnReport {
            unit: Some(unit),
            ..TurnReport::default()
        };

        if let Some(destination) = self.best_destination(engine.state(), unit)
            && engine.submit_move(unit, destination)
        {
            debug!(%unit, %destination, "ai moved");
            report.moved_to = Some(destination);
        }

        let area_bias = engine.env().config().ai_area_bias;
        if let Some((index, target, score)) = self.choose_skill(engine.state(), unit, area_bias) {
            match engine.try_skill_use(unit, index, target) {
                Ok(outcome) => {
                    debug!(
                        %unit,
                        skill = index,
                        %target,
                        score = score.value(),
                        wanted = score.wanted,
                        unwanted = score.unwanted,
                        damage = outcome.damage_dealt,
                        healing = outcome.healing_done,
                        "ai used skill"
                    );
                    report.skill = Some((index, target, score.value()));
                }
                Err(error) => debug!(%unit, %target, %error, "ai skill rejected"),
            }
        }

        let still_ready = engine
            .state()
            .piece(unit)
            .is_some_and(|piece| piece.can_act());
        if still_ready && engine.pass(unit) {
            debug!(%unit, "ai passed");
            report.passed = true;
        }
        report
    }
}
