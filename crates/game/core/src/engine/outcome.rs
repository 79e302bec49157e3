//! Victory and defeat evaluation.

use crate::state::{BattleState, Outcome, TurnLimits};

/// Decides whether the battle is over.
///
/// Pure function of the team sizes, the turn counter and the limits:
/// - no player units left: defeat
/// - no enemy units left and `turn >= min_turns`: victory
/// - `max_turns` exceeded: the default outcome
pub fn evaluate_outcome(
    player_size: usize,
    enemy_size: usize,
    turn: u32,
    limits: &TurnLimits,
) -> Option<Outcome> {
    if player_size == 0 {
        return Some(Outcome::Defeat);
    }
    if enemy_size == 0 && turn >= limits.min_turns {
        return Some(Outcome::Victory);
    }
    match limits.max_turns {
        Some(max) if turn > max => Some(if limits.default_victory {
            Outcome::Victory
        } else {
            Outcome::Defeat
        }),
        _ => None,
    }
}

impl BattleState {
    /// [`evaluate_outcome`] applied to the current team sizes.
    pub fn evaluate_outcome(&self) -> Option<Outcome> {
        evaluate_outcome(
            self.team_size(self.player_team()),
            self.team_size(self.enemy_team()),
            self.turn,
            &self.limits,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(min_turns: u32, max_turns: Option<u32>, default_victory: bool) -> TurnLimits {
        TurnLimits {
            min_turns,
            max_turns,
            default_victory,
        }
    }

    #[test]
    fn wiped_player_loses_regardless() {
        assert_eq!(
            evaluate_outcome(0, 0, 10, &limits(0, Some(3), true)),
            Some(Outcome::Defeat)
        );
    }

    #[test]
    fn enemy_wipe_respects_min_turns() {
        let limits = limits(3, None, false);
        assert_eq!(evaluate_outcome(2, 0, 3, &limits), Some(Outcome::Victory));
        assert_eq!(evaluate_outcome(2, 0, 2, &limits), None);
    }

    #[test]
    fn running_out_of_turns_uses_default() {
        assert_eq!(evaluate_outcome(1, 1, 5, &limits(0, Some(5), true)), None);
        assert_eq!(
            evaluate_outcome(1, 1, 6, &limits(0, Some(5), true)),
            Some(Outcome::Victory)
        );
        assert_eq!(
            evaluate_outcome(1, 1, 6, &limits(0, Some(5), false)),
            Some(Outcome::Defeat)
        );
    }
}
