//! Scene-level bookkeeping: phases, turn limits, schedules.

use super::{Position, Side};

/// Stage of the battle's turn cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Built from a descriptor, not yet started.
    #[default]
    PreBattle,
    Deploy,
    Player,
    Enemy,
    /// Terminal; no further input is accepted.
    End,
}

/// Final result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Victory,
    Defeat,
}

/// Turn bounds and the result awarded when the last turn runs out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TurnLimits {
    /// Clearing the enemy team only wins from this turn on.
    pub min_turns: u32,
    pub max_turns: Option<u32>,
    /// Outcome when `max_turns` is exceeded: victory if set, defeat otherwise.
    pub default_victory: bool,
}

impl Default for TurnLimits {
    fn default() -> Self {
        Self {
            min_turns: 0,
            max_turns: None,
            default_victory: false,
        }
    }
}

/// A unit scheduled to enter the board on a given turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitSpawn {
    pub at: Position,
    /// Turns `<= 1` are placed when the battle is built.
    pub turn: u32,
    /// Unit-type key resolved through the unit oracle.
    pub unit: String,
    pub side: Side,
}

/// Message shown when a phase begins on a given turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialogTrigger {
    pub turn: u32,
    pub phase: Phase,
    pub message: String,
}
