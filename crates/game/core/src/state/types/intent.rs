//! Presentation intents emitted alongside logical state changes.
//!
//! Every intent describes something that has already happened to the state.
//! Presentation layers animate them at their own pace; the outcome never
//! depends on how or when they are played.

use crate::skill::SkillStage;

use super::{Direction, Outcome, Phase, PieceId, Position, StatusKind};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PresentationIntent {
    Banner { phase: Phase, turn: u32 },
    Pause { millis: u64 },
    Dialog { message: String },
    Spawn { piece: PieceId, at: Position },
    Move { piece: PieceId, path: Vec<Position> },
    Remove { piece: PieceId },
    Face { piece: PieceId, direction: Direction },
    SkillStage { piece: PieceId, skill: usize, stage: SkillStage },
    Damage { piece: PieceId, amount: u32 },
    Heal { piece: PieceId, amount: u32 },
    Status { piece: PieceId, kind: StatusKind, turns: u32 },
    Death { piece: PieceId },
    Refresh { piece: PieceId },
    BattleEnded { outcome: Outcome },
}
