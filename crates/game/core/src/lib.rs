//! Deterministic battle rules for a grid tactics game.
//!
//! `tactics-core` defines the board, occupancy, targeting, skill resolution
//! and the turn/phase state machine as pure APIs. Once a battle starts, all
//! state mutation flows through [`engine::BattleEngine`]; presentation layers
//! read the [`BattleState`] and animate the [`PresentationIntent`]s it
//! queues, never feeding timing back into the rules.
pub mod board;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod movement;
pub mod skill;
pub mod state;
pub mod targeting;

pub use board::{
    Board, Cell, RangeMarks, Shape, ShapeProps, Terrain, TerrainFlags, TerrainTable, TileCode,
    area_radius,
};
pub use config::GameConfig;
pub use engine::{BattleEngine, CommandError, evaluate_outcome};
pub use env::{BattleDescriptor, BattleEnv, DescriptorError, UnitOracle, UnitTable, UnitTemplate};
pub use error::{ErrorSeverity, GameError};
pub use movement::MoveError;
pub use skill::{
    EffectContext, Reaction, ReactionEffect, ReactionTrigger, Skill, SkillEffect, SkillError,
    SkillOutcome, SkillStage, TargetRule, Uses, use_skill,
};
pub use state::{
    BattleState, Container, DialogTrigger, Direction, Outcome, Phase, Piece, PieceId, Position,
    PresentationIntent, Reactions, Side, StatusEffects, StatusKind, Team, TeamId, TurnLimits,
    UnitSpawn,
};
pub use targeting::{SightRule, Targeting};
