pub mod common;
pub mod intent;
pub mod piece;
pub mod scene;
pub mod status;
pub mod team;

pub use common::{Direction, PieceId, Position, Side, TeamId};
pub use intent::PresentationIntent;
pub use piece::{Container, Piece, Reactions};
pub use scene::{DialogTrigger, Outcome, Phase, TurnLimits, UnitSpawn};
pub use status::{StatusEffects, StatusKind};
pub use team::Team;
