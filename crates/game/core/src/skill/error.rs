use crate::error::{ErrorSeverity, GameError};
use crate::state::{PieceId, Position};

/// Why a skill use was rejected. Rejection never changes the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillError {
    #[error("piece {0} not found")]
    UserNotFound(PieceId),

    #[error("piece {piece} has no skill {index}")]
    UnknownSkill { piece: PieceId, index: usize },

    #[error("skill {index} of {piece} cannot be used now")]
    NotReady { piece: PieceId, index: usize },

    #[error("{target} is out of range")]
    OutOfRange { target: Position },

    #[error("{target} is not a valid target")]
    InvalidTarget { target: Position },
}

impl GameError for SkillError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UserNotFound(_) | Self::UnknownSkill { .. } => ErrorSeverity::Validation,
            Self::NotReady { .. } | Self::OutOfRange { .. } | Self::InvalidTarget { .. } => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "SKILL_USER_NOT_FOUND",
            Self::UnknownSkill { .. } => "SKILL_UNKNOWN",
            Self::NotReady { .. } => "SKILL_NOT_READY",
            Self::OutOfRange { .. } => "SKILL_OUT_OF_RANGE",
            Self::InvalidTarget { .. } => "SKILL_INVALID_TARGET",
        }
    }
}
