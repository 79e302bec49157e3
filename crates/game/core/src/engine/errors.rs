//! Errors surfaced by the command surface.

use crate::error::{ErrorSeverity, GameError};
use crate::movement::MoveError;
use crate::skill::SkillError;
use crate::state::{Phase, PieceId, Position};

/// Why a command was rejected. A rejected command changes nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error("input is locked while an action is presented")]
    Busy,

    #[error("battle is not in progress")]
    NotInProgress,

    #[error("command not allowed during {0}")]
    WrongPhase(Phase),

    #[error("piece {0} not found")]
    PieceNotFound(PieceId),

    #[error("piece {0} is not on the active team")]
    NotActive(PieceId),

    #[error("piece {0} cannot move now")]
    CannotMove(PieceId),

    #[error("{destination} is not reachable for {piece}")]
    Unreachable {
        piece: PieceId,
        destination: Position,
    },

    #[error("piece {0} has no move to undo")]
    NothingToUndo(PieceId),

    #[error("piece {0} is not in the party")]
    NotInParty(PieceId),

    #[error("{0} is not a deploy cell")]
    NotDeployCell(Position),

    #[error("deploy limit of {0} reached")]
    DeployLimit(usize),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Skill(#[from] SkillError),
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Move(error) => error.severity(),
            Self::Skill(error) => error.severity(),
            Self::Busy | Self::Unreachable { .. } | Self::DeployLimit(_) => {
                ErrorSeverity::Recoverable
            }
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Busy => "COMMAND_BUSY",
            Self::NotInProgress => "COMMAND_NOT_IN_PROGRESS",
            Self::WrongPhase(_) => "COMMAND_WRONG_PHASE",
            Self::PieceNotFound(_) => "COMMAND_PIECE_NOT_FOUND",
            Self::NotActive(_) => "COMMAND_NOT_ACTIVE",
            Self::CannotMove(_) => "COMMAND_CANNOT_MOVE",
            Self::Unreachable { .. } => "COMMAND_UNREACHABLE",
            Self::NothingToUndo(_) => "COMMAND_NOTHING_TO_UNDO",
            Self::NotInParty(_) => "COMMAND_NOT_IN_PARTY",
            Self::NotDeployCell(_) => "COMMAND_NOT_DEPLOY_CELL",
            Self::DeployLimit(_) => "COMMAND_DEPLOY_LIMIT",
            Self::Move(error) => error.error_code(),
            Self::Skill(error) => error.error_code(),
        }
    }
}
