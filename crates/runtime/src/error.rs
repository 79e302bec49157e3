//! Unified error types surfaced by the runtime API.
//!
//! Wraps rejections from the battle engine and failures of the surrounding
//! scene layer so callers can bubble them up with consistent context.
use thiserror::Error;

use tactics_core::{CommandError, DescriptorError, ErrorSeverity, GameError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to build battle")]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("overworld node {0:?} does not exist")]
    UnknownNode(String),

    #[error("overworld node {0:?} is not reachable yet")]
    NodeLocked(String),

    #[error("overworld node {0:?} has no battle")]
    NoBattle(String),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Descriptor(error) => error.severity(),
            Self::Command(error) => error.severity(),
            Self::UnknownNode(_) | Self::NoBattle(_) => ErrorSeverity::Validation,
            Self::NodeLocked(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Descriptor(error) => error.error_code(),
            Self::Command(error) => error.error_code(),
            Self::UnknownNode(_) => "RUNTIME_UNKNOWN_NODE",
            Self::NodeLocked(_) => "RUNTIME_NODE_LOCKED",
            Self::NoBattle(_) => "RUNTIME_NO_BATTLE",
        }
    }
}
