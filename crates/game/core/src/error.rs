//! Common error infrastructure for tactics-core.
//!
//! Domain errors (`MoveError`, `SkillError`, `CommandError`,
//! `DescriptorError`) live next to the operations they reject. They all share
//! the classification below so callers can decide how to react without
//! matching on every variant.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same command may succeed later or with another target
/// - **Validation**: the command is malformed for the current state
/// - **Internal**: the state disagrees with itself and should be investigated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: destination blocked, target out of range.
    Recoverable,

    /// Examples: unknown piece, acting outside the unit's turn.
    Validation,

    /// Examples: occupancy back-reference out of sync with a piece anchor.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all tactics-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Keep error codes stable; logs and tests match on them
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
