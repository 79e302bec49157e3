//! Utility AI for auto-controlled teams.
//!
//! # Core Components
//!
//! - [`AiSelector`]: seeded selector that plays one unit's turn at a time
//! - [`scoring`]: position and target scoring shared by every decision

pub mod scoring;
pub mod selector;

pub use scoring::{TargetScore, position_score, target_score};
pub use selector::{AiSelector, TurnReport};
