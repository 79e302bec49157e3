//! Decision providers for teams the player does not control.
pub mod ai;

pub use ai::{AiSelector, TurnReport};
