//! Scene layer around the deterministic battle rules.
//!
//! This crate wires the pure `tactics-core` engine to the outside world:
//! scene input, presentation pacing, the AI for auto-controlled teams and
//! the campaign state that outlives a battle.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the per-battle input surface and busy handling
//! - [`presentation`] defines the port presentation layers implement
//! - [`providers`] holds the AI selector and its scoring
//! - [`context`] and [`overworld`] carry party, save flags and the node graph
pub mod context;
pub mod error;
pub mod overworld;
pub mod presentation;
pub mod providers;
pub mod session;

pub use context::{AudioPort, GameContext, SaveFlags, SilentAudio, SoundCue};
pub use error::{Result, RuntimeError};
pub use overworld::{Overworld, OverworldNode};
pub use presentation::{NullPresentation, PresentationPort, Presented, RecordingPresentation};
pub use providers::{AiSelector, TurnReport};
pub use session::{BattleSession, Key, Selection};
