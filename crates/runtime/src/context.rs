//! Explicit game context: party roster, save flags and the audio port.
//!
//! One [`GameContext`] is constructed by the application and passed to
//! whatever needs it; nothing here is global.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use tactics_content::UnitRegistry;
use tactics_core::{
    BattleDescriptor, GameConfig, Outcome, PresentationIntent, UnitOracle, UnitTemplate,
};

use crate::error::Result;
use crate::presentation::PresentationPort;
use crate::session::BattleSession;

/// Integer flag store persisted between battles.
///
/// A flag is "set" when its value is non-zero; missing flags read as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaveFlags {
    values: BTreeMap<String, i64>,
}

impl SaveFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> i64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.get(key) != 0
    }

    pub fn set(&mut self, key: impl Into<String>) {
        self.set_value(key, 1);
    }

    /// Stores `value`; zero removes the flag.
    pub fn set_value(&mut self, key: impl Into<String>, value: i64) {
        let key = key.into();
        if value == 0 {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
    }

    pub fn clear(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// Adds one and returns the new value.
    pub fn increment(&mut self, key: impl Into<String>) -> i64 {
        let key = key.into();
        let value = self.get(&key) + 1;
        self.values.insert(key, value);
        value
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(key, value)| (key.as_str(), *value))
    }
}

/// Sound cues the game asks the audio port to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum SoundCue {
    BattleStart,
    Phase,
    Hit,
    Heal,
    Death,
    Victory,
    Defeat,
}

impl SoundCue {
    /// Cue matching a presentation intent, if it has one.
    pub fn for_intent(intent: &PresentationIntent) -> Option<Self> {
        match intent {
            PresentationIntent::Banner { .. } => Some(Self::Phase),
            PresentationIntent::Damage { .. } => Some(Self::Hit),
            PresentationIntent::Heal { .. } => Some(Self::Heal),
            PresentationIntent::Death { .. } => Some(Self::Death),
            PresentationIntent::BattleEnded { outcome } => Some(Self::for_outcome(*outcome)),
            _ => None,
        }
    }

    pub fn for_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Victory => Self::Victory,
            Outcome::Defeat => Self::Defeat,
        }
    }
}

pub trait AudioPort {
    fn play(&mut self, cue: SoundCue);
}

/// Audio port that plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioPort for SilentAudio {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Everything that outlives a single battle.
pub struct GameContext {
    units: Arc<dyn UnitOracle>,
    config: GameConfig,
    party: Vec<UnitTemplate>,
    flags: SaveFlags,
    audio: Box<dyn AudioPort>,
}

impl GameContext {
    pub fn new(units: Arc<dyn UnitOracle>, config: GameConfig) -> Self {
        Self {
            units,
            config,
            party: Vec::new(),
            flags: SaveFlags::new(),
            audio: Box::new(SilentAudio),
        }
    }

    /// Context backed by the built-in unit registry.
    pub fn standard(config: GameConfig) -> Self {
        Self::new(Arc::new(UnitRegistry::standard()), config)
    }

    #[must_use]
    pub fn with_audio(mut self, audio: Box<dyn AudioPort>) -> Self {
        self.audio = audio;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SaveFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn units(&self) -> &Arc<dyn UnitOracle> {
        &self.units
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn party(&self) -> &[UnitTemplate] {
        &self.party
    }

    /// Adds a unit of type `key` to the party; unknown keys recruit the
    /// generic base unit.
    pub fn recruit(&mut self, key: &str) {
        let template = self.units.template_or_base(key);
        info!(key, name = %template.name, "recruited");
        self.party.push(template);
    }

    pub fn flags(&self) -> &SaveFlags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut SaveFlags {
        &mut self.flags
    }

    pub fn audio_mut(&mut self) -> &mut dyn AudioPort {
        self.audio.as_mut()
    }

    /// Builds a battle session with the current party on its roster.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RuntimeError::Descriptor`] for a malformed descriptor.
    pub fn begin_battle<P: PresentationPort>(
        &mut self,
        descriptor: &BattleDescriptor,
        port: P,
    ) -> Result<BattleSession<P>> {
        let session = BattleSession::new(
            descriptor,
            Arc::clone(&self.units),
            self.config.clone(),
            &self.party,
            port,
        )?;
        self.audio.play(SoundCue::BattleStart);
        Ok(session)
    }

    /// Records a finished battle under `battle` and plays its jingle.
    pub fn record_outcome(&mut self, battle: &str, outcome: Outcome) {
        self.flags.increment("battles.fought");
        if outcome == Outcome::Victory {
            self.flags.set(format!("battle.{battle}.won"));
        }
        self.audio.play(SoundCue::for_outcome(outcome));
        info!(battle, %outcome, "battle recorded");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tactics_core::UnitTable;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedAudio(Rc<RefCell<Vec<SoundCue>>>);

    impl AudioPort for SharedAudio {
        fn play(&mut self, cue: SoundCue) {
            self.0.borrow_mut().push(cue);
        }
    }

    fn context() -> GameContext {
        let units = UnitTable::new(UnitTemplate::new("base", 3, 3))
            .with(UnitTemplate::new("knight", 8, 4));
        GameContext::new(Arc::new(units), GameConfig::default())
    }

    #[test]
    fn flags_read_zero_until_set() {
        let mut flags = SaveFlags::new();
        assert!(!flags.is_set("door"));
        flags.set("door");
        assert!(flags.is_set("door"));
        assert_eq!(flags.increment("door"), 2);
        flags.set_value("door", 0);
        assert_eq!(flags.iter().count(), 0);
    }

    #[test]
    fn recruit_falls_back_to_base() {
        let mut ctx = context();
        ctx.recruit("knight");
        ctx.recruit("dragon");
        let kinds: Vec<_> = ctx.party().iter().map(|t| t.kind.as_str()).collect();
        assert_eq!(kinds, ["knight", "base"]);
    }

    #[test]
    fn outcome_sets_flags_and_plays_jingle() {
        let audio = SharedAudio::default();
        let mut ctx = context().with_audio(Box::new(audio.clone()));
        ctx.record_outcome("bridge", Outcome::Victory);
        ctx.record_outcome("keep", Outcome::Defeat);

        assert!(ctx.flags().is_set("battle.bridge.won"));
        assert!(!ctx.flags().is_set("battle.keep.won"));
        assert_eq!(ctx.flags().get("battles.fought"), 2);
        assert_eq!(*audio.0.borrow(), [SoundCue::Victory, SoundCue::Defeat]);
    }
}
