/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Presentation pause inserted between phase flips, in milliseconds.
    pub phase_pause_ms: u64,

    /// Deploy limit used when a battle descriptor does not set one.
    pub default_max_deploy: usize,

    /// Extra score, in percent of a single hit, that the AI grants an
    /// area skill for every additional enemy caught in its area.
    pub ai_area_bias: u32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Largest footprint side a piece may have.
    pub const MAX_FOOTPRINT: u32 = 5;
    pub const MAX_REACTIONS: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_PHASE_PAUSE_MS: u64 = 600;
    pub const DEFAULT_MAX_DEPLOY: usize = 4;
    pub const DEFAULT_AI_AREA_BIAS: u32 = 50;

    pub fn new() -> Self {
        Self {
            phase_pause_ms: Self::DEFAULT_PHASE_PAUSE_MS,
            default_max_deploy: Self::DEFAULT_MAX_DEPLOY,
            ai_area_bias: Self::DEFAULT_AI_AREA_BIAS,
        }
    }

    #[must_use]
    pub fn with_phase_pause_ms(mut self, phase_pause_ms: u64) -> Self {
        self.phase_pause_ms = phase_pause_ms;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
