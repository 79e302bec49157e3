//! Headless presentation: intents and sound cues become log lines.
use tracing::{debug, info};

use tactics_core::PresentationIntent;
use tactics_runtime::{AudioPort, PresentationPort, Presented, SoundCue};

/// Presentation port that writes each intent to the log and finishes
/// every batch immediately.
#[derive(Debug, Default)]
pub struct LogPresentation {
    pub intents: usize,
}

impl PresentationPort for LogPresentation {
    fn present(&mut self, intents: &[PresentationIntent]) -> Presented {
        for intent in intents {
            self.intents += 1;
            match intent {
                PresentationIntent::Banner { .. }
                | PresentationIntent::Dialog { .. }
                | PresentationIntent::Death { .. }
                | PresentationIntent::BattleEnded { .. } => info!(?intent, "present"),
                _ => debug!(?intent, "present"),
            }
            if let Some(cue) = SoundCue::for_intent(intent) {
                debug!(%cue, "sound");
            }
        }
        Presented::Done
    }
}

/// Audio port that logs the cues it is asked to play.
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioPort for LogAudio {
    fn play(&mut self, cue: SoundCue) {
        info!(%cue, "play");
    }
}
