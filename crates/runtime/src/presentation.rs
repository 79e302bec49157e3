//! Presentation port: where resolved intents go to be animated.
//!
//! The session hands every batch of [`PresentationIntent`]s to a port once
//! the rules have already applied them. The port only decides timing: a
//! batch that is still playing keeps the session busy until
//! [`crate::BattleSession::acknowledge`] is called.

use tactics_core::PresentationIntent;

/// Completion signal returned by a presentation port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presented {
    /// The batch finished synchronously; input is accepted again.
    Done,
    /// The batch is still playing; the caller acknowledges it later.
    Pending,
}

pub trait PresentationPort {
    fn present(&mut self, intents: &[PresentationIntent]) -> Presented;
}

/// Port that drops every intent, for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresentation;

impl PresentationPort for NullPresentation {
    fn present(&mut self, _intents: &[PresentationIntent]) -> Presented {
        Presented::Done
    }
}

/// Test double that records every intent it is given.
///
/// With `hold` set, each batch reports [`Presented::Pending`] so callers can
/// observe the busy window.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresentation {
    pub intents: Vec<PresentationIntent>,
    pub batches: usize,
    pub hold: bool,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn holding(mut self) -> Self {
        self.hold = true;
        self
    }

    /// Takes the recorded intents, leaving the log empty.
    pub fn take(&mut self) -> Vec<PresentationIntent> {
        std::mem::take(&mut self.intents)
    }
}

impl PresentationPort for RecordingPresentation {
    fn present(&mut self, intents: &[PresentationIntent]) -> Presented {
        self.intents.extend_from_slice(intents);
        self.batches += 1;
        if self.hold {
            Presented::Pending
        } else {
            Presented::Done
        }
    }
}

impl<P: PresentationPort + ?Sized> PresentationPort for &mut P {
    fn present(&mut self, intents: &[PresentationIntent]) -> Presented {
        (**self).present(intents)
    }
}

impl<P: PresentationPort + ?Sized> PresentationPort for Box<P> {
    fn present(&mut self, intents: &[PresentationIntent]) -> Presented {
        (**self).present(intents)
    }
}
