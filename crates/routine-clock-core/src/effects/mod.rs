//! Effect sinks: tone, speech and visual pulse.
//!
//! The tick engine never touches audio or speech directly. It emits
//! [`Event`]s and [`Effects::dispatch`] forwards them to three narrow
//! capability traits. Every sink call is best-effort: failures are logged
//! and swallowed so a missing speaker or speech program can never stall the
//! clock.

mod speech;
#[cfg(feature = "audio")]
mod tone;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::EffectError;
use crate::events::Event;

pub use speech::CommandSpeech;
#[cfg(feature = "audio")]
pub use tone::RodioTone;

/// A short synthesized cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration: Duration,
    /// Starting gain; the envelope decays exponentially to 0.01.
    pub gain: f32,
}

impl Tone {
    /// C5 sine, half a second, decaying from 0.3.
    pub const ENDING_SOON: Tone = Tone {
        frequency_hz: 523.25,
        duration: Duration::from_millis(500),
        gain: 0.3,
    };
}

pub trait ToneSink {
    fn play_tone(&mut self, tone: &Tone) -> Result<(), EffectError>;
}

pub trait SpeechSink {
    fn speak(&mut self, text: &str) -> Result<(), EffectError>;
}

/// Transient visual highlight; the engine decides when it turns off.
pub trait PulseSink {
    fn set_pulse(&mut self, on: bool) -> Result<(), EffectError>;
}

impl<S: ToneSink + ?Sized> ToneSink for Box<S> {
    fn play_tone(&mut self, tone: &Tone) -> Result<(), EffectError> {
        (**self).play_tone(tone)
    }
}

impl<S: SpeechSink + ?Sized> SpeechSink for Box<S> {
    fn speak(&mut self, text: &str) -> Result<(), EffectError> {
        (**self).speak(text)
    }
}

impl<S: PulseSink + ?Sized> PulseSink for Box<S> {
    fn set_pulse(&mut self, on: bool) -> Result<(), EffectError> {
        (**self).set_pulse(on)
    }
}

/// Silently accepts every effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ToneSink for NullSink {
    fn play_tone(&mut self, _tone: &Tone) -> Result<(), EffectError> {
        Ok(())
    }
}

impl SpeechSink for NullSink {
    fn speak(&mut self, _text: &str) -> Result<(), EffectError> {
        Ok(())
    }
}

impl PulseSink for NullSink {
    fn set_pulse(&mut self, _on: bool) -> Result<(), EffectError> {
        Ok(())
    }
}

/// Reports pulse changes through the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPulse;

impl PulseSink for LogPulse {
    fn set_pulse(&mut self, on: bool) -> Result<(), EffectError> {
        if on {
            tracing::info!("transition warning pulse on");
        } else {
            tracing::info!("transition warning pulse off");
        }
        Ok(())
    }
}

/// One effect as seen by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum EffectCall {
    Tone(Tone),
    Speech(String),
    Pulse(bool),
}

/// Records every effect into a shared log. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    calls: Rc<RefCell<Vec<EffectCall>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<EffectCall> {
        self.calls.borrow().clone()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                EffectCall::Speech(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ToneSink for RecordingSink {
    fn play_tone(&mut self, tone: &Tone) -> Result<(), EffectError> {
        self.calls.borrow_mut().push(EffectCall::Tone(*tone));
        Ok(())
    }
}

impl SpeechSink for RecordingSink {
    fn speak(&mut self, text: &str) -> Result<(), EffectError> {
        self.calls.borrow_mut().push(EffectCall::Speech(text.to_string()));
        Ok(())
    }
}

impl PulseSink for RecordingSink {
    fn set_pulse(&mut self, on: bool) -> Result<(), EffectError> {
        self.calls.borrow_mut().push(EffectCall::Pulse(on));
        Ok(())
    }
}

/// The three sinks the runner drives.
pub struct Effects {
    tone: Box<dyn ToneSink>,
    speech: Box<dyn SpeechSink>,
    pulse: Box<dyn PulseSink>,
}

impl Effects {
    pub fn new(
        tone: impl ToneSink + 'static,
        speech: impl SpeechSink + 'static,
        pulse: impl PulseSink + 'static,
    ) -> Self {
        Self {
            tone: Box::new(tone),
            speech: Box::new(speech),
            pulse: Box::new(pulse),
        }
    }

    /// All effects discarded.
    pub fn silent() -> Self {
        Self::new(NullSink, NullSink, NullSink)
    }

    /// All effects recorded into one shared log.
    pub fn recording(sink: &RecordingSink) -> Self {
        Self::new(sink.clone(), sink.clone(), sink.clone())
    }

    /// Forward the effect-bearing events of one tick to the sinks.
    pub fn dispatch(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::Announcement { text, .. } => {
                    best_effort("speech", self.speech.speak(text));
                }
                Event::EndingSoonWarning { text, .. } => {
                    best_effort("tone", self.tone.play_tone(&Tone::ENDING_SOON));
                    best_effort("speech", self.speech.speak(text));
                }
                Event::PulseStarted { .. } => {
                    best_effort("pulse", self.pulse.set_pulse(true));
                }
                Event::PulseEnded { .. } => {
                    best_effort("pulse", self.pulse.set_pulse(false));
                }
                _ => {}
            }
        }
    }
}

fn best_effort(effect: &str, result: Result<(), EffectError>) {
    match result {
        Ok(()) => debug!(effect, "effect delivered"),
        Err(e) => warn!(effect, error = %e, "effect failed; continuing silently"),
    }
}
