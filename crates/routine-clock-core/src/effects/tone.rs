//! Tone playback through the default audio device.

use std::f32::consts::PI;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use rodio::{OutputStream, Sink, Source};
use tracing::warn;

use super::{Tone, ToneSink};
use crate::error::EffectError;

const SAMPLE_RATE: u32 = 44_100;
const FLOOR_GAIN: f32 = 0.01;

/// Mono sine with an exponential decay from `gain` to 0.01.
struct DecayingSine {
    frequency_hz: f32,
    gain: f32,
    total_samples: usize,
    num_sample: usize,
}

impl DecayingSine {
    fn new(tone: &Tone) -> Self {
        Self {
            frequency_hz: tone.frequency_hz,
            gain: tone.gain.max(FLOOR_GAIN),
            total_samples: (tone.duration.as_secs_f32() * SAMPLE_RATE as f32) as usize,
            num_sample: 0,
        }
    }
}

impl Iterator for DecayingSine {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }
        let t = self.num_sample as f32 / SAMPLE_RATE as f32;
        let progress = self.num_sample as f32 / self.total_samples as f32;
        self.num_sample += 1;

        let envelope = self.gain * (FLOOR_GAIN / self.gain).powf(progress);
        Some((2.0 * PI * self.frequency_hz * t).sin() * envelope)
    }
}

impl Source for DecayingSine {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.num_sample)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(self.total_samples as f32 / SAMPLE_RATE as f32))
    }
}

/// Plays tones on a dedicated audio thread that owns the output stream.
///
/// The stream is opened lazily on the first tone; if that fails the thread
/// logs and tries again on the next one.
pub struct RodioTone {
    tx: Sender<Tone>,
}

impl RodioTone {
    pub fn spawn() -> Result<Self, EffectError> {
        let (tx, rx) = mpsc::channel::<Tone>();

        thread::Builder::new()
            .name("tone-player".to_string())
            .spawn(move || {
                let mut output: Option<(OutputStream, Sink)> = None;

                while let Ok(tone) = rx.recv() {
                    if output.is_none() {
                        match OutputStream::try_default() {
                            Ok((stream, handle)) => match Sink::try_new(&handle) {
                                Ok(sink) => output = Some((stream, sink)),
                                Err(e) => warn!(error = %e, "failed to create audio sink"),
                            },
                            Err(e) => warn!(error = %e, "failed to open audio output"),
                        }
                    }
                    if let Some((_, sink)) = output.as_ref() {
                        sink.append(DecayingSine::new(&tone));
                    }
                }
            })?;

        Ok(Self { tx })
    }
}

impl ToneSink for RodioTone {
    fn play_tone(&mut self, tone: &Tone) -> Result<(), EffectError> {
        self.tx.send(*tone).map_err(|e| EffectError::Failed {
            effect: "tone",
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_decays_to_floor() {
        let samples: Vec<f32> = DecayingSine::new(&Tone::ENDING_SOON).collect();
        assert_eq!(samples.len(), SAMPLE_RATE as usize / 2);
        let peak = |s: &[f32]| s.iter().fold(0.0f32, |m, v| m.max(v.abs()));
        assert!(peak(&samples[..1000]) > 0.25);
        assert!(peak(&samples[samples.len() - 1000..]) < 0.02);
    }
}
