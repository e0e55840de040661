//! Speech through the platform's command-line synthesizer.

use std::io::ErrorKind;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, trace, warn};

use super::SpeechSink;
use crate::error::EffectError;

/// Words per minute at a rate of 1.0 for both `say` and `espeak`.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// How to invoke the synthesizer for one utterance.
#[derive(Debug, Clone)]
struct Voice {
    program: String,
    rate_flag: &'static str,
    words_per_minute: u32,
}

impl Voice {
    /// Speak `text` and wait for the synthesizer to exit.
    fn say(&self, text: &str) -> Result<(), EffectError> {
        trace!(program = %self.program, text, "running speech");

        let status = Command::new(&self.program)
            .arg(self.rate_flag)
            .arg(self.words_per_minute.to_string())
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => EffectError::Unavailable {
                    effect: "speech",
                    message: format!("'{}' not found on PATH", self.program),
                },
                _ => EffectError::Io(e),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(EffectError::Failed {
                effect: "speech",
                message: format!("'{}' exited with {status}", self.program),
            })
        }
    }
}

/// Speaks by running `say` (macOS) or `espeak-ng` (elsewhere).
///
/// Utterances are queued onto a worker thread that runs the synthesizer one
/// at a time, so an announcement and a warning in the same tick are spoken
/// in order rather than over each other. `speak` never waits.
pub struct CommandSpeech {
    voice: Voice,
    tx: Option<Sender<String>>,
    worker: Option<JoinHandle<()>>,
    unavailable: Arc<AtomicBool>,
}

impl CommandSpeech {
    /// Synthesizer for the current platform at `rate` (1.0 is normal speed).
    pub fn detect(rate: f32) -> Self {
        let program = if cfg!(target_os = "macos") { "say" } else { "espeak-ng" };
        Self::with_program(program, rate)
    }

    /// Use a specific program. `say` takes `-r`, everything else `-s`.
    pub fn with_program(program: impl Into<String>, rate: f32) -> Self {
        let program = program.into();
        let rate_flag = if program.ends_with("say") { "-r" } else { "-s" };
        let words_per_minute = (BASE_WORDS_PER_MINUTE * rate.clamp(0.25, 4.0)).round() as u32;
        Self {
            voice: Voice {
                program,
                rate_flag,
                words_per_minute,
            },
            tx: None,
            worker: None,
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    fn queue(&mut self) -> Result<&Sender<String>, EffectError> {
        if self.tx.is_none() {
            let (tx, rx) = mpsc::channel::<String>();
            let voice = self.voice.clone();
            let unavailable = Arc::clone(&self.unavailable);

            let worker = thread::Builder::new()
                .name("speech".to_string())
                .spawn(move || {
                    while let Ok(text) = rx.recv() {
                        match voice.say(&text) {
                            Ok(()) => debug!("speech finished"),
                            Err(e @ EffectError::Unavailable { .. }) => {
                                warn!(error = %e, "speech unavailable");
                                unavailable.store(true, Ordering::Relaxed);
                            }
                            Err(e) => warn!(error = %e, "speech failed"),
                        }
                    }
                })?;

            self.worker = Some(worker);
            self.tx = Some(tx);
        }
        self.tx.as_ref().ok_or_else(|| EffectError::Failed {
            effect: "speech",
            message: "speech queue closed".into(),
        })
    }

    /// Close the queue and wait for every queued utterance to be spoken.
    fn drain(&mut self) {
        self.tx = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("speech worker panicked");
            }
        }
    }
}

impl SpeechSink for CommandSpeech {
    fn speak(&mut self, text: &str) -> Result<(), EffectError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(EffectError::Unavailable {
                effect: "speech",
                message: format!("'{}' not found on PATH", self.voice.program),
            });
        }

        self.queue()?.send(text.to_string()).map_err(|e| EffectError::Failed {
            effect: "speech",
            message: e.to_string(),
        })
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.drain();
    }
}
