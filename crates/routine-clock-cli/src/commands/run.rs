use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDateTime;
use clap::Args;
use routine_clock_core::clock::{FixedClock, LocalClock, Presenter, TimeSource};
use routine_clock_core::dial::svg;
use routine_clock_core::effects::{CommandSpeech, LogPulse, NullSink};
use routine_clock_core::{
    ClockEngine, Config, DialFrame, Effects, Runner, RunnerOptions, ScheduleSource, SpeechSink,
    TickOutcome, ToneSink,
};
use tracing::{info, warn};

#[derive(Args)]
pub struct RunArgs {
    /// Schedule file to use instead of the stored one
    #[arg(long)]
    schedule: Option<PathBuf>,
    /// Rewrite this SVG file on every tick (overrides display.svg_output)
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Disable tone and speech
    #[arg(long)]
    silent: bool,
    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,
    /// Start the clock at this local time and advance one second per tick
    #[arg(long, value_parser = super::parse_at)]
    from: Option<NaiveDateTime>,
    /// Milliseconds between ticks
    #[arg(long, default_value = "1000")]
    interval_ms: u64,
}

/// Prints the caption when it changes and keeps an SVG file current.
struct DialPresenter {
    svg_out: Option<PathBuf>,
    caption: Option<String>,
}

impl Presenter for DialPresenter {
    fn present(&mut self, frame: &DialFrame, outcome: &TickOutcome) {
        let caption = outcome.summary.lines().join(" / ");
        if self.caption.as_deref() != Some(caption.as_str()) {
            println!("[{}] {caption}", outcome.at.format("%H:%M:%S"));
            self.caption = Some(caption);
        }

        if let Some(path) = &self.svg_out {
            let doc = svg::document(frame, &outcome.hands, &outcome.summary, outcome.pulse_active);
            if let Err(e) = write_replacing(path, &doc) {
                warn!(path = %path.display(), error = %e, "failed to write dial");
            }
        }
    }
}

/// Write through a sibling temp file so readers never see a partial dial.
fn write_replacing(path: &Path, content: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("svg.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)
}

#[cfg(feature = "audio")]
fn tone_sink() -> Box<dyn ToneSink> {
    match routine_clock_core::effects::RodioTone::spawn() {
        Ok(tone) => Box::new(tone),
        Err(e) => {
            warn!(error = %e, "tone playback unavailable");
            Box::new(NullSink)
        }
    }
}

#[cfg(not(feature = "audio"))]
fn tone_sink() -> Box<dyn ToneSink> {
    info!("built without the audio feature; tones are skipped");
    Box::new(NullSink)
}

fn build_effects(config: &Config, silent: bool) -> Effects {
    let n = &config.notifications;

    let tone: Box<dyn ToneSink> = if silent || !n.tone_enabled {
        Box::new(NullSink)
    } else {
        tone_sink()
    };

    let speech: Box<dyn SpeechSink> = if silent || !n.speech_enabled {
        Box::new(NullSink)
    } else {
        match &n.speech_program {
            Some(program) => Box::new(CommandSpeech::with_program(program.clone(), n.speech_rate)),
            None => Box::new(CommandSpeech::detect(n.speech_rate)),
        }
    };

    Effects::new(tone, speech, LogPulse)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

fn drive<T: TimeSource>(
    runtime: &tokio::runtime::Runtime,
    engine: ClockEngine,
    effects: Effects,
    clock: T,
    presenter: DialPresenter,
    options: RunnerOptions,
) {
    let mut runner = Runner::new(engine, effects, clock, presenter).with_options(options);
    runtime.block_on(runner.run(shutdown_signal()));
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let loaded = super::load_schedule(args.schedule, &config);
    match &loaded.source {
        ScheduleSource::Stored(path) => info!(path = %path.display(), "using stored schedule"),
        ScheduleSource::Default => info!("using built-in schedule"),
        other => super::report_source(other),
    }

    let engine = ClockEngine::with_settings(loaded.schedule, config.engine_settings());
    let effects = build_effects(&config, args.silent);
    let presenter = DialPresenter {
        svg_out: args.svg.or_else(|| config.display.svg_output.as_ref().map(PathBuf::from)),
        caption: None,
    };
    let options = RunnerOptions {
        period: Duration::from_millis(args.interval_ms.max(1)),
        max_ticks: args.ticks,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match args.from {
        Some(start) => {
            let clock = FixedClock::new(start, chrono::Duration::seconds(1));
            drive(&runtime, engine, effects, clock, presenter, options);
        }
        None => drive(&runtime, engine, effects, LocalClock, presenter, options),
    }
    Ok(())
}
