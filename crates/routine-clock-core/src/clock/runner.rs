//! One-second cadence around the tick engine.
//!
//! The runner owns the engine, the effect sinks and a presenter, and drives
//! them from a single task. Nothing here is shared across threads.

use std::future::Future;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, trace};

use super::engine::{ClockEngine, TickOutcome};
use crate::dial::DialFrame;
use crate::effects::Effects;
use crate::events::Event;

/// Source of wall-clock time.
pub trait TimeSource {
    fn now(&mut self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn now(&mut self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Starts at a fixed instant and advances by `step` on every read.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    next: NaiveDateTime,
    step: chrono::Duration,
}

impl FixedClock {
    pub fn new(start: NaiveDateTime, step: chrono::Duration) -> Self {
        Self { next: start, step }
    }
}

impl TimeSource for FixedClock {
    fn now(&mut self) -> NaiveDateTime {
        let now = self.next;
        self.next = now + self.step;
        now
    }
}

/// Paints the dial. `frame` is the cached geometry, rebuilt only when the
/// engine reports a change; `outcome` carries the per-tick hands and caption.
pub trait Presenter {
    fn present(&mut self, frame: &DialFrame, outcome: &TickOutcome);
}

impl<F> Presenter for F
where
    F: FnMut(&DialFrame, &TickOutcome),
{
    fn present(&mut self, frame: &DialFrame, outcome: &TickOutcome) {
        self(frame, outcome)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunnerOptions {
    pub period: Duration,
    /// Stop after this many ticks; run until shutdown when `None`.
    pub max_ticks: Option<u64>,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            max_ticks: None,
        }
    }
}

pub struct Runner<T, P> {
    engine: ClockEngine,
    effects: Effects,
    clock: T,
    presenter: P,
    options: RunnerOptions,
    frame: Option<DialFrame>,
    ticks: u64,
}

impl<T: TimeSource, P: Presenter> Runner<T, P> {
    pub fn new(engine: ClockEngine, effects: Effects, clock: T, presenter: P) -> Self {
        Self {
            engine,
            effects,
            clock,
            presenter,
            options: RunnerOptions::default(),
            frame: None,
            ticks: 0,
        }
    }

    pub fn with_options(mut self, options: RunnerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn engine(&self) -> &ClockEngine {
        &self.engine
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The dial as last rebuilt.
    pub fn frame(&self) -> Option<&DialFrame> {
        self.frame.as_ref()
    }

    /// Run one tick at the time source's current instant.
    pub fn step(&mut self) -> TickOutcome {
        let now = self.clock.now();
        let outcome = self.engine.tick(now);
        self.ticks += 1;

        for event in &outcome.events {
            log_event(event);
        }
        self.effects.dispatch(&outcome.events);

        if let Some(frame) = &outcome.frame {
            self.frame = Some(frame.clone());
        }
        if let Some(frame) = self.frame.as_ref() {
            self.presenter.present(frame, &outcome);
        }
        outcome
    }

    /// Tick on the configured cadence until `shutdown` resolves or the tick
    /// limit is reached. Late ticks are skipped rather than replayed.
    pub async fn run<S>(&mut self, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        let mut interval = time::interval(self.options.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(period = ?self.options.period, "routine clock running");
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.step();
                    if self.options.max_ticks.is_some_and(|max| self.ticks >= max) {
                        debug!(ticks = self.ticks, "tick limit reached");
                        break;
                    }
                }
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
            }
        }
        info!(ticks = self.ticks, redraws = self.engine.redraws(), "routine clock stopped");
    }
}

fn log_event(event: &Event) {
    match event {
        Event::Announcement { text, .. } => info!(%text, "announcement"),
        Event::EndingSoonWarning { label, minutes_left, .. } => {
            info!(%label, minutes_left, "ending soon")
        }
        Event::DialRedrawn { reason, active_index, .. } => {
            debug!(?reason, ?active_index, "dial redrawn")
        }
        other => trace!(at = %other.at(), event = ?other, "clock event"),
    }
}
