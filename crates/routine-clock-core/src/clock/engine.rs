//! Routine clock tick engine.
//!
//! The engine is a wall-clock-driven state machine. It owns no timer - the
//! caller invokes `tick(now)` once per second and acts on the returned
//! [`TickOutcome`].
//!
//! ## State Transitions
//!
//! ```text
//! (mode, bucket) flip   -> hard refresh: new interval list, new baseline
//! active index changes  -> highlight redraw, announcement, warning re-armed
//! ending within 5 min   -> one warning per activity occurrence
//! ```
//!
//! Both transitions are edge-triggered: a tick that changes nothing builds
//! no frame.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = ClockEngine::new(schedule);
//! // Once per second:
//! let outcome = engine.tick(Local::now().naive_local());
//! effects.dispatch(&outcome.events);
//! ```

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dial::{render, DialFrame, Hands};
use crate::events::{Event, RedrawReason};
use crate::resolver::{find_active_interval, minutes_left, ClockReading, DayWindow, Summary};
use crate::schedule::{Bucket, Interval, Mode, Schedule};

/// Tunables for the warning and pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub day_window: DayWindow,
    /// Warn when an activity has at most this many minutes left.
    pub warning_minutes: u16,
    /// How long the ending-soon pulse stays on.
    pub pulse: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            day_window: DayWindow::default(),
            warning_minutes: 5,
            pulse: Duration::seconds(3),
        }
    }
}

/// What the dial currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderState {
    /// `None` until the first tick.
    pub mode: Option<Mode>,
    pub bucket: Option<Bucket>,
    pub active_index: Option<usize>,
    pub warning_shown: bool,
    #[serde(default)]
    pub pulse_until: Option<NaiveDateTime>,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub at: NaiveDateTime,
    pub mode: Mode,
    pub bucket: Bucket,
    pub active_index: Option<usize>,
    pub events: Vec<Event>,
    /// Set only when the dial had to be rebuilt this tick.
    pub frame: Option<DialFrame>,
    pub hands: Hands,
    pub summary: Summary,
    pub pulse_active: bool,
}

impl TickOutcome {
    pub fn redrawn(&self) -> bool {
        self.frame.is_some()
    }
}

/// Read-only view of the clock at an instant, for status reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub at: NaiveDateTime,
    pub mode: Mode,
    pub bucket: Bucket,
    pub active_index: Option<usize>,
    pub active_label: Option<String>,
    pub minutes_left: Option<u16>,
    pub summary: Summary,
    pub hands: Hands,
}

/// Core tick engine.
#[derive(Debug, Clone)]
pub struct ClockEngine {
    schedule: Schedule,
    settings: EngineSettings,
    state: RenderState,
    redraws: u64,
}

impl ClockEngine {
    pub fn new(schedule: Schedule) -> Self {
        Self::with_settings(schedule, EngineSettings::default())
    }

    pub fn with_settings(schedule: Schedule, settings: EngineSettings) -> Self {
        Self {
            schedule,
            settings,
            state: RenderState::default(),
            redraws: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Number of times the dial has been rebuilt.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Resolve the clock at `now` without touching the render state.
    pub fn snapshot(&self, now: NaiveDateTime) -> Snapshot {
        let reading = ClockReading::with_window(now, self.settings.day_window);
        let intervals = self.schedule.segment(reading.bucket, reading.mode);
        let active = find_active_interval(intervals, reading.minute_of_day);
        let current = active.map(|i| &intervals[i]);

        Snapshot {
            at: now,
            mode: reading.mode,
            bucket: reading.bucket,
            active_index: active,
            active_label: current.map(|iv| iv.label.clone()),
            minutes_left: current.map(|iv| minutes_left(iv, reading.minute_of_day)),
            summary: Summary::resolve(intervals, active, reading.mode),
            hands: Hands::at(reading.hour, reading.minute, reading.second),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Swap in a new schedule. The next tick performs a hard refresh.
    pub fn replace_schedule(&mut self, schedule: Schedule) {
        self.schedule = schedule;
        self.state = RenderState {
            pulse_until: self.state.pulse_until,
            ..RenderState::default()
        };
    }

    /// Advance the state machine to `now`.
    pub fn tick(&mut self, now: NaiveDateTime) -> TickOutcome {
        let reading = ClockReading::with_window(now, self.settings.day_window);
        let (mode, bucket, minute) = (reading.mode, reading.bucket, reading.minute_of_day);
        let intervals = self.schedule.segment(bucket, mode);
        let mut events = Vec::new();
        let mut frame = None;

        if let Some(until) = self.state.pulse_until {
            if now >= until {
                self.state.pulse_until = None;
                events.push(Event::PulseEnded { at: now });
            }
        }

        // Hard refresh: the interval list differs from the one on the dial.
        if self.state.mode != Some(mode) || self.state.bucket != Some(bucket) {
            let mode_changed = self.state.mode != Some(mode);
            let reason = if mode_changed {
                events.push(Event::ModeChanged {
                    from: self.state.mode,
                    to: mode,
                    bucket,
                    at: now,
                });
                RedrawReason::ModeChanged
            } else {
                RedrawReason::BucketChanged
            };
            info!(%mode, %bucket, "switching dial segment");

            let baseline = find_active_interval(intervals, minute);
            self.state.mode = Some(mode);
            self.state.bucket = Some(bucket);
            // Only a mode flip sets a silent baseline. A midnight bucket flip
            // keeps the old index so the new activity is announced below.
            if mode_changed {
                self.state.active_index = baseline;
            }
            self.state.warning_shown = false;

            self.redraws += 1;
            frame = Some(build_frame(intervals, mode, bucket, baseline));
            events.push(Event::DialRedrawn {
                reason,
                active_index: baseline,
                at: now,
            });
        }

        let active = find_active_interval(intervals, minute);

        if active != self.state.active_index {
            let label = active.map(|i| intervals[i].label.clone());
            events.push(Event::ActivityChanged {
                from: self.state.active_index,
                to: active,
                label: label.clone(),
                at: now,
            });
            if let Some(label) = label {
                info!(%label, "activity started");
                events.push(Event::Announcement {
                    text: format!("It's time for {label}."),
                    at: now,
                });
            } else {
                debug!("no activity scheduled");
            }

            self.state.active_index = active;
            self.state.warning_shown = false;

            self.redraws += 1;
            frame = Some(build_frame(intervals, mode, bucket, active));
            events.push(Event::DialRedrawn {
                reason: RedrawReason::ActivityChanged,
                active_index: active,
                at: now,
            });
        }

        if let Some(index) = active {
            check_warning(
                &mut self.state,
                &self.settings,
                index,
                &intervals[index],
                minute,
                now,
                &mut events,
            );
        }

        TickOutcome {
            at: now,
            mode,
            bucket,
            active_index: active,
            events,
            frame,
            hands: Hands::at(reading.hour, reading.minute, reading.second),
            summary: Summary::resolve(intervals, active, mode),
            pulse_active: self.state.pulse_until.is_some(),
        }
    }
}

// ── Internal ─────────────────────────────────────────────────────────

fn check_warning(
    state: &mut RenderState,
    settings: &EngineSettings,
    index: usize,
    interval: &Interval,
    minute: u16,
    now: NaiveDateTime,
    events: &mut Vec<Event>,
) {
    if state.warning_shown {
        return;
    }
    let left = minutes_left(interval, minute);
    if left == 0 || left > settings.warning_minutes {
        return;
    }

    state.warning_shown = true;
    info!(label = %interval.label, minutes_left = left, "activity ending soon");

    events.push(Event::EndingSoonWarning {
        index,
        label: interval.label.clone(),
        minutes_left: left,
        text: format!("{} is ending soon.", interval.label),
        at: now,
    });

    match now.checked_add_signed(settings.pulse) {
        Some(until) => {
            state.pulse_until = Some(until);
            events.push(Event::PulseStarted { until, at: now });
        }
        None => warn!(pulse = ?settings.pulse, "pulse deadline out of range, skipping pulse"),
    }
}

fn build_frame(intervals: &[Interval], mode: Mode, bucket: Bucket, active: Option<usize>) -> DialFrame {
    debug!(count = intervals.len(), ?active, "rebuilding dial");
    DialFrame {
        mode,
        bucket,
        active_index: active,
        primitives: render(intervals, active),
    }
}
