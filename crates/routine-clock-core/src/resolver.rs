//! Time resolution: wall clock → mode, bucket, and active interval.
//!
//! Everything here is a pure function of its inputs so the tick engine can be
//! driven with synthetic times in tests.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::schedule::{Bucket, Interval, Mode, MINUTES_PER_DAY};

/// Hour at which day mode begins.
pub const DAY_START_HOUR: u32 = 7;
/// Hour at which night mode begins.
pub const NIGHT_START_HOUR: u32 = 19;

/// Half-open hour window `[day_start, night_start)` that counts as day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub day_start_hour: u32,
    pub night_start_hour: u32,
}

impl Default for DayWindow {
    fn default() -> Self {
        Self {
            day_start_hour: DAY_START_HOUR,
            night_start_hour: NIGHT_START_HOUR,
        }
    }
}

impl DayWindow {
    pub fn mode_at(&self, hour: u32) -> Mode {
        if hour >= self.day_start_hour && hour < self.night_start_hour {
            Mode::Day
        } else {
            Mode::Night
        }
    }
}

/// Day for hours in `[7, 19)`, night otherwise.
pub fn resolve_mode(hour: u32) -> Mode {
    DayWindow::default().mode_at(hour)
}

/// Saturday and Sunday use the weekend schedule.
pub fn resolve_bucket(weekday: Weekday) -> Bucket {
    match weekday {
        Weekday::Sat | Weekday::Sun => Bucket::Weekend,
        _ => Bucket::MonFri,
    }
}

/// Whether `minute` (minute-of-day) falls inside `interval`.
///
/// Intervals are half-open `[start, end)`. When `end < start` the interval
/// wraps past midnight; equal endpoints cover the whole day.
pub fn contains(interval: &Interval, minute: u16) -> bool {
    let start = interval.start.minute_of_day();
    let end = interval.end.minute_of_day();
    if end <= start {
        minute >= start || minute < end
    } else {
        minute >= start && minute < end
    }
}

/// Index of the first interval containing `minute`, scanning in list order.
///
/// Overlapping intervals resolve to the earliest entry. `None` is a valid
/// steady state, not an error.
pub fn find_active_interval(intervals: &[Interval], minute: u16) -> Option<usize> {
    intervals.iter().position(|interval| contains(interval, minute))
}

/// Minutes remaining in the occurrence of `interval` that is active at `minute`.
///
/// Both ends are shifted by a full day when the interval wraps, and any
/// non-positive intermediate result is normalised by adding a day.
pub fn minutes_left(interval: &Interval, minute: u16) -> u16 {
    let day = MINUTES_PER_DAY as i32;
    let start = interval.start.minute_of_day() as i32;
    let mut end = interval.end.minute_of_day() as i32;
    let mut current = minute as i32;

    if end < start {
        end += day;
    }
    if current < start {
        current += day;
    }

    let mut left = end - current;
    while left <= 0 {
        left += day;
    }
    left as u16
}

/// Calendar and clock fields read once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub weekday: Weekday,
    pub minute_of_day: u16,
    pub mode: Mode,
    pub bucket: Bucket,
}

impl ClockReading {
    pub fn from_datetime(now: NaiveDateTime) -> Self {
        Self::with_window(now, DayWindow::default())
    }

    pub fn with_window(now: NaiveDateTime, window: DayWindow) -> Self {
        let hour = now.hour();
        let minute = now.minute();
        Self {
            hour,
            minute,
            // Leap seconds surface as 59 so hand angles stay in range.
            second: now.second().min(59),
            weekday: now.weekday(),
            minute_of_day: (hour * 60 + minute) as u16,
            mode: window.mode_at(hour),
            bucket: resolve_bucket(now.weekday()),
        }
    }
}

/// The "now / next" caption under the dial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Summary {
    Activity { now: String, next: String },
    Idle { caption: String },
}

impl Summary {
    /// Summarise the active interval and the one after it in list order.
    pub fn resolve(intervals: &[Interval], active: Option<usize>, mode: Mode) -> Self {
        match active.and_then(|i| intervals.get(i).map(|iv| (i, iv))) {
            Some((index, current)) => {
                let next = &intervals[(index + 1) % intervals.len()];
                Summary::Activity {
                    now: current.label.clone(),
                    next: next.label.clone(),
                }
            }
            None => Summary::Idle {
                caption: mode.caption().to_string(),
            },
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            Summary::Activity { now, next } => vec![format!("Now: {now}"), format!("Next: {next}")],
            Summary::Idle { caption } => vec![caption.clone()],
        }
    }
}
