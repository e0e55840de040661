use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::schedule::{Bucket, Mode};

/// Why the dial was rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedrawReason {
    /// Day/night flip: the interval list itself changed.
    ModeChanged,
    /// Same mode, but the weekday bucket flipped at midnight.
    BucketChanged,
    /// Same list, different highlighted interval.
    ActivityChanged,
}

/// Every state change in the clock produces an Event.
/// The runner logs them; hosts may forward them to their own UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ModeChanged {
        from: Option<Mode>,
        to: Mode,
        bucket: Bucket,
        at: NaiveDateTime,
    },
    DialRedrawn {
        reason: RedrawReason,
        active_index: Option<usize>,
        at: NaiveDateTime,
    },
    ActivityChanged {
        from: Option<usize>,
        to: Option<usize>,
        label: Option<String>,
        at: NaiveDateTime,
    },
    /// Spoken line announcing the activity that just started.
    Announcement {
        text: String,
        at: NaiveDateTime,
    },
    /// The active interval ends within the warning threshold.
    EndingSoonWarning {
        index: usize,
        label: String,
        minutes_left: u16,
        text: String,
        at: NaiveDateTime,
    },
    PulseStarted {
        until: NaiveDateTime,
        at: NaiveDateTime,
    },
    PulseEnded {
        at: NaiveDateTime,
    },
}

impl Event {
    pub fn at(&self) -> NaiveDateTime {
        match self {
            Event::ModeChanged { at, .. }
            | Event::DialRedrawn { at, .. }
            | Event::ActivityChanged { at, .. }
            | Event::Announcement { at, .. }
            | Event::EndingSoonWarning { at, .. }
            | Event::PulseStarted { at, .. }
            | Event::PulseEnded { at } => *at,
        }
    }
}
