//! Minute-of-day time values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScheduleError;

/// Minutes in a full day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time of day with minute resolution.
///
/// Stored as minute-of-day in `[0, 1440)` and serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Build from an hour in `0..24` and a minute in `0..60`.
    pub fn new(hour: u8, minute: u8) -> Result<Self, ScheduleError> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleError::TimeOutOfRange {
                value: format!("{hour}:{minute}"),
                message: "hour must be 0-23 and minute 0-59".into(),
            });
        }
        Ok(Self(hour as u16 * 60 + minute as u16))
    }

    /// Build from a minute-of-day, wrapping values past midnight.
    pub fn from_minutes(minutes: u32) -> Self {
        Self((minutes % MINUTES_PER_DAY as u32) as u16)
    }

    pub fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }

    pub fn minute_of_day(self) -> u16 {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTime(s.to_string());

        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let is_field = |part: &str| {
            !part.is_empty() && part.len() <= 2 && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !is_field(h) || !is_field(m) {
            return Err(invalid());
        }

        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        TimeOfDay::new(hour, minute).map_err(|_| ScheduleError::TimeOutOfRange {
            value: s.to_string(),
            message: "hour must be 0-23 and minute 0-59".into(),
        })
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}
