//! Two-tier routine schedule: weekday bucket × day/night mode.
//!
//! A [`Schedule`] is loaded once at startup and treated as immutable for the
//! session. Each of its four segments is an ordered list of [`Interval`]s laid
//! out on a 24-hour ring.

mod default;
mod time;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ScheduleError;

pub use time::{TimeOfDay, MINUTES_PER_DAY};

/// Day or night half of the dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Day,
    Night,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Night => "night",
        }
    }

    /// Generic caption shown when no activity is scheduled.
    pub fn caption(&self) -> &'static str {
        match self {
            Self::Day => "Day Time",
            Self::Night => "Night Time",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weekday or weekend schedule bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    #[serde(rename = "mon_fri")]
    MonFri,
    #[serde(rename = "weekend")]
    Weekend,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MonFri => "mon_fri",
            Self::Weekend => "weekend",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labelled activity slot on the dial.
///
/// `end < start` means the interval runs past midnight into the next day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub label: String,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Interval {
    pub fn new(label: impl Into<String>, start: TimeOfDay, end: TimeOfDay, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start,
            end,
            color: color.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// True when the interval crosses midnight.
    pub fn wraps_midnight(&self) -> bool {
        self.end < self.start
    }

    /// Length of one occurrence in minutes. Equal endpoints span a full day.
    pub fn duration_min(&self) -> u16 {
        let start = self.start.minute_of_day();
        let end = self.end.minute_of_day();
        if end > start {
            end - start
        } else {
            end + MINUTES_PER_DAY - start
        }
    }
}

/// Ordered intervals covering one logical period (all day or all night slots).
pub type DaySegment = Vec<Interval>;

/// Day and night segments for one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSchedule {
    pub day: DaySegment,
    pub night: DaySegment,
}

impl BucketSchedule {
    pub fn segment(&self, mode: Mode) -> &[Interval] {
        match mode {
            Mode::Day => &self.day,
            Mode::Night => &self.night,
        }
    }
}

/// The full routine: `{mon_fri, weekend} × {day, night}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub mon_fri: BucketSchedule,
    pub weekend: BucketSchedule,
}

impl Schedule {
    /// Built-in routine used when no stored schedule is available.
    pub fn default_routine() -> Self {
        default::routine()
    }

    pub fn bucket(&self, bucket: Bucket) -> &BucketSchedule {
        match bucket {
            Bucket::MonFri => &self.mon_fri,
            Bucket::Weekend => &self.weekend,
        }
    }

    /// Intervals for a bucket/mode pair.
    pub fn segment(&self, bucket: Bucket, mode: Mode) -> &[Interval] {
        self.bucket(bucket).segment(mode)
    }

    /// Check authoring constraints the resolver cannot tolerate.
    ///
    /// Gaps and overlaps are allowed; empty labels are not.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for bucket in [Bucket::MonFri, Bucket::Weekend] {
            for mode in [Mode::Day, Mode::Night] {
                for (index, interval) in self.segment(bucket, mode).iter().enumerate() {
                    if interval.label.trim().is_empty() {
                        return Err(ScheduleError::EmptyLabel {
                            bucket: bucket.to_string(),
                            mode: mode.to_string(),
                            index,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn interval_count(&self) -> usize {
        [&self.mon_fri, &self.weekend]
            .iter()
            .map(|b| b.day.len() + b.night.len())
            .sum()
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::default_routine()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn default_routine_is_valid() {
        let s = Schedule::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.mon_fri.day.len(), 12);
        assert_eq!(s.mon_fri.night.len(), 4);
        assert_eq!(s.weekend.day.len(), 9);
        assert_eq!(s.weekend.night.len(), 1);
        assert_eq!(s.interval_count(), 26);
    }

    #[test]
    fn segment_lookup() {
        let s = Schedule::default();
        assert_eq!(s.segment(Bucket::Weekend, Mode::Night)[0].label, "Sleep");
        assert_eq!(s.segment(Bucket::MonFri, Mode::Day)[0].label, "Wake Up");
    }

    #[test]
    fn schedule_json_shape() {
        let json = r##"{
            "mon_fri": {
                "day": [{"label": "School", "start": "08:30", "end": "15:15", "color": "#B5C9D4"}],
                "night": []
            },
            "weekend": {"day": [], "night": []}
        }"##;
        let s: Schedule = serde_json::from_str(json).unwrap();
        assert_eq!(s.mon_fri.day[0].start, t("08:30"));
        assert_eq!(s.mon_fri.day[0].icon, None);

        let back = serde_json::to_value(&s).unwrap();
        assert_eq!(back["mon_fri"]["day"][0]["end"], "15:15");
        assert!(back["mon_fri"]["day"][0].get("icon").is_none());
    }

    #[test]
    fn missing_bucket_is_rejected() {
        let json = r#"{"mon_fri": {"day": [], "night": []}}"#;
        assert!(serde_json::from_str::<Schedule>(json).is_err());
    }

    #[test]
    fn empty_label_fails_validation() {
        let mut s = Schedule::default();
        s.weekend.day[2].label = "  ".into();
        assert_eq!(
            s.validate(),
            Err(ScheduleError::EmptyLabel {
                bucket: "weekend".into(),
                mode: "day".into(),
                index: 2,
            })
        );
    }

    #[test]
    fn interval_duration_handles_wrap() {
        let sleeping = Interval::new("Sleeping", t("21:15"), t("07:00"), "#4A3F52");
        assert!(sleeping.wraps_midnight());
        assert_eq!(sleeping.duration_min(), 9 * 60 + 45);

        let school = Interval::new("School", t("08:30"), t("15:15"), "#B5C9D4");
        assert!(!school.wraps_midnight());
        assert_eq!(school.duration_min(), 6 * 60 + 45);

        let all_day = Interval::new("Holiday", t("06:00"), t("06:00"), "#FFFFFF");
        assert_eq!(all_day.duration_min(), MINUTES_PER_DAY);
    }
}
