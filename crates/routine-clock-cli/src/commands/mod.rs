pub mod config;
pub mod render;
pub mod run;
pub mod schedule;
pub mod status;

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use routine_clock_core::{Config, LoadedSchedule, ScheduleSource, ScheduleStore};

/// Accepts `YYYY-MM-DDTHH:MM[:SS]` or the same with a space separator.
pub fn parse_at(value: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| format!("invalid time '{value}': expected YYYY-MM-DDTHH:MM[:SS]"))
}

pub fn now_or(at: Option<NaiveDateTime>) -> NaiveDateTime {
    at.unwrap_or_else(|| Local::now().naive_local())
}

/// The store to use: an explicit path, then `schedule_path` from config,
/// then `schedule.json` in the data directory.
pub fn schedule_store(
    explicit: Option<PathBuf>,
    config: &Config,
) -> Result<ScheduleStore, Box<dyn std::error::Error>> {
    if let Some(path) = explicit {
        return Ok(ScheduleStore::at(path));
    }
    if let Some(path) = config.schedule_path.as_deref() {
        return Ok(ScheduleStore::at(path));
    }
    Ok(ScheduleStore::default_location()?)
}

/// Like [`schedule_store`], but never fails: an unusable data directory
/// falls back to the built-in routine.
pub fn load_schedule(explicit: Option<PathBuf>, config: &Config) -> LoadedSchedule {
    match explicit.or_else(|| config.schedule_path.as_deref().map(PathBuf::from)) {
        Some(path) => ScheduleStore::at(path).load_or_default(),
        None => ScheduleStore::load_default(),
    }
}

/// Tell the user when their stored schedule is not the one in use.
pub fn report_source(source: &ScheduleSource) {
    match source {
        ScheduleSource::Fallback { path, reason } => {
            eprintln!("warning: ignoring {}: {reason}", path.display());
        }
        ScheduleSource::Unavailable { reason } => {
            eprintln!("warning: using built-in schedule: {reason}");
        }
        ScheduleSource::Stored(_) | ScheduleSource::Default => {}
    }
}
