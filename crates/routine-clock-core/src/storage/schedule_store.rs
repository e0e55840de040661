//! JSON persistence for the user-edited schedule.
//!
//! Reading never fails from the caller's point of view: a missing or broken
//! file yields the built-in routine and a warning in the log. Writing
//! validates first so a stored schedule always loads back.

use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::schedule::Schedule;

const SCHEDULE_FILE: &str = "schedule.json";

/// Where a loaded schedule came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleSource {
    Stored(PathBuf),
    /// Nothing stored yet.
    Default,
    /// A file was present but could not be used.
    Fallback { path: PathBuf, reason: String },
    /// The data directory itself could not be used.
    Unavailable { reason: String },
}

#[derive(Debug, Clone)]
pub struct LoadedSchedule {
    pub schedule: Schedule,
    pub source: ScheduleSource,
}

impl LoadedSchedule {
    fn unavailable(error: &ConfigError) -> Self {
        tracing::warn!(error = %error, "schedule storage unavailable, using default");
        Self {
            schedule: Schedule::default_routine(),
            source: ScheduleSource::Unavailable {
                reason: error.to_string(),
            },
        }
    }
}

/// File-backed schedule storage.
#[derive(Debug, Clone)]
pub struct ScheduleStore {
    path: PathBuf,
}

impl ScheduleStore {
    /// `schedule.json` inside the data directory.
    pub fn default_location() -> Result<Self, ConfigError> {
        Ok(Self::at(data_dir()?.join(SCHEDULE_FILE)))
    }

    /// Load from the default location. Never fails: an unusable data
    /// directory yields the built-in routine.
    pub fn load_default() -> LoadedSchedule {
        match Self::default_location() {
            Ok(store) => store.load_or_default(),
            Err(e) => LoadedSchedule::unavailable(&e),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Parse and validate a schedule document.
    pub fn parse(json: &str) -> Result<Schedule> {
        let schedule: Schedule = serde_json::from_str(json)?;
        schedule.validate()?;
        Ok(schedule)
    }

    /// Strict load. A missing file is reported as an IO error.
    pub fn load(&self) -> Result<Schedule> {
        let content = std::fs::read_to_string(&self.path)?;
        Self::parse(&content)
    }

    /// Load the stored schedule, falling back to the built-in routine.
    pub fn load_or_default(&self) -> LoadedSchedule {
        if !self.exists() {
            tracing::debug!(path = %self.path.display(), "no stored schedule, using default");
            return LoadedSchedule {
                schedule: Schedule::default_routine(),
                source: ScheduleSource::Default,
            };
        }

        match self.load() {
            Ok(schedule) => {
                tracing::info!(
                    path = %self.path.display(),
                    intervals = schedule.interval_count(),
                    "loaded schedule"
                );
                LoadedSchedule {
                    schedule,
                    source: ScheduleSource::Stored(self.path.clone()),
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "stored schedule unusable, falling back to default"
                );
                LoadedSchedule {
                    schedule: Schedule::default_routine(),
                    source: ScheduleSource::Fallback {
                        path: self.path.clone(),
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    /// Validate and write `schedule`, replacing whatever was stored.
    pub fn save(&self, schedule: &Schedule) -> Result<()> {
        schedule.validate()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(schedule)?;
        std::fs::write(&self.path, json)?;
        tracing::info!(path = %self.path.display(), "saved schedule");
        Ok(())
    }

    /// Remove the stored schedule. Returns whether a file was removed.
    pub fn reset(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::schedule::{Bucket, Mode, TimeOfDay};
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> ScheduleStore {
        ScheduleStore::at(dir.path().join("schedule.json"))
    }

    #[test]
    fn missing_file_yields_default() {
        let dir = TempDir::new().unwrap();
        let loaded = store(&dir).load_or_default();
        assert_eq!(loaded.source, ScheduleSource::Default);
        assert_eq!(loaded.schedule, Schedule::default_routine());
    }

    #[test]
    fn malformed_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();

        let loaded = store.load_or_default();
        assert!(matches!(loaded.source, ScheduleSource::Fallback { .. }));
        assert_eq!(loaded.schedule, Schedule::default_routine());
        assert!(store.load().is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let mut schedule = Schedule::default_routine();
        schedule.weekend.night[0].label = "Lights Out".into();
        schedule.weekend.night[0].start = TimeOfDay::new(21, 0).unwrap();
        store.save(&schedule).unwrap();

        let loaded = store.load_or_default();
        assert_eq!(loaded.source, ScheduleSource::Stored(store.path().to_path_buf()));
        let night = loaded.schedule.segment(Bucket::Weekend, Mode::Night);
        assert_eq!(night[0].label, "Lights Out");
        assert_eq!(night[0].start.to_string(), "21:00");
    }

    #[test]
    fn save_rejects_invalid_schedule() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let mut schedule = Schedule::default_routine();
        schedule.mon_fri.day[2].label.clear();
        assert!(matches!(store.save(&schedule), Err(CoreError::Schedule(_))));
        assert!(!store.exists());
    }

    #[test]
    fn empty_label_on_disk_falls_back() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let mut schedule = Schedule::default_routine();
        schedule.weekend.day[0].label.clear();
        std::fs::write(store.path(), serde_json::to_string(&schedule).unwrap()).unwrap();

        match store.load_or_default().source {
            ScheduleSource::Fallback { reason, .. } => assert!(reason.contains("empty label")),
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn unusable_data_dir_yields_default() {
        let loaded = LoadedSchedule::unavailable(&ConfigError::DataDir(
            "/nowhere/sub: Not a directory".into(),
        ));
        assert_eq!(loaded.schedule, Schedule::default_routine());
        match loaded.source {
            ScheduleSource::Unavailable { reason } => assert!(reason.contains("Not a directory")),
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[test]
    fn reset_removes_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(!store.reset().unwrap());
        store.save(&Schedule::default_routine()).unwrap();
        assert!(store.reset().unwrap());
        assert!(!store.exists());
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = ScheduleStore::at(dir.path().join("nested/deeper/schedule.json"));
        store.save(&Schedule::default_routine()).unwrap();
        assert!(store.exists());
    }
}
