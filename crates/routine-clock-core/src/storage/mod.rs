mod config;
pub mod schedule_store;

pub use config::{Config, DisplayConfig, NotificationsConfig};
pub use schedule_store::{LoadedSchedule, ScheduleSource, ScheduleStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/routine-clock[-dev]/` based on ROUTINE_CLOCK_ENV.
///
/// Set ROUTINE_CLOCK_ENV=dev to use a development data directory, or
/// ROUTINE_CLOCK_HOME to point at an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("ROUTINE_CLOCK_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("ROUTINE_CLOCK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("routine-clock-dev")
            } else {
                base_dir.join("routine-clock")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
