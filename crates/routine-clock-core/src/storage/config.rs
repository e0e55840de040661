//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Which effects are enabled and how fast speech is
//! - The ending-soon warning threshold and pulse length
//! - Day/night boundaries and where to write the SVG dial
//! - An optional schedule file override
//!
//! Configuration is stored at `~/.config/routine-clock/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::clock::EngineSettings;
use crate::error::{ConfigError, Result};
use crate::resolver::DayWindow;

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub speech_enabled: bool,
    #[serde(default = "default_true")]
    pub tone_enabled: bool,
    /// Relative speech rate; 1.0 is the synthesizer's normal speed.
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
    /// Speech program to run instead of the platform default.
    #[serde(default)]
    pub speech_program: Option<String>,
    #[serde(default = "default_warning_minutes")]
    pub warning_minutes: u16,
    #[serde(default = "default_pulse_secs")]
    pub pulse_secs: u64,
}

/// Dial configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,
    #[serde(default = "default_night_start_hour")]
    pub night_start_hour: u32,
    /// Rewrite this SVG file on every tick while running.
    #[serde(default)]
    pub svg_output: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/routine-clock/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Schedule file to use instead of `schedule.json` in the data directory.
    #[serde(default)]
    pub schedule_path: Option<String>,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_true() -> bool {
    true
}
fn default_speech_rate() -> f32 {
    0.9
}
fn default_warning_minutes() -> u16 {
    5
}
fn default_pulse_secs() -> u64 {
    3
}
fn default_day_start_hour() -> u32 {
    crate::resolver::DAY_START_HOUR
}
fn default_night_start_hour() -> u32 {
    crate::resolver::NIGHT_START_HOUR
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            speech_enabled: true,
            tone_enabled: true,
            speech_rate: default_speech_rate(),
            speech_program: None,
            warning_minutes: default_warning_minutes(),
            pulse_secs: default_pulse_secs(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            day_start_hour: default_day_start_hour(),
            night_start_hour: default_night_start_hour(),
            svg_output: None,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("only leaf values can be set".into()));
                    }
                    // Optional strings clear with an empty value.
                    serde_json::Value::Null | serde_json::Value::String(_) if value.is_empty() => {
                        serde_json::Value::Null
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)
                    .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.display;
        if d.day_start_hour >= d.night_start_hour || d.night_start_hour > 24 {
            return Err(ConfigError::InvalidValue {
                key: "display.day_start_hour".into(),
                message: format!(
                    "day must start before night ({} >= {}) and night by hour 24",
                    d.day_start_hour, d.night_start_hour
                ),
            });
        }
        let n = &self.notifications;
        if n.warning_minutes == 0 || n.warning_minutes > 60 {
            return Err(ConfigError::InvalidValue {
                key: "notifications.warning_minutes".into(),
                message: "must be between 1 and 60".into(),
            });
        }
        if n.pulse_secs == 0 || n.pulse_secs > 60 {
            return Err(ConfigError::InvalidValue {
                key: "notifications.pulse_secs".into(),
                message: "must be between 1 and 60".into(),
            });
        }
        if !(n.speech_rate > 0.0 && n.speech_rate <= 4.0) {
            return Err(ConfigError::InvalidValue {
                key: "notifications.speech_rate".into(),
                message: "must be in (0, 4]".into(),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Engine tunables derived from this config.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            day_window: DayWindow {
                day_start_hour: self.display.day_start_hour,
                night_start_hour: self.display.night_start_hour,
            },
            warning_minutes: self.notifications.warning_minutes,
            pulse: i64::try_from(self.notifications.pulse_secs)
                .ok()
                .and_then(chrono::Duration::try_seconds)
                .unwrap_or_else(|| EngineSettings::default().pulse),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.notifications.speech_enabled);
        assert_eq!(parsed.notifications.warning_minutes, 5);
        assert_eq!(parsed.display.day_start_hour, 7);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[notifications]\ntone_enabled = false\n").unwrap();
        assert!(!parsed.notifications.tone_enabled);
        assert!(parsed.notifications.speech_enabled);
        assert_eq!(parsed.display.night_start_hour, 19);
        assert!(parsed.schedule_path.is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("notifications.speech_enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("display.day_start_hour").as_deref(), Some("7"));
        assert_eq!(cfg.get("schedule_path").as_deref(), Some("null"));
        assert!(cfg.get("display.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("notifications.tone_enabled", "false").unwrap();
        cfg.apply("notifications.warning_minutes", "10").unwrap();
        cfg.apply("notifications.speech_rate", "1.25").unwrap();
        cfg.apply("display.svg_output", "/tmp/dial.svg").unwrap();
        assert!(!cfg.notifications.tone_enabled);
        assert_eq!(cfg.notifications.warning_minutes, 10);
        assert_eq!(cfg.notifications.speech_rate, 1.25);
        assert_eq!(cfg.display.svg_output.as_deref(), Some("/tmp/dial.svg"));

        cfg.apply("display.svg_output", "").unwrap();
        assert!(cfg.display.svg_output.is_none());
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("display.nonexistent_key", "value"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.apply("notifications.speech_enabled", "not_a_bool").is_err());
        assert!(cfg.apply("display", "{}").is_err());
    }

    #[test]
    fn apply_rejects_invalid_window() {
        let mut cfg = Config::default();
        let err = cfg.apply("display.day_start_hour", "20").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg.display.day_start_hour, 7);
    }

    #[test]
    fn apply_rejects_out_of_range_pulse() {
        let mut cfg = Config::default();
        for value in ["0", "61", "100000000000000000"] {
            let err = cfg.apply("notifications.pulse_secs", value).unwrap_err();
            assert!(matches!(err, CoreError::Config(ConfigError::InvalidValue { .. })));
        }
        assert_eq!(cfg.notifications.pulse_secs, 3);
        assert_eq!(cfg.engine_settings().pulse, chrono::Duration::seconds(3));
    }

    #[test]
    fn oversized_pulse_on_disk_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[notifications]\npulse_secs = 100000000000000000\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn engine_settings_tolerate_unvalidated_pulse() {
        let mut cfg = Config::default();
        cfg.notifications.pulse_secs = u64::MAX;
        assert_eq!(cfg.engine_settings().pulse, chrono::Duration::seconds(3));
    }

    #[test]
    fn engine_settings_follow_config() {
        let mut cfg = Config::default();
        cfg.apply("notifications.pulse_secs", "5").unwrap();
        cfg.apply("display.night_start_hour", "20").unwrap();
        let settings = cfg.engine_settings();
        assert_eq!(settings.pulse, chrono::Duration::seconds(5));
        assert_eq!(settings.day_window.night_start_hour, 20);
        assert_eq!(settings.warning_minutes, 5);
    }

    #[test]
    fn save_and_load_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        assert_eq!(Config::load_from(&path).unwrap().notifications.pulse_secs, 3);

        let mut cfg = Config::default();
        cfg.apply("notifications.speech_program", "espeak").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.notifications.speech_program.as_deref(), Some("espeak"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "notifications = 3").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
