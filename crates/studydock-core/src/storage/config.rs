//! TOML-based application configuration.
//!
//! Stores:
//! - Initial focus and break lengths for a fresh timer
//! - The database file name inside the data directory
//!
//! Configuration is stored at `<data dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::timer::{TimerDurations, DEFAULT_BREAK_MIN, DEFAULT_FOCUS_MIN};

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_focus_minutes() -> u32 {
    DEFAULT_FOCUS_MIN
}
fn default_break_minutes() -> u32 {
    DEFAULT_BREAK_MIN
}
fn default_database_file() -> String {
    "studydock.db".into()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
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

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        for part in parents.into_iter().flat_map(|p| p.split('.')) {
            current = current.get_mut(part).ok_or_else(unknown)?;
        }
        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("not a leaf value".into()))
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    /// Load from the data directory, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory is unavailable, or the file
    /// exists but cannot be parsed.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&data_dir()?)
    }

    pub fn load_from(dir: &Path) -> Result<Self, CoreError> {
        let path = Self::path_in(dir);
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path,
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(dir)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&data_dir()?)
    }

    pub fn save_to(&self, dir: &Path) -> Result<(), CoreError> {
        let path = Self::path_in(dir);
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
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

    /// Set a config value by key in memory. Call `save` to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        if key.starts_with("timer.") {
            let minutes = value.parse::<u32>().unwrap_or(0);
            let checked = TimerDurations::new(updated.timer.focus_minutes, updated.timer.break_minutes);
            let adopted = match key {
                "timer.focus_minutes" => checked.focus_min() == minutes,
                _ => checked.break_min() == minutes,
            };
            if !adopted {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("'{value}' is outside the allowed range"),
                }
                .into());
            }
        }
        *self = updated;
        Ok(())
    }

    /// Durations for a timer that has never been started.
    pub fn timer_durations(&self) -> TimerDurations {
        TimerDurations::new(self.timer.focus_minutes, self.timer.break_minutes)
    }

    pub fn database_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.storage.database_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.focus_minutes, 25);
        assert_eq!(parsed.storage.database_file, "studydock.db");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[timer]\nfocus_minutes = 40\n").unwrap();
        assert_eq!(parsed.timer.focus_minutes, 40);
        assert_eq!(parsed.timer.break_minutes, 5);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.focus_minutes").as_deref(), Some("25"));
        assert_eq!(cfg.get("storage.database_file").as_deref(), Some("studydock.db"));
        assert!(cfg.get("timer.missing_key").is_none());
    }

    #[test]
    fn set_updates_number() {
        let mut cfg = Config::default();
        cfg.set("timer.break_minutes", "10").unwrap();
        assert_eq!(cfg.timer.break_minutes, 10);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(cfg.set("timer.nonexistent", "1").is_err());
        assert!(cfg.set("", "1").is_err());
    }

    #[test]
    fn set_rejects_invalid_number() {
        let mut cfg = Config::default();
        assert!(cfg.set("timer.focus_minutes", "soon").is_err());
        assert!(cfg.set("timer.focus_minutes", "0").is_err());
        assert!(cfg.set("timer.focus_minutes", "90").is_err());
        assert_eq!(cfg.timer.focus_minutes, 25);
    }

    #[test]
    fn load_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(dir.path()).unwrap();
        assert!(dir.path().join(CONFIG_FILE).exists());
        assert_eq!(cfg.timer.focus_minutes, 25);

        let mut cfg = cfg;
        cfg.set("timer.focus_minutes", "45").unwrap();
        cfg.save_to(dir.path()).unwrap();
        let reloaded = Config::load_from(dir.path()).unwrap();
        assert_eq!(reloaded.timer_durations().focus_min(), 45);
    }

    #[test]
    fn unparseable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "timer = [").unwrap();
        assert!(Config::load_from(dir.path()).is_err());
    }
}
