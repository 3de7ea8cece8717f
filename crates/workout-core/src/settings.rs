//! Persisted workout preferences.
//!
//! Stores user preferences including:
//! - Rest duration between exercises (10..=60 seconds)
//! - Global exercise duration multiplier (0.5..=2.0)
//! - Mute status for sound notifications
//!
//! Storage backends are plain string key-value stores. Validation lives in
//! the provided methods of [`SettingsStore`], so a corrupted or hand-edited
//! value always falls back to its default instead of surfacing an error.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, Result, ValidationError};

pub const REST_DURATION_KEY: &str = "workout-timer-rest-duration";
pub const DURATION_MULTIPLIER_KEY: &str = "workout-timer-duration-multiplier";
pub const MUTE_STATUS_KEY: &str = "workout-timer-mute-status";

pub const DEFAULT_REST_DURATION: u32 = 30;
pub const MIN_REST_DURATION: u32 = 10;
pub const MAX_REST_DURATION: u32 = 60;

pub const DEFAULT_DURATION_MULTIPLIER: f64 = 1.0;
pub const MIN_DURATION_MULTIPLIER: f64 = 0.5;
pub const MAX_DURATION_MULTIPLIER: f64 = 2.0;

/// All keys a store may hold.
pub const KNOWN_KEYS: [&str; 3] = [REST_DURATION_KEY, DURATION_MULTIPLIER_KEY, MUTE_STATUS_KEY];

/// Duration settings that shape a workout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Rest between exercises, in seconds.
    pub rest_duration: u32,
    /// Multiplier applied to every exercise's base duration.
    pub duration_multiplier: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rest_duration: DEFAULT_REST_DURATION,
            duration_multiplier: DEFAULT_DURATION_MULTIPLIER,
        }
    }
}

impl Settings {
    /// Build settings, rejecting out-of-range values.
    pub fn new(rest_duration: u32, duration_multiplier: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            rest_duration: validate_rest_duration(rest_duration)?,
            duration_multiplier: validate_duration_multiplier(duration_multiplier)?,
        })
    }
}

pub fn validate_rest_duration(value: u32) -> Result<u32, ValidationError> {
    if (MIN_REST_DURATION..=MAX_REST_DURATION).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field: "rest_duration".into(),
            value: value.to_string(),
            min: MIN_REST_DURATION.to_string(),
            max: MAX_REST_DURATION.to_string(),
        })
    }
}

pub fn validate_duration_multiplier(value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && (MIN_DURATION_MULTIPLIER..=MAX_DURATION_MULTIPLIER).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field: "duration_multiplier".into(),
            value: value.to_string(),
            min: MIN_DURATION_MULTIPLIER.to_string(),
            max: MAX_DURATION_MULTIPLIER.to_string(),
        })
    }
}

/// Parse a persisted rest duration. Anything but an in-range integer is rejected.
pub fn parse_rest_duration(raw: &str) -> Option<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .and_then(|v| validate_rest_duration(v).ok())
}

/// Parse a persisted duration multiplier.
pub fn parse_duration_multiplier(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(|v| validate_duration_multiplier(v).ok())
}

/// Key-value persistence for preferences.
///
/// Implementors only move strings around. The typed accessors are provided
/// here so every backend validates the same way.
pub trait SettingsStore {
    /// Raw value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Persist a raw value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Drop a key, restoring its default on next read.
    fn remove(&mut self, key: &str) -> Result<()>;

    fn rest_duration(&self) -> u32 {
        match self.get(REST_DURATION_KEY) {
            None => DEFAULT_REST_DURATION,
            Some(raw) => parse_rest_duration(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "ignoring invalid persisted rest duration");
                DEFAULT_REST_DURATION
            }),
        }
    }

    fn duration_multiplier(&self) -> f64 {
        match self.get(DURATION_MULTIPLIER_KEY) {
            None => DEFAULT_DURATION_MULTIPLIER,
            Some(raw) => parse_duration_multiplier(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "ignoring invalid persisted duration multiplier");
                DEFAULT_DURATION_MULTIPLIER
            }),
        }
    }

    fn muted(&self) -> bool {
        self.get(MUTE_STATUS_KEY).as_deref() == Some("true")
    }

    fn set_rest_duration(&mut self, value: u32) -> Result<()> {
        let value = validate_rest_duration(value)?;
        self.set(REST_DURATION_KEY, &value.to_string())
    }

    fn set_duration_multiplier(&mut self, value: f64) -> Result<()> {
        let value = validate_duration_multiplier(value)?;
        self.set(DURATION_MULTIPLIER_KEY, &value.to_string())
    }

    fn set_muted(&mut self, muted: bool) -> Result<()> {
        self.set(MUTE_STATUS_KEY, if muted { "true" } else { "false" })
    }

    /// Read both duration settings once, falling back to defaults.
    fn load_settings(&self) -> Settings {
        Settings {
            rest_duration: self.rest_duration(),
            duration_multiplier: self.duration_multiplier(),
        }
    }

    /// Set a typed value from its string form, validating it first.
    fn set_validated(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            REST_DURATION_KEY => {
                let v = value.trim().parse::<u32>().map_err(|e| ValidationError::InvalidValue {
                    field: key.into(),
                    message: e.to_string(),
                })?;
                self.set_rest_duration(v)
            }
            DURATION_MULTIPLIER_KEY => {
                let v = value.trim().parse::<f64>().map_err(|e| ValidationError::InvalidValue {
                    field: key.into(),
                    message: e.to_string(),
                })?;
                self.set_duration_multiplier(v)
            }
            MUTE_STATUS_KEY => {
                let v = value.trim().parse::<bool>().map_err(|e| ValidationError::InvalidValue {
                    field: key.into(),
                    message: e.to_string(),
                })?;
                self.set_muted(v)
            }
            other => Err(ConfigError::UnknownKey(other.into()).into()),
        }
    }
}

/// In-memory store, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// TOML-file store at `<data_dir>/settings.toml`.
///
/// Every write rewrites the whole file; the table is tiny.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the default settings file.
    pub fn open() -> Result<Self> {
        let path = crate::storage::data_dir()?.join("settings.toml");
        Self::open_at(path)
    }

    /// Open (or lazily create) a settings file at `path`.
    ///
    /// A file that fails to parse is treated as empty so defaults apply.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<BTreeMap<String, toml::Value>>(&content) {
                Ok(table) => table
                    .into_iter()
                    .map(|(k, v)| {
                        let s = match v {
                            toml::Value::String(s) => s,
                            other => other.to_string(),
                        };
                        (k, s)
                    })
                    .collect(),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "settings file unreadable, using defaults"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path,
                    message: e.to_string(),
                }
                .into())
            }
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored raw values, sorted by key.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(&self.values)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content).map_err(|e| ConfigError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        self.save()
    }
}
