//! Flat `key = value` settings store
//!
//! Values are typed on load: `true`/`false` become booleans, numbers with a
//! decimal point become floats, other numbers integers, and anything that
//! fails to parse is kept as a string.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings errors
#[derive(Error, Debug)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("Settings file {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
}

/// A single typed setting
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// Integer value
    Int(i32),
    /// Floating point value
    Float(f32),
    /// Free-form text
    Str(String),
    /// Boolean flag
    Bool(bool),
}

impl SettingValue {
    /// Infer the type of a raw value string
    pub fn parse(raw: &str) -> Self {
        if raw == "true" || raw == "false" {
            return Self::Bool(raw == "true");
        }
        if raw.contains('.') {
            raw.parse().map_or_else(|_| Self::Str(raw.to_string()), Self::Float)
        } else {
            raw.parse().map_or_else(|_| Self::Str(raw.to_string()), Self::Int)
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            // Keep the decimal point so the value reloads as a float
            Self::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{v:.1}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Conversion out of a [`SettingValue`] of the matching variant
pub trait FromSetting: Sized {
    /// Borrow the typed payload, `None` for any other variant
    fn from_setting(value: &SettingValue) -> Option<Self>;
}

impl FromSetting for i32 {
    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromSetting for f32 {
    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromSetting for bool {
    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromSetting for String {
    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Str(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for SettingValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Key/value settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    values: HashMap<String, SettingValue>,
}

impl Settings {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key = value` lines. Lines without `=` are ignored, as are
    /// blank lines and `#`/`;` comments.
    pub fn parse(contents: &str) -> Self {
        let mut settings = Self::new();
        settings.merge_str(contents);
        settings
    }

    /// Merge `key = value` lines into this store, overwriting existing keys
    pub fn merge_str(&mut self, contents: &str) {
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                self.values.insert(key.to_string(), SettingValue::parse(value.trim()));
            }
        }
    }

    /// Merge settings from a file
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_str(&contents);
        log::debug!("Loaded {} setting(s) from {}", self.values.len(), path.display());
        Ok(())
    }

    /// Write all settings as `key = value` lines, sorted by key.
    ///
    /// Values are written untyped and re-inferred on load, so the round trip
    /// only keeps the type of strings that do not read as another type:
    /// `Str("true")` reloads as `Bool` and `Str("42")` as `Int`.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_string()).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Store a value, replacing any previous value of any type
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Typed lookup; returns `default` when the key is missing or holds another type
    pub fn get<T: FromSetting>(&self, key: &str, default: T) -> T {
        self.values
            .get(key)
            .and_then(T::from_setting)
            .unwrap_or(default)
    }

    /// Raw lookup
    pub fn get_raw(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    /// Whether a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no keys are stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort();
        for key in keys {
            writeln!(f, "{key} = {}", self.values[key])?;
        }
        Ok(())
    }
}
