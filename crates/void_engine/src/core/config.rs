//! # Engine Configuration
//!
//! Core engine behavior: logging, frame pacing and the location of the flat
//! settings file. Serializable to TOML or RON through [`Config`].

use crate::config::Config;
use crate::foundation::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Logger settings
    pub logging: LoggingConfig,

    /// Fixed simulation step in seconds
    pub fixed_timestep: f32,

    /// Upper bound of fixed steps run for a single frame
    pub max_steps_per_frame: u32,

    /// Target FPS for the frame loop, `None` runs unthrottled
    pub target_fps: Option<u32>,

    /// Flat `key = value` settings file loaded on start and saved on shutdown
    pub settings_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some(PathBuf::from("void_contingency.log")),
            },
            fixed_timestep: 1.0 / 60.0,
            max_steps_per_frame: 8,
            target_fps: Some(60),
            settings_path: Some(PathBuf::from("config.ini")),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    /// Log to stderr instead of a file
    pub fn with_console_logging(mut self) -> Self {
        self.logging.file = None;
        self
    }

    /// Set the fixed simulation step
    pub fn with_fixed_timestep(mut self, seconds: f32) -> Self {
        self.fixed_timestep = seconds;
        self
    }

    /// Set target FPS
    pub fn with_target_fps(mut self, fps: Option<u32>) -> Self {
        self.target_fps = fps;
        self
    }

    /// Set or clear the settings file
    pub fn with_settings_path(mut self, path: Option<PathBuf>) -> Self {
        self.settings_path = path;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.fixed_timestep.is_finite() || self.fixed_timestep <= 0.0 {
            return Err(format!("Fixed timestep must be positive, got {}", self.fixed_timestep));
        }
        if self.max_steps_per_frame == 0 {
            return Err("Max steps per frame must be at least 1".to_string());
        }
        if self.target_fps == Some(0) {
            return Err("Target FPS must be at least 1".to_string());
        }
        self.logging.level_filter().map_err(|e| e.to_string())?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for EngineConfig {}
