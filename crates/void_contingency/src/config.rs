//! Game configuration
//!
//! Loaded from TOML or RON through the engine's [`Config`] trait. Every
//! section falls back to its defaults, so a file only needs the keys it
//! changes.

use crate::ship::ShipBlueprint;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use void_engine::prelude::{Config, EngineConfig};

/// Top-level game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Engine services and frame pacing
    pub engine: EngineConfig,

    /// Fleet spawning and driver options
    pub simulation: SimulationConfig,

    /// Ship class used when no blueprint file is given
    pub default_ship: ShipBlueprint,
}

impl Config for GameConfig {}

impl GameConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.engine.validate()?;
        self.simulation.validate()?;
        self.default_ship.validate().map_err(|e| e.to_string())
    }
}

/// Fleet spawning and driver options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Ships spawned on start
    pub ship_count: usize,

    /// Tick ships across threads
    pub parallel: bool,

    /// RNG seed for spawn headings and positions; random when unset
    pub seed: Option<u64>,

    /// Ships spawn within this distance of the origin
    pub spawn_radius: f32,

    /// Seconds of simulated time between telemetry log lines
    pub telemetry_interval: f32,

    /// Blueprint file loaded through the resource cache
    pub blueprint: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ship_count: 8,
            parallel: false,
            seed: None,
            spawn_radius: 200.0,
            telemetry_interval: 1.0,
            blueprint: None,
        }
    }
}

impl SimulationConfig {
    /// Validate the section
    pub fn validate(&self) -> Result<(), String> {
        if !self.spawn_radius.is_finite() || self.spawn_radius < 0.0 {
            return Err(format!("Spawn radius must be non-negative, got {}", self.spawn_radius));
        }
        if !self.telemetry_interval.is_finite() || self.telemetry_interval <= 0.0 {
            return Err(format!(
                "Telemetry interval must be positive, got {}",
                self.telemetry_interval
            ));
        }
        Ok(())
    }
}
