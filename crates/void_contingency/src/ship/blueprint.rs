//! Ship blueprints
//!
//! A blueprint is a RON data file describing a ship class: its name, hull
//! capacity and the ordered list of components to install. Blueprints are
//! shared through the engine's resource cache and stamped out with
//! [`ShipBlueprint::build`].
//!
//! ```ron
//! (
//!     name: "Pathfinder",
//!     max_health: 120.0,
//!     components: [
//!         Engine(thrust: 50.0),
//!         Movement(mode: Hybrid, max_speed: 150.0),
//!     ],
//! )
//! ```

use super::components::{EngineComponent, MovementComponent, MovementMode};
use super::{Ship, DEFAULT_MAX_HEALTH};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use void_engine::assets::{read_ron, Resource, ResourceError};
use void_engine::prelude::Vector2f;

/// Blueprint validation errors
#[derive(Debug, Error, PartialEq)]
pub enum BlueprintError {
    /// Blueprint has no name
    #[error("Blueprint name must not be empty")]
    EmptyName,

    /// A numeric field is negative or not finite
    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },

    /// Efficiency outside `[0, 1]`
    #[error("Engine efficiency must be within [0, 1], got {0}")]
    InvalidEfficiency(f32),

    /// RON text could not be parsed
    #[error("Failed to parse blueprint: {0}")]
    Parse(String),
}

/// One component entry of a blueprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentSpec {
    /// An [`EngineComponent`]
    Engine {
        /// Thrust ceiling
        #[serde(default = "default_max_thrust")]
        max_thrust: f32,
        /// Fraction of thrust turned into acceleration
        #[serde(default = "default_efficiency")]
        efficiency: f32,
        /// Initial throttle
        #[serde(default)]
        thrust: f32,
    },

    /// A [`MovementComponent`]
    Movement {
        /// Integration mode
        #[serde(default)]
        mode: MovementMode,
        /// Speed cap
        #[serde(default = "default_max_speed")]
        max_speed: f32,
        /// Linear acceleration
        #[serde(default = "default_acceleration")]
        acceleration: f32,
        /// Linear drag
        #[serde(default = "default_deceleration")]
        deceleration: f32,
        /// Angular acceleration in degrees per second squared
        #[serde(default = "default_angular_acceleration")]
        angular_acceleration: f32,
        /// Angular drag in degrees per second squared
        #[serde(default = "default_angular_deceleration")]
        angular_deceleration: f32,
        /// Initial thrust direction
        #[serde(default)]
        thrust: Vector2f,
    },
}

fn default_max_thrust() -> f32 {
    EngineComponent::DEFAULT_MAX_THRUST
}

fn default_efficiency() -> f32 {
    EngineComponent::DEFAULT_EFFICIENCY
}

fn default_max_speed() -> f32 {
    MovementComponent::DEFAULT_MAX_SPEED
}

fn default_acceleration() -> f32 {
    MovementComponent::DEFAULT_ACCELERATION
}

fn default_deceleration() -> f32 {
    MovementComponent::DEFAULT_DECELERATION
}

fn default_angular_acceleration() -> f32 {
    MovementComponent::DEFAULT_ANGULAR_ACCELERATION
}

fn default_angular_deceleration() -> f32 {
    MovementComponent::DEFAULT_ANGULAR_DECELERATION
}

fn default_max_health() -> f32 {
    DEFAULT_MAX_HEALTH
}

fn check(field: &'static str, value: f32) -> Result<(), BlueprintError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(BlueprintError::InvalidValue { field, value })
    }
}

impl ComponentSpec {
    /// Engine entry with default tuning and the given throttle
    pub fn engine(thrust: f32) -> Self {
        Self::Engine {
            max_thrust: default_max_thrust(),
            efficiency: default_efficiency(),
            thrust,
        }
    }

    /// Movement entry with default tuning
    pub fn movement(mode: MovementMode) -> Self {
        Self::Movement {
            mode,
            max_speed: default_max_speed(),
            acceleration: default_acceleration(),
            deceleration: default_deceleration(),
            angular_acceleration: default_angular_acceleration(),
            angular_deceleration: default_angular_deceleration(),
            thrust: Vector2f::ZERO,
        }
    }

    fn validate(&self) -> Result<(), BlueprintError> {
        match *self {
            Self::Engine {
                max_thrust,
                efficiency,
                thrust,
            } => {
                check("max_thrust", max_thrust)?;
                check("thrust", thrust)?;
                if !(0.0..=1.0).contains(&efficiency) {
                    return Err(BlueprintError::InvalidEfficiency(efficiency));
                }
                Ok(())
            }
            Self::Movement {
                max_speed,
                acceleration,
                deceleration,
                angular_acceleration,
                angular_deceleration,
                thrust,
                ..
            } => {
                check("max_speed", max_speed)?;
                check("acceleration", acceleration)?;
                check("deceleration", deceleration)?;
                check("angular_acceleration", angular_acceleration)?;
                check("angular_deceleration", angular_deceleration)?;
                if !(thrust.x.is_finite() && thrust.y.is_finite()) {
                    return Err(BlueprintError::InvalidValue {
                        field: "thrust",
                        value: thrust.length(),
                    });
                }
                Ok(())
            }
        }
    }

    fn install_into(&self, ship: &mut Ship) {
        match *self {
            Self::Engine {
                max_thrust,
                efficiency,
                thrust,
            } => {
                let mut engine = EngineComponent::new()
                    .with_max_thrust(max_thrust)
                    .with_efficiency(efficiency);
                engine.set_thrust(thrust);
                ship.install(engine);
            }
            Self::Movement {
                mode,
                max_speed,
                acceleration,
                deceleration,
                angular_acceleration,
                angular_deceleration,
                thrust,
            } => {
                let mut movement = MovementComponent::new()
                    .with_mode(mode)
                    .with_max_speed(max_speed)
                    .with_linear_tuning(acceleration, deceleration)
                    .with_angular_tuning(angular_acceleration, angular_deceleration);
                movement.set_thrust(thrust);
                ship.install(movement);
            }
        }
    }
}

/// Data description of a ship class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipBlueprint {
    /// Name given to ships built from this blueprint
    pub name: String,

    /// Hull capacity
    #[serde(default = "default_max_health")]
    pub max_health: f32,

    /// Components, installed in this order
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}

impl Default for ShipBlueprint {
    /// A light scout: an idling engine followed by a thruster-mode controller
    fn default() -> Self {
        Self {
            name: "Pathfinder".to_string(),
            max_health: DEFAULT_MAX_HEALTH,
            components: vec![
                ComponentSpec::engine(50.0),
                ComponentSpec::movement(MovementMode::Thruster),
            ],
        }
    }
}

impl ShipBlueprint {
    /// Parse and validate a blueprint from RON text
    pub fn from_ron_str(source: &str) -> Result<Self, BlueprintError> {
        let blueprint: Self = ron::from_str(source).map_err(|e| BlueprintError::Parse(e.to_string()))?;
        blueprint.validate()?;
        Ok(blueprint)
    }

    /// Check names and numeric ranges
    pub fn validate(&self) -> Result<(), BlueprintError> {
        if self.name.trim().is_empty() {
            return Err(BlueprintError::EmptyName);
        }
        check("max_health", self.max_health)?;
        self.components.iter().try_for_each(ComponentSpec::validate)
    }

    /// Build a ship with every component installed and attached
    pub fn build(&self) -> Ship {
        let mut ship = Ship::new(self.name.clone()).with_max_health(self.max_health);
        for spec in &self.components {
            spec.install_into(&mut ship);
        }
        ship
    }
}

impl Resource for ShipBlueprint {
    fn load(path: &Path) -> Result<Self, ResourceError> {
        let blueprint: Self = read_ron(path)?;
        blueprint.validate().map_err(|e| ResourceError::Invalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(blueprint)
    }
}
