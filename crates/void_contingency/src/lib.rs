//! # Void Contingency
//!
//! Ship kinematics for a 2D space game built on `void_engine`.
//!
//! A [`Ship`] owns a kinematic body and an ordered list of pluggable
//! components. The [`EngineComponent`] pushes along the ship's heading and
//! the [`MovementComponent`] integrates velocity in one of three modes.
//! Ships are kept in a [`Fleet`] and stepped at a fixed rate by the
//! [`Simulation`], which also plugs into the engine's frame loop.
//!
//! ```rust
//! use void_contingency::prelude::*;
//!
//! let mut ship = Ship::new("Pathfinder");
//! let mut movement = MovementComponent::new();
//! movement.set_thrust(Vector2f::new(1.0, 0.0));
//! ship.install(movement);
//!
//! let report = ship.update(1.0);
//! assert!(report.all_updated());
//! assert!(ship.velocity().x > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod fleet;
pub mod ship;
pub mod simulation;

pub use config::{GameConfig, SimulationConfig};
pub use fleet::{Fleet, FleetTick, ShipId};
pub use ship::components::{EngineComponent, MovementComponent, MovementMode};
pub use ship::{Ship, ShipBlueprint, ShipError};
pub use simulation::{Simulation, SimulationError};

/// Common imports for game code
pub mod prelude {
    pub use crate::{
        config::{GameConfig, SimulationConfig},
        fleet::{Fleet, FleetTick, ShipId},
        ship::{
            components::{
                ComponentKind, ComponentMask, ComponentType, EngineComponent, MovementComponent,
                MovementMode, ShipComponent, ShipSystem, SkipReason, TickOutcome, TickReport,
            },
            BlueprintError, ComponentSlot, ComponentSpec, Ship, ShipBlueprint, ShipBody, ShipError,
        },
        simulation::{Simulation, SimulationError},
    };
    pub use void_engine::prelude::{Transform, Vector2f};
}
