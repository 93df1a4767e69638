//! Fixed-step simulation driver
//!
//! Frame deltas are accumulated and consumed in fixed ticks so ship motion
//! does not depend on the frame rate. A frame runs at most
//! `max_steps_per_frame` ticks; any larger backlog is dropped.

use crate::config::{GameConfig, SimulationConfig};
use crate::fleet::{Fleet, FleetTick, ShipId};
use crate::ship::components::MovementComponent;
use crate::ship::{Ship, ShipBlueprint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use thiserror::Error;
use void_engine::prelude::{
    AppError, Application, Engine, Event, EventArg, EventSystem, EventType, Vector2f,
};

/// Simulation errors
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    /// Elapsed time was negative
    #[error("Elapsed time must not be negative, got {0}")]
    NegativeDelta(f32),

    /// Elapsed time was NaN or infinite
    #[error("Elapsed time must be finite, got {0}")]
    NonFiniteDelta(f32),

    /// Fixed step was zero, negative or not finite
    #[error("Fixed timestep must be positive, got {0}")]
    InvalidTimestep(f32),

    /// Handle does not resolve to a live ship
    #[error("No ship with id {0:?}")]
    UnknownShip(ShipId),

    /// Game config failed validation
    #[error("Invalid game config: {0}")]
    InvalidConfig(String),
}

/// Fleet plus the fixed-step clock that drives it
pub struct Simulation {
    fleet: Fleet,
    config: SimulationConfig,
    default_ship: ShipBlueprint,
    fixed_timestep: f32,
    max_steps_per_frame: u32,
    accumulator: f32,
    ticks: u64,
    time: f64,
    last_tick: FleetTick,
    next_telemetry: f64,
}

impl Simulation {
    /// Create an empty simulation stepping `fixed_timestep` seconds per tick
    pub fn new(fixed_timestep: f32, max_steps_per_frame: u32) -> Result<Self, SimulationError> {
        if !fixed_timestep.is_finite() || fixed_timestep <= 0.0 {
            return Err(SimulationError::InvalidTimestep(fixed_timestep));
        }
        Ok(Self {
            fleet: Fleet::new(),
            config: SimulationConfig::default(),
            default_ship: ShipBlueprint::default(),
            fixed_timestep,
            max_steps_per_frame: max_steps_per_frame.max(1),
            accumulator: 0.0,
            ticks: 0,
            time: 0.0,
            last_tick: FleetTick::default(),
            next_telemetry: 0.0,
        })
    }

    /// Create a simulation from the engine timing and simulation sections.
    ///
    /// The whole config is validated first.
    pub fn from_config(config: &GameConfig) -> Result<Self, SimulationError> {
        config.validate().map_err(SimulationError::InvalidConfig)?;
        let mut simulation = Self::new(config.engine.fixed_timestep, config.engine.max_steps_per_frame)?;
        simulation.config = config.simulation.clone();
        simulation.default_ship = config.default_ship.clone();
        simulation.next_telemetry = f64::from(simulation.config.telemetry_interval);
        Ok(simulation)
    }

    /// Tick ships across threads
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Ships under simulation
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Mutable access to the ships
    pub fn fleet_mut(&mut self) -> &mut Fleet {
        &mut self.fleet
    }

    /// Add a ship to the fleet
    pub fn spawn(&mut self, ship: Ship) -> ShipId {
        self.fleet.spawn(ship)
    }

    /// Feed `elapsed` seconds into the accumulator and run every whole tick
    /// it covers, up to the per-frame cap. Returns the ticks run.
    pub fn advance(&mut self, elapsed: f32) -> Result<u32, SimulationError> {
        if !elapsed.is_finite() {
            return Err(SimulationError::NonFiniteDelta(elapsed));
        }
        if elapsed < 0.0 {
            return Err(SimulationError::NegativeDelta(elapsed));
        }

        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= self.fixed_timestep && steps < self.max_steps_per_frame {
            self.step();
            self.accumulator -= self.fixed_timestep;
            steps += 1;
        }

        if self.accumulator >= self.fixed_timestep {
            log::debug!(
                "Dropping {:.3}s of simulation backlog after {} steps",
                self.accumulator,
                steps
            );
            self.accumulator %= self.fixed_timestep;
        }
        Ok(steps)
    }

    /// Run exactly one fixed tick
    pub fn step(&mut self) -> FleetTick {
        let tick = if self.config.parallel {
            self.fleet.update_parallel(self.fixed_timestep)
        } else {
            self.fleet.update(self.fixed_timestep)
        };
        self.ticks += 1;
        self.time += f64::from(self.fixed_timestep);
        self.last_tick = tick;
        tick
    }

    /// Damage a ship and announce it.
    ///
    /// Sends `ShipDamaged`, and `ShipDestroyed` when this hit takes the
    /// hull to zero. Returns the remaining health.
    pub fn apply_damage(
        &mut self,
        id: ShipId,
        amount: f32,
        events: &mut EventSystem,
    ) -> Result<f32, SimulationError> {
        let timestamp = events.current_time();
        let ship = self.fleet.get_mut(id).ok_or(SimulationError::UnknownShip(id))?;
        let was_destroyed = ship.is_destroyed();
        ship.damage(amount);

        let name = ship.name().to_string();
        let health = ship.health();
        events.send(
            Event::new(EventType::ShipDamaged, timestamp)
                .with_arg("ship", EventArg::ShipName(name.clone()))
                .with_arg("amount", EventArg::Amount(amount))
                .with_arg("health", EventArg::Amount(health)),
        );
        if !was_destroyed && ship.is_destroyed() {
            log::info!("{name} destroyed");
            events.send(Event::new(EventType::ShipDestroyed, timestamp).with_arg("ship", EventArg::ShipName(name)));
        }
        Ok(health)
    }

    /// Restore a ship's health. Returns the new health.
    pub fn heal(&mut self, id: ShipId, amount: f32) -> Result<f32, SimulationError> {
        let ship = self.fleet.get_mut(id).ok_or(SimulationError::UnknownShip(id))?;
        ship.heal(amount);
        Ok(ship.health())
    }

    /// Fixed step in seconds
    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Fraction of a tick waiting in the accumulator, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.fixed_timestep
    }

    /// Totals of the most recent tick
    pub fn last_tick(&self) -> FleetTick {
        self.last_tick
    }

    fn spawn_fleet(&mut self, blueprint: &ShipBlueprint) {
        let mut rng = self
            .config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        for index in 0..self.config.ship_count {
            let heading: f32 = rng.gen_range(0.0..360.0);
            let position = if self.config.spawn_radius > 0.0 {
                let bearing: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
                let distance: f32 = rng.gen_range(0.0..self.config.spawn_radius);
                Vector2f::new(bearing.cos(), bearing.sin()) * distance
            } else {
                Vector2f::ZERO
            };

            let mut ship = blueprint.build().with_position(position);
            ship.set_rotation(heading);
            if let Some(movement) = ship.get_component_mut::<MovementComponent>() {
                movement.set_rotation(heading);
            }
            log::debug!("{} #{index} heading {heading:.1} at {position:?}", ship.name());
            self.fleet.spawn(ship);
        }
    }

    fn log_telemetry(&self) {
        let count = self.fleet.len();
        if count == 0 {
            log::info!("t={:.2}s: no ships", self.time);
            return;
        }
        let (total_speed, destroyed) = self
            .fleet
            .iter()
            .fold((0.0_f32, 0_usize), |(speed, destroyed), (_, ship)| {
                (speed + ship.speed(), destroyed + usize::from(ship.is_destroyed()))
            });
        #[allow(clippy::cast_precision_loss)]
        let mean_speed = total_speed / count as f32;
        log::info!(
            "t={:.2}s ticks={} ships={} destroyed={} mean speed={:.2}",
            self.time,
            self.ticks,
            count,
            destroyed,
            mean_speed
        );
    }
}

impl Application for Simulation {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let blueprint = match &self.config.blueprint {
            Some(path) => engine
                .resources
                .load::<ShipBlueprint>(path)
                .map_err(|e| AppError::Resource(e.to_string()))?,
            None => Arc::new(self.default_ship.clone()),
        };

        self.spawn_fleet(&blueprint);
        log::info!(
            "Spawned {} x {} (fixed step {:.4}s, {})",
            self.fleet.len(),
            blueprint.name,
            self.fixed_timestep,
            if self.config.parallel { "parallel" } else { "sequential" }
        );

        engine.events.send(Event::new(EventType::GameStarted, engine.time()));
        Ok(())
    }

    fn update(&mut self, _engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
        self.advance(delta_time)
            .map_err(|e| AppError::GameLogic(e.to_string()))?;

        if self.time >= self.next_telemetry {
            self.log_telemetry();
            while self.next_telemetry <= self.time {
                self.next_telemetry += f64::from(self.config.telemetry_interval);
            }
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        for (_, ship) in self.fleet.iter() {
            log::info!(
                "{}: position ({:.1}, {:.1}) speed {:.1} health {:.0}/{:.0}",
                ship.name(),
                ship.position().x,
                ship.position().y,
                ship.speed(),
                ship.health(),
                ship.max_health()
            );
        }
        engine.events.send(Event::new(EventType::GameEnded, engine.time()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::components::EngineComponent;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;
    use void_engine::prelude::EngineConfig;

    fn drifting_ship(vx: f32) -> Ship {
        let mut ship = Ship::new("Drifter");
        ship.set_velocity(Vector2f::new(vx, 0.0));
        ship
    }

    #[test]
    fn test_rejects_bad_timestep() {
        assert_eq!(
            Simulation::new(0.0, 4).err(),
            Some(SimulationError::InvalidTimestep(0.0))
        );
    }

    #[test]
    fn test_from_config_validates() {
        let mut config = GameConfig::default();
        config.simulation.telemetry_interval = 0.0;
        assert!(matches!(
            Simulation::from_config(&config),
            Err(SimulationError::InvalidConfig(_))
        ));

        config.simulation.telemetry_interval = 1.0;
        config.simulation.spawn_radius = f32::INFINITY;
        assert!(matches!(
            Simulation::from_config(&config),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_accumulator_carries_remainder() {
        let mut simulation = Simulation::new(0.25, 8).unwrap();
        let id = simulation.spawn(drifting_ship(4.0));

        assert_eq!(simulation.advance(0.625).unwrap(), 2);
        assert_relative_eq!(simulation.alpha(), 0.5);
        assert_eq!(simulation.advance(0.125).unwrap(), 1);
        assert_eq!(simulation.advance(0.125).unwrap(), 0);

        assert_eq!(simulation.ticks(), 3);
        assert_eq!(simulation.time(), 0.75);
        assert_relative_eq!(simulation.fleet().get(id).unwrap().position().x, 3.0);
    }

    #[test]
    fn test_steps_are_capped() {
        let mut simulation = Simulation::new(0.25, 2).unwrap();
        assert_eq!(simulation.advance(10.0).unwrap(), 2);
        assert!(simulation.alpha() < 1.0);
        assert_eq!(simulation.advance(0.0).unwrap(), 0);
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        let mut simulation = Simulation::new(0.25, 2).unwrap();
        assert_eq!(simulation.advance(-0.5), Err(SimulationError::NegativeDelta(-0.5)));
        assert!(matches!(
            simulation.advance(f32::NAN),
            Err(SimulationError::NonFiniteDelta(_))
        ));
        assert_eq!(simulation.ticks(), 0);
    }

    #[test]
    fn test_damage_events() {
        let mut simulation = Simulation::new(0.25, 2).unwrap();
        let id = simulation.spawn(Ship::new("Target"));
        let mut events = EventSystem::new();

        let destroyed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&destroyed);
        events.subscribe(EventType::ShipDestroyed, move |event: &Event| {
            sink.borrow_mut().push(event.ship_name().unwrap_or_default().to_string());
            true
        });
        let damaged = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&damaged);
        events.subscribe(EventType::ShipDamaged, move |event: &Event| {
            sink.borrow_mut().push(event.amount("health").unwrap_or(-1.0));
            true
        });

        assert_eq!(simulation.apply_damage(id, 60.0, &mut events).unwrap(), 40.0);
        assert_eq!(simulation.apply_damage(id, 60.0, &mut events).unwrap(), 0.0);
        assert_eq!(simulation.apply_damage(id, 5.0, &mut events).unwrap(), 0.0);
        events.dispatch();

        assert_eq!(*damaged.borrow(), vec![40.0, 0.0, 0.0]);
        assert_eq!(*destroyed.borrow(), vec!["Target".to_string()]);

        assert_eq!(simulation.heal(id, 25.0).unwrap(), 25.0);
    }

    #[test]
    fn test_unknown_ship() {
        let mut simulation = Simulation::new(0.25, 2).unwrap();
        let id = simulation.spawn(Ship::new("Ghost"));
        simulation.fleet_mut().despawn(id);

        let mut events = EventSystem::new();
        assert_eq!(
            simulation.apply_damage(id, 1.0, &mut events),
            Err(SimulationError::UnknownShip(id))
        );
        assert_eq!(events.pending(), 0);
    }

    #[test]
    fn test_runs_under_engine() {
        let mut config = GameConfig::default();
        config.engine = EngineConfig::default()
            .with_console_logging()
            .with_target_fps(None)
            .with_settings_path(None)
            .with_fixed_timestep(0.25);
        config.simulation.ship_count = 4;
        config.simulation.seed = Some(42);

        let mut engine = Engine::new(config.engine.clone());
        let mut simulation = Simulation::from_config(&config).unwrap().with_parallel(true);
        simulation.initialize(&mut engine).unwrap();
        assert_eq!(simulation.fleet().len(), 4);

        for _ in 0..4 {
            engine.step(&mut simulation, 0.25).unwrap();
        }
        assert_eq!(simulation.ticks(), 4);
        assert!(simulation.fleet().iter().all(|(_, ship)| ship.speed() > 0.0));
        assert!(simulation
            .fleet()
            .iter()
            .all(|(_, ship)| ship.get_component::<EngineComponent>().is_some()));
    }

    #[test]
    fn test_seeded_spawns_repeat() {
        let mut config = GameConfig::default();
        config.simulation.seed = Some(9);
        let mut engine = Engine::new(EngineConfig::default().with_settings_path(None));

        let mut a = Simulation::from_config(&config).unwrap();
        let mut b = Simulation::from_config(&config).unwrap();
        a.initialize(&mut engine).unwrap();
        b.initialize(&mut engine).unwrap();

        let headings = |s: &Simulation| s.fleet().iter().map(|(_, ship)| ship.rotation()).collect::<Vec<_>>();
        assert_eq!(headings(&a), headings(&b));
    }
}
