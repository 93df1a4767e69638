//! Engine component: thrust along the ship's facing

use super::{ComponentKind, ComponentType, ShipSystem};
use crate::ship::ShipBody;

/// Pushes its ship forward with `thrust * efficiency` units per second squared
#[derive(Debug, Clone, PartialEq)]
pub struct EngineComponent {
    thrust: f32,
    max_thrust: f32,
    efficiency: f32,
}

impl Default for EngineComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineComponent {
    /// Default thrust ceiling
    pub const DEFAULT_MAX_THRUST: f32 = 100.0;
    /// Default fraction of thrust converted into acceleration
    pub const DEFAULT_EFFICIENCY: f32 = 0.8;

    /// Idle engine with default ceiling and efficiency
    pub fn new() -> Self {
        Self {
            thrust: 0.0,
            max_thrust: Self::DEFAULT_MAX_THRUST,
            efficiency: Self::DEFAULT_EFFICIENCY,
        }
    }

    /// Builder form of [`Self::set_max_thrust`]
    pub fn with_max_thrust(mut self, max_thrust: f32) -> Self {
        self.set_max_thrust(max_thrust);
        self
    }

    /// Builder form of [`Self::set_efficiency`]
    pub fn with_efficiency(mut self, efficiency: f32) -> Self {
        self.set_efficiency(efficiency);
        self
    }

    /// Set the throttle, clamped to `[0, max_thrust]`
    pub fn set_thrust(&mut self, thrust: f32) {
        self.thrust = thrust.clamp(0.0, self.max_thrust);
    }

    /// Set the thrust ceiling (at least zero) and re-clamp the throttle
    pub fn set_max_thrust(&mut self, max_thrust: f32) {
        self.max_thrust = max_thrust.max(0.0);
        self.thrust = self.thrust.min(self.max_thrust);
    }

    /// Set the efficiency, clamped to `[0, 1]`
    pub fn set_efficiency(&mut self, efficiency: f32) {
        self.efficiency = efficiency.clamp(0.0, 1.0);
    }

    /// Current throttle
    pub fn thrust(&self) -> f32 {
        self.thrust
    }

    /// Thrust ceiling
    pub fn max_thrust(&self) -> f32 {
        self.max_thrust
    }

    /// Fraction of thrust converted into acceleration
    pub fn efficiency(&self) -> f32 {
        self.efficiency
    }

    /// Effective acceleration produced at the current throttle
    pub fn force(&self) -> f32 {
        self.thrust * self.efficiency
    }
}

impl ShipSystem for EngineComponent {
    const TYPE: ComponentType = ComponentType::Engine;

    fn initialize(&mut self) {
        log::debug!("Engine component online (max thrust {})", self.max_thrust);
    }

    fn shutdown(&mut self) {
        self.thrust = 0.0;
    }

    fn update(&mut self, delta_time: f32, body: &mut ShipBody) {
        let forward = body.transform.forward();
        body.velocity += forward * (self.force() * delta_time);
    }

    fn from_kind(kind: &ComponentKind) -> Option<&Self> {
        match kind {
            ComponentKind::Engine(engine) => Some(engine),
            ComponentKind::Movement(_) => None,
        }
    }

    fn from_kind_mut(kind: &mut ComponentKind) -> Option<&mut Self> {
        match kind {
            ComponentKind::Engine(engine) => Some(engine),
            ComponentKind::Movement(_) => None,
        }
    }
}

impl From<EngineComponent> for ComponentKind {
    fn from(engine: EngineComponent) -> Self {
        Self::Engine(engine)
    }
}
